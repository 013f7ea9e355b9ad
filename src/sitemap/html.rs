use crate::results::PageUrl;
use scraper::{Html, Selector};

/// Parses loosely structured markup and returns the text of every `loc` element
pub fn parse(html: &str) -> Vec<PageUrl> {
    let doc = Html::parse_document(html);

    let loc_selector = Selector::parse("loc").expect("static selector");
    let urls = doc
        .select(&loc_selector)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .collect::<Vec<_>>();

    ::log::debug!("HTML parser found {} loc elements", urls.len());
    if !urls.is_empty() {
        ::log::debug!(
            "First few locations: {:?}",
            urls.iter().take(5).collect::<Vec<_>>()
        );
    }

    urls
}
