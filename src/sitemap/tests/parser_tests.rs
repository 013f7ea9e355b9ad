use crate::error::InsightsError;
use crate::sitemap::{SitemapDocument, SitemapFormat, extract_urls, html, xml};

fn xml_doc(body: &str) -> SitemapDocument {
    SitemapDocument::new(
        "https://ex.com/sitemap.xml".to_string(),
        Some("application/xml".to_string()),
        body.to_string(),
    )
}

#[test]
fn test_extract_urlset_in_document_order() {
    let doc = xml_doc(
        "<urlset><url><loc>https://ex.com/a</loc></url><url><loc>https://ex.com/b</loc></url></urlset>",
    );
    let urls = extract_urls(&doc).unwrap();
    assert_eq!(urls, vec!["https://ex.com/a", "https://ex.com/b"]);
}

#[test]
fn test_extract_keeps_duplicates_and_order() {
    let doc = xml_doc(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://ex.com/c</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc>https://ex.com/a</loc></url>
  <url><loc>https://ex.com/c</loc></url>
  <url><loc>
      https://ex.com/b
  </loc></url>
</urlset>"#,
    );
    let urls = extract_urls(&doc).unwrap();
    assert_eq!(
        urls,
        vec![
            "https://ex.com/c",
            "https://ex.com/a",
            "https://ex.com/c",
            "https://ex.com/b"
        ]
    );
}

#[test]
fn test_extract_sitemap_index_locations() {
    let doc = xml_doc(
        r#"<sitemapindex>
<sitemap><loc>https://ex.com/posts.xml</loc></sitemap>
<sitemap><loc>https://ex.com/pages.xml</loc></sitemap>
</sitemapindex>"#,
    );
    let urls = extract_urls(&doc).unwrap();
    assert_eq!(urls, vec!["https://ex.com/posts.xml", "https://ex.com/pages.xml"]);
}

#[test]
fn test_xml_decodes_entities_and_cdata() {
    let urls = xml::parse(
        "<urlset><url><loc>https://ex.com/?a=1&amp;b=2</loc></url>\
         <url><loc><![CDATA[https://ex.com/c?x=1&y=2]]></loc></url>\
         <url><loc>https://ex.com/&#100;</loc></url></urlset>",
    )
    .unwrap();
    assert_eq!(
        urls,
        vec![
            "https://ex.com/?a=1&b=2",
            "https://ex.com/c?x=1&y=2",
            "https://ex.com/d"
        ]
    );
}

#[test]
fn test_xml_matches_prefixed_loc() {
    let urls = xml::parse(
        r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9"><sm:url><sm:loc>https://ex.com/a</sm:loc></sm:url></sm:urlset>"#,
    )
    .unwrap();
    assert_eq!(urls, vec!["https://ex.com/a"]);
}

#[test]
fn test_xml_rejects_mismatched_tags() {
    assert!(xml::parse("<urlset><url><loc>https://ex.com/a</loc></urlset>").is_err());
}

#[test]
fn test_malformed_xml_falls_back_to_html() {
    let doc = xml_doc("<urlset><url><loc>https://ex.com/a</loc></url><br></urlset>");
    let urls = extract_urls(&doc).unwrap();
    assert_eq!(urls, vec!["https://ex.com/a"]);
}

#[test]
fn test_html_parser_collects_loc_text() {
    let urls = html::parse(
        "<html><body><p>Pages<br></p><loc>https://ex.com/a</loc><div><loc> https://ex.com/b </loc></div></body></html>",
    );
    assert_eq!(urls, vec!["https://ex.com/a", "https://ex.com/b"]);
}

#[test]
fn test_empty_sitemap_is_signalled() {
    let doc = xml_doc(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#);
    let err = extract_urls(&doc).unwrap_err();
    assert!(matches!(err, InsightsError::EmptySitemap { .. }));

    let doc = SitemapDocument::new(
        "https://ex.com/".to_string(),
        Some("text/html; charset=utf-8".to_string()),
        "<html><body><a href=\"/a\">A</a></body></html>".to_string(),
    );
    assert!(matches!(
        extract_urls(&doc),
        Err(InsightsError::EmptySitemap { .. })
    ));
}

#[test]
fn test_format_detection() {
    let cases = [
        (Some("application/xml"), "<urlset/>", SitemapFormat::Xml),
        (Some("text/xml; charset=UTF-8"), "<urlset/>", SitemapFormat::Xml),
        (Some("text/html"), "<urlset/>", SitemapFormat::Html),
        (None, "  <!DOCTYPE html><html></html>", SitemapFormat::Html),
        (None, "<HTML><body></body></HTML>", SitemapFormat::Html),
        (None, "<?xml version=\"1.0\"?><urlset/>", SitemapFormat::Xml),
        (Some("application/octet-stream"), "<urlset/>", SitemapFormat::Xml),
    ];

    for (content_type, body, expected) in cases {
        assert_eq!(
            SitemapFormat::detect(content_type, body),
            expected,
            "content type {:?} with body {:?}",
            content_type,
            body
        );
    }
}
