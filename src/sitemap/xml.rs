use crate::results::PageUrl;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;

const LOC: &[u8] = b"loc";

/// Parses an XML sitemap and returns the text of every `loc` element.
///
/// Elements are matched on their local name, so `<sm:loc>` counts too.
/// Returns an error message if the document is not well-formed.
pub fn parse(text: &str) -> Result<Vec<PageUrl>, String> {
    let mut reader = Reader::from_str(text);
    let mut urls = Vec::new();
    let mut current: Option<String> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return Err(format!("{} at position {}", e, reader.error_position())),
        };

        match event {
            Event::Start(e) if e.local_name().as_ref() == LOC => {
                current = Some(String::new());
            }
            Event::Empty(e) if e.local_name().as_ref() == LOC => {
                urls.push(String::new());
            }
            Event::End(e) if e.local_name().as_ref() == LOC => {
                if let Some(loc) = current.take() {
                    urls.push(loc.trim().to_string());
                }
            }
            Event::Text(e) => {
                if let Some(loc) = current.as_mut() {
                    loc.push_str(&e.decode().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(e) => {
                if let Some(loc) = current.as_mut() {
                    loc.push_str(&e.decode().map_err(|e| e.to_string())?);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(loc) = current.as_mut() {
                    if let Some(ch) = e.resolve_char_ref().map_err(|e| e.to_string())? {
                        loc.push(ch);
                    } else {
                        let name = e.decode().map_err(|e| e.to_string())?;
                        match resolve_predefined_entity(&name) {
                            Some(value) => loc.push_str(value),
                            None => {
                                loc.push('&');
                                loc.push_str(&name);
                                loc.push(';');
                            }
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    ::log::debug!("XML parser found {} loc elements", urls.len());
    Ok(urls)
}
