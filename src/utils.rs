use regex::Regex;
use std::sync::LazyLock;

/// Matches an explicit `scheme://` prefix (RFC 3986 scheme characters)
static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid scheme regex"));

/// Normalize a user supplied URL, assuming `https://` when no scheme is given
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if SCHEME_PREFIX.is_match(trimmed) {
        trimmed.to_string()
    } else {
        ::log::debug!("No scheme in {:?}, assuming https", trimmed);
        format!("https://{}", trimmed.trim_start_matches('/'))
    }
}

/// Shorten a URL for single-line progress output
pub fn truncate_url(url: &str, max_chars: usize) -> String {
    if url.chars().count() <= max_chars {
        return url.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut short: String = url.chars().take(keep).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(
            normalize_url("example.com/sitemap.xml"),
            "https://example.com/sitemap.xml"
        );
        assert_eq!(
            normalize_url("  example.com/sitemap.xml \n"),
            "https://example.com/sitemap.xml"
        );
        // Protocol-relative input keeps only the host part
        assert_eq!(
            normalize_url("//example.com/sitemap.xml"),
            "https://example.com/sitemap.xml"
        );
    }

    #[test]
    fn test_normalize_url_keeps_existing_scheme() {
        assert_eq!(
            normalize_url("http://example.com/sitemap.xml"),
            "http://example.com/sitemap.xml"
        );
        assert_eq!(
            normalize_url("HTTPS://example.com/sitemap.xml"),
            "HTTPS://example.com/sitemap.xml"
        );
    }

    #[test]
    fn test_truncate_url() {
        assert_eq!(truncate_url("https://ex.com/a", 40), "https://ex.com/a");
        assert_eq!(truncate_url("https://example.com/long/path", 12), "https://e...");
    }
}
