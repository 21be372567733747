use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// Absolute http(s) URL with a non-empty authority.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:[a-zA-Z0-9]|[$-_@.&+]|[!*(),]|%[0-9a-fA-F]{2})+")
        .expect("valid URL pattern")
});

static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("valid scheme pattern"));

static URL_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*)://(?P<netloc>[^/?#]*)(?P<path>[^?#]*)")
        .expect("valid URL split pattern")
});

const DEFAULT_SCHEME: &str = "https";

/// Collapse every whitespace run to a single space and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validate and canonicalize a URL to `scheme://host/path`, dropping query
/// and fragment. A URL without a scheme is treated as https.
pub fn clean_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();
    let url = if SCHEME_PREFIX.is_match(url) {
        url.to_string()
    } else {
        format!("{DEFAULT_SCHEME}://{url}")
    };

    if !URL_PATTERN.is_match(&url) {
        return Err(ValidationError::InvalidUrl(url));
    }

    let parts = URL_PARTS
        .captures(&url)
        .ok_or_else(|| ValidationError::InvalidUrl(url.clone()))?;
    Ok(format!("{}://{}{}", &parts["scheme"], &parts["netloc"], &parts["path"]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(
            clean_text("  Multiple    spaces   and\nnewlines\r\n"),
            "Multiple spaces and newlines"
        );
        assert_eq!(clean_text("\t\n "), "");
        assert_eq!(clean_text("already clean"), "already clean");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        for s in ["a  b", " \u{a0}x\ty ", "", "one\n\ntwo  three ", "#tag  @user"] {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once);
        }
    }

    #[test]
    fn test_clean_url_defaults_to_https() {
        assert_eq!(clean_url("example.com/page").unwrap(), "https://example.com/page");
    }

    #[test]
    fn test_clean_url_scheme_only_counts_at_start() {
        assert_eq!(
            clean_url("example.com/go?next=https://other.com").unwrap(),
            "https://example.com/go"
        );
        assert_eq!(
            clean_url("example.com/a/http://b").unwrap(),
            "https://example.com/a/http://b"
        );
        assert!(clean_url("ftp://example.com/file").is_err());
    }

    #[test]
    fn test_clean_url_drops_query_and_fragment() {
        assert_eq!(
            clean_url("https://twitter.com/user/status/123?s=20#reply").unwrap(),
            "https://twitter.com/user/status/123"
        );
        assert_eq!(clean_url("http://Example.com:8080/a/b").unwrap(), "http://Example.com:8080/a/b");
        assert_eq!(clean_url("https://example.com").unwrap(), "https://example.com");
    }

    #[test]
    fn test_clean_url_rejects_missing_authority() {
        let err = clean_url("http://").unwrap_err();
        assert!(err.to_string().contains("Invalid URL format"));
        assert!(clean_url("ftp://example.com").is_err());
        assert!(clean_url("https:// spaced").is_err());
    }
}
