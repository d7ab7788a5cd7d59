//! Resource key to URL resolution.

use url::Url;

/// Error type for key resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("relative key `{0}` needs a base URL")]
    MissingBase(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a resource key to an absolute http(s) URL.
///
/// Absolute keys are used as-is (minus the fragment). Relative keys such as
/// `./data/book.json` are joined onto `base`.
pub fn resolve(key: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let trimmed = key.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| UrlError::MissingBase(trimmed.to_string()))?;
            base.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?
        }
        Err(e) => return Err(UrlError::InvalidUrl(e.to_string())),
    };

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://books.test/reader/index.html").unwrap()
    }

    #[test]
    fn test_resolve_absolute() {
        let url = resolve("https://books.test/data/book.json", None).unwrap();
        assert_eq!(url.as_str(), "https://books.test/data/book.json");
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let url = resolve("./data/leo-cdp-doc.json", Some(&base())).unwrap();
        assert_eq!(url.as_str(), "https://books.test/reader/data/leo-cdp-doc.json");

        let url = resolve("/data/book.json", Some(&base())).unwrap();
        assert_eq!(url.as_str(), "https://books.test/data/book.json");
    }

    #[test]
    fn test_resolve_relative_without_base() {
        let result = resolve("./data/book.json", None);
        assert!(matches!(result, Err(UrlError::MissingBase(_))));
    }

    #[test]
    fn test_resolve_absolute_ignores_base() {
        let url = resolve("http://other.test/book.json", Some(&base())).unwrap();
        assert_eq!(url.host_str(), Some("other.test"));
    }

    #[test]
    fn test_resolve_removes_fragment_keeps_query() {
        let url = resolve("https://books.test/book.json?v=2#book$x$y", None).unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("v=2"));
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let result = resolve("file:///etc/passwd", None);
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve("", None), Err(UrlError::Empty)));
        assert!(matches!(resolve("   ", Some(&base())), Err(UrlError::Empty)));
    }
}
