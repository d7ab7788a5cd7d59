//! Auth header computation.
//!
//! A [`Credential`] names a header and where its token comes from. Headers
//! are recomputed for every fetch, so a [`TokenSource::Dynamic`] source can
//! rotate tokens between requests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use folio_core::AppConfig;

/// Header name to value, in a stable order.
pub type AuthHeaders = BTreeMap<String, String>;

/// Where a token comes from.
#[derive(Clone)]
pub enum TokenSource {
    /// A fixed token.
    Static(String),
    /// A function evaluated on every fetch.
    Dynamic(Arc<dyn Fn() -> String + Send + Sync>),
}

impl TokenSource {
    pub fn dynamic(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        TokenSource::Dynamic(Arc::new(f))
    }

    /// Current token value.
    pub fn resolve(&self) -> String {
        match self {
            TokenSource::Static(token) => token.clone(),
            TokenSource::Dynamic(f) => f(),
        }
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Static(_) => f.write_str("Static(<redacted>)"),
            TokenSource::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<&str> for TokenSource {
    fn from(token: &str) -> Self {
        TokenSource::Static(token.to_string())
    }
}

impl From<String> for TokenSource {
    fn from(token: String) -> Self {
        TokenSource::Static(token)
    }
}

/// Process-wide credential used to decorate fetches.
#[derive(Debug, Clone, Default)]
pub struct Credential {
    pub header_name: Option<String>,
    pub token: Option<TokenSource>,
}

impl Credential {
    pub fn new(header_name: Option<String>, token: Option<TokenSource>) -> Self {
        Self { header_name, token }
    }

    /// Build a credential from `auth_header` plus either `auth_token` or
    /// `auth_token_env`. The latter is re-read from the environment on every
    /// fetch.
    pub fn from_config(config: &AppConfig) -> Self {
        let token = match (&config.auth_token, &config.auth_token_env) {
            (Some(token), _) => Some(TokenSource::Static(token.clone())),
            (None, Some(var)) => {
                let var = var.clone();
                Some(TokenSource::dynamic(move || std::env::var(&var).unwrap_or_default()))
            }
            (None, None) => None,
        };

        Self { header_name: config.auth_header.clone(), token }
    }
}

/// Compute the auth headers for one fetch.
///
/// Empty when the header name or token source is missing, or when the token
/// resolves to an empty string.
pub fn compute_headers(credential: &Credential) -> AuthHeaders {
    let mut headers = AuthHeaders::new();

    let (Some(name), Some(source)) = (credential.header_name.as_deref(), credential.token.as_ref()) else {
        return headers;
    };
    if name.is_empty() {
        return headers;
    }

    let token = source.resolve();
    if !token.is_empty() {
        headers.insert(name.to_string(), token);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_static_token() {
        let credential = Credential::new(Some("X-API-KEY".into()), Some("abc".into()));
        let headers = compute_headers(&credential);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-API-KEY").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_dynamic_token_matches_static() {
        let credential = Credential::new(Some("X-API-KEY".into()), Some(TokenSource::dynamic(|| "abc".into())));
        let stat = Credential::new(Some("X-API-KEY".into()), Some("abc".into()));
        assert_eq!(compute_headers(&credential), compute_headers(&stat));
    }

    #[test]
    fn test_no_credential() {
        assert!(compute_headers(&Credential::default()).is_empty());
    }

    #[test]
    fn test_missing_parts() {
        assert!(compute_headers(&Credential::new(Some("X-API-KEY".into()), None)).is_empty());
        assert!(compute_headers(&Credential::new(None, Some("abc".into()))).is_empty());
        assert!(compute_headers(&Credential::new(Some(String::new()), Some("abc".into()))).is_empty());
    }

    #[test]
    fn test_empty_token_sends_nothing() {
        let credential = Credential::new(Some("Authorization".into()), Some(TokenSource::dynamic(String::new)));
        assert!(compute_headers(&credential).is_empty());
    }

    #[test]
    fn test_dynamic_token_evaluated_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let credential = Credential::new(
            Some("Authorization".into()),
            Some(TokenSource::dynamic(move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                format!("Bearer t{n}")
            })),
        );

        assert_eq!(compute_headers(&credential)["Authorization"], "Bearer t1");
        assert_eq!(compute_headers(&credential)["Authorization"], "Bearer t2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_config_static() {
        let config =
            AppConfig { auth_header: Some("X-API-KEY".into()), auth_token: Some("abc".into()), ..Default::default() };
        let headers = compute_headers(&Credential::from_config(&config));
        assert_eq!(headers["X-API-KEY"], "abc");
    }

    #[test]
    fn test_from_config_env_unset_sends_nothing() {
        let config = AppConfig {
            auth_header: Some("X-API-KEY".into()),
            auth_token_env: Some("FOLIO_TEST_TOKEN_THAT_IS_NEVER_SET".into()),
            ..Default::default()
        };
        assert!(compute_headers(&Credential::from_config(&config)).is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        let source = TokenSource::from("secret");
        assert!(!format!("{source:?}").contains("secret"));
    }
}
