//! Caller authentication.
//!
//! The pipeline only asks an [`Authenticator`] who the caller is. The bundled
//! implementation accepts a fixed set of bearer tokens from configuration;
//! an identity-provider integration would implement the same trait.

use async_trait::async_trait;

/// Resolves request credentials to a user id
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `token` is the bearer token from the request, if any
    async fn authenticate(&self, token: Option<&str>) -> Option<String>;
}

/// Accepts any of a static list of bearer tokens.
#[derive(Debug, Clone, Default)]
pub struct BearerTokenAuthenticator {
    tokens: Vec<String>,
}

impl BearerTokenAuthenticator {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    async fn authenticate(&self, token: Option<&str>) -> Option<String> {
        let token = token?.trim();
        if token.is_empty() {
            return None;
        }
        self.tokens
            .iter()
            .position(|t| t == token)
            .map(|idx| format!("user-{}", idx + 1))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_tokens_resolve_to_users() {
        let auth = BearerTokenAuthenticator::new(vec!["alpha".into(), "beta".into()]);
        assert_eq!(auth.authenticate(Some("beta")).await.as_deref(), Some("user-2"));
        assert_eq!(auth.authenticate(Some("gamma")).await, None);
        assert_eq!(auth.authenticate(Some("")).await, None);
        assert_eq!(auth.authenticate(None).await, None);
    }

    #[tokio::test]
    async fn no_tokens_rejects_everyone() {
        let auth = BearerTokenAuthenticator::default();
        assert!(auth.is_empty());
        assert_eq!(auth.authenticate(Some("anything")).await, None);
    }

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
