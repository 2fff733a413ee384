// Credential acquisition module
// Author: kelexine (https://github.com/kelexine)

mod chain;
mod cli;

pub use chain::{ApiKeyCredential, ChainedCredential};
pub use cli::{CliCredential, CliTool};

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::RequestBuilder;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Produces the authentication header for inference requests.
///
/// Implementations delegate to an external identity provider; nothing here
/// performs a login flow of its own.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Short name used in logs and chain error reports.
    fn name(&self) -> &str;

    async fn get_auth(&self) -> Result<AuthHeader>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Bearer,
    ApiKey,
}

/// A ready-to-send credential header.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AuthHeader {
    #[zeroize(skip)]
    kind: AuthKind,
    secret: String,
}

impl AuthHeader {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            kind: AuthKind::Bearer,
            secret: token.into(),
        }
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            kind: AuthKind::ApiKey,
            secret: key.into(),
        }
    }

    pub fn kind(&self) -> AuthKind {
        self.kind
    }

    pub fn header_name(&self) -> &'static str {
        match self.kind {
            AuthKind::Bearer => "Authorization",
            AuthKind::ApiKey => "api-key",
        }
    }

    pub fn header_value(&self) -> String {
        match self.kind {
            AuthKind::Bearer => format!("Bearer {}", self.secret),
            AuthKind::ApiKey => self.secret.clone(),
        }
    }

    /// Attach this credential to an outgoing request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(self.header_name(), self.header_value())
    }
}

// Custom Debug impl that never logs secrets
impl std::fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeader")
            .field("kind", &self.kind)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// A bearer token with its expiry, as handed out by an identity provider.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessToken {
    pub token: String,
    #[zeroize(skip)]
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Check if token is expired or will expire within buffer seconds
    pub fn is_expired(&self, buffer_seconds: i64) -> bool {
        let now = Utc::now().timestamp();
        self.expires_at.timestamp() - now < buffer_seconds
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_header_shapes() {
        let bearer = AuthHeader::bearer("eyJ0eXAi");
        assert_eq!(bearer.header_name(), "Authorization");
        assert_eq!(bearer.header_value(), "Bearer eyJ0eXAi");

        let key = AuthHeader::api_key("abc123");
        assert_eq!(key.header_name(), "api-key");
        assert_eq!(key.header_value(), "abc123");
    }

    #[test]
    fn test_debug_impl_masks_secrets() {
        let header = format!("{:?}", AuthHeader::api_key("super-secret"));
        assert!(header.contains("[REDACTED]"));
        assert!(!header.contains("super-secret"));

        let token = AccessToken {
            token: "eyJhbGciOiJSUzI1NiI".to_string(),
            expires_at: Utc::now(),
        };
        assert!(!format!("{:?}", token).contains("eyJhbGci"));
    }

    #[test]
    fn test_expiry_detection() {
        let token = AccessToken {
            token: "t".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        };
        assert!(!token.is_expired(0));
        assert!(!token.is_expired(300));
        assert!(token.is_expired(3700));
    }
}
