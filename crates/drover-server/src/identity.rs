use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Credentials extracted from a request.
#[derive(Clone, Debug)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| Self::Bearer(token.to_string()))
            .unwrap_or(Self::Anonymous)
    }
}

/// Resolves request credentials to the opaque acting-user string stamped
/// into `created_by`. The token scheme itself lives outside this system.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, credentials: &Credentials) -> Option<String>;
}

/// Default provider: any bearer token names its caller, anonymous
/// requests act without an identity.
pub struct AllowAllIdentity;

#[async_trait]
impl IdentityProvider for AllowAllIdentity {
    async fn resolve(&self, credentials: &Credentials) -> Option<String> {
        match credentials {
            Credentials::Bearer(token) => {
                Some(format!("bearer:{}", &token[..8.min(token.len())]))
            }
            Credentials::Anonymous => None,
        }
    }
}
