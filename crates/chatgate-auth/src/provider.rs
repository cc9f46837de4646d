use async_trait::async_trait;

use crate::error::AuthError;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Stable identifier, used as the rate-limit key and in audit events.
    pub id: String,
    pub email: Option<String>,
}

/// Exchanges a bearer token for a [`CallerIdentity`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<CallerIdentity, AuthError>;
}

/// Rejects every token. Used when no identity source is configured so the
/// proxy fails closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAllIdentityProvider;

#[async_trait]
impl IdentityProvider for RejectAllIdentityProvider {
    async fn authenticate(&self, _token: &str) -> Result<CallerIdentity, AuthError> {
        Err(AuthError::NotConfigured)
    }
}
