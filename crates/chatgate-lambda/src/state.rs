use std::sync::Arc;

use chatgate_audit::events::AuditLogMode;
use chatgate_audit::rate_limit::RateLimiter;
use chatgate_auth::jwt::JwtIdentityProvider;
use chatgate_auth::provider::{IdentityProvider, RejectAllIdentityProvider};
use chatgate_auth::remote::RemoteIdentityProvider;
use chatgate_upstream::client::UpstreamClient;

use crate::config::{IdentitySource, ProxyConfig};

/// Shared application state, injected into all route handlers via Axum state.
///
/// The rate limiter is constructed once per process and shared by every
/// request that process serves.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub identity: Arc<dyn IdentityProvider>,
    pub rate_limiter: Arc<RateLimiter>,
    pub audit_mode: AuditLogMode,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig, http: reqwest::Client) -> Self {
        let identity: Arc<dyn IdentityProvider> = match &config.identity {
            IdentitySource::Jwt { secret, audience } => {
                Arc::new(JwtIdentityProvider::new(secret, audience))
            }
            IdentitySource::Remote {
                user_endpoint,
                api_key,
            } => Arc::new(RemoteIdentityProvider::new(
                http.clone(),
                user_endpoint.clone(),
                api_key.clone(),
            )),
            IdentitySource::Unconfigured => {
                tracing::warn!("no identity source configured; all requests will be rejected");
                Arc::new(RejectAllIdentityProvider)
            }
        };

        if config.upstream.api_key.is_none() {
            tracing::warn!("CHATBOT_API_KEY is not set; completions will fail with CONFIG_ERROR");
        }

        Self {
            upstream: UpstreamClient::new(http, config.upstream.clone()),
            identity,
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit)),
            audit_mode: config.audit_mode,
        }
    }
}
