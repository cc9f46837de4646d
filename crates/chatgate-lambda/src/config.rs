use std::env;
use std::time::Duration;

use chatgate_audit::events::{AuditLogMode, resolve_audit_log_mode};
use chatgate_audit::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_MS, RateLimitSettings};
use chatgate_auth::jwt::DEFAULT_AUDIENCE;
use chatgate_upstream::client::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT, UpstreamSettings};

pub const DEFAULT_LOCAL_ADDR: &str = "127.0.0.1:8787";

/// How callers are authenticated.
#[derive(Clone)]
pub enum IdentitySource {
    /// Verify HS256 session tokens locally.
    Jwt { secret: String, audience: String },
    /// Ask the auth backend's user endpoint.
    Remote {
        user_endpoint: String,
        api_key: Option<String>,
    },
    /// Nothing configured; every caller is rejected.
    Unconfigured,
}

/// Operator configuration, read once per process.
#[derive(Clone)]
pub struct ProxyConfig {
    pub upstream: UpstreamSettings,
    pub rate_limit: RateLimitSettings,
    pub audit_mode: AuditLogMode,
    pub identity: IdentitySource,
    pub local_addr: String,
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset and
    /// malformed numbers fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let number = |key: &str| get(key).and_then(|v| v.parse::<i64>().ok());

        let timeout = number("CHATBOT_TIMEOUT_MS")
            .and_then(|ms| u64::try_from(ms).ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);

        let upstream = UpstreamSettings {
            endpoint: get("CHATBOT_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: get("CHATBOT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: get("CHATBOT_API_KEY"),
            timeout,
        };

        let rate_limit = RateLimitSettings::new(
            number("CHATBOT_RATE_LIMIT_WINDOW_MS").unwrap_or(DEFAULT_WINDOW_MS),
            number("CHATBOT_RATE_LIMIT_MAX_REQUESTS").unwrap_or(i64::from(DEFAULT_MAX_REQUESTS)),
        );

        let identity = match (get("AUTH_JWT_SECRET"), get("AUTH_USER_ENDPOINT")) {
            (Some(secret), _) => IdentitySource::Jwt {
                secret,
                audience: get("AUTH_JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            },
            (None, Some(user_endpoint)) => IdentitySource::Remote {
                user_endpoint,
                api_key: get("AUTH_API_KEY"),
            },
            (None, None) => IdentitySource::Unconfigured,
        };

        Self {
            upstream,
            rate_limit,
            audit_mode: resolve_audit_log_mode(get("CHATBOT_AUDIT_LOG_MODE").as_deref()),
            identity,
            local_addr: get("CHATGATE_LOCAL_ADDR").unwrap_or_else(|| DEFAULT_LOCAL_ADDR.to_string()),
        }
    }
}
