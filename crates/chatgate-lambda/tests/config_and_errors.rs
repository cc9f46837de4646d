use std::collections::HashMap;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use chatgate_audit::events::AuditLogMode;
use chatgate_lambda::config::{IdentitySource, ProxyConfig};
use chatgate_lambda::error::ApiError;
use chatgate_lambda::extract::bearer_token;
use chatgate_lambda::middleware::panic::handle_panic;

fn config(pairs: &[(&str, &str)]) -> ProxyConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ProxyConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let config = config(&[]);
    assert_eq!(config.upstream.endpoint, "https://api.openai.com/v1/responses");
    assert!(config.upstream.api_key.is_none());
    assert_eq!(config.upstream.timeout, Duration::from_millis(15_000));
    assert_eq!(config.rate_limit.window_ms(), 60_000);
    assert_eq!(config.rate_limit.max_requests(), 20);
    assert_eq!(config.audit_mode, AuditLogMode::Metadata);
    assert!(matches!(config.identity, IdentitySource::Unconfigured));
}

#[test]
fn bad_numbers_fall_back_to_defaults() {
    let config = config(&[
        ("CHATBOT_TIMEOUT_MS", "-5"),
        ("CHATBOT_RATE_LIMIT_WINDOW_MS", "soon"),
        ("CHATBOT_RATE_LIMIT_MAX_REQUESTS", "0"),
        ("CHATBOT_API_KEY", "   "),
    ]);
    assert_eq!(config.upstream.timeout, Duration::from_millis(15_000));
    assert_eq!(config.rate_limit.window_ms(), 60_000);
    assert_eq!(config.rate_limit.max_requests(), 20);
    assert!(config.upstream.api_key.is_none());
}

#[test]
fn explicit_values_are_used() {
    let config = config(&[
        ("CHATBOT_UPSTREAM_URL", "https://llm.internal/v1/responses"),
        ("CHATBOT_MODEL", "house-model"),
        ("CHATBOT_API_KEY", "sk-live"),
        ("CHATBOT_TIMEOUT_MS", "8000"),
        ("CHATBOT_RATE_LIMIT_WINDOW_MS", "30000"),
        ("CHATBOT_RATE_LIMIT_MAX_REQUESTS", "5"),
        ("CHATBOT_AUDIT_LOG_MODE", "redacted_input"),
        ("AUTH_JWT_SECRET", "s3cret"),
    ]);
    assert_eq!(config.upstream.model, "house-model");
    assert_eq!(config.upstream.api_key.as_deref(), Some("sk-live"));
    assert_eq!(config.upstream.timeout, Duration::from_millis(8_000));
    assert_eq!(config.rate_limit.window_ms(), 30_000);
    assert_eq!(config.rate_limit.max_requests(), 5);
    assert_eq!(config.audit_mode, AuditLogMode::RedactedInput);
    assert!(matches!(
        config.identity,
        IdentitySource::Jwt { ref audience, .. } if audience == "authenticated"
    ));
}

#[test]
fn remote_identity_is_used_without_a_jwt_secret() {
    let config = config(&[
        ("AUTH_USER_ENDPOINT", "https://auth.example.com/auth/v1/user"),
        ("AUTH_API_KEY", "anon"),
    ]);
    assert!(matches!(
        config.identity,
        IdentitySource::Remote { ref api_key, .. } if api_key.as_deref() == Some("anon")
    ));
}

#[test]
fn bearer_token_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
    assert_eq!(bearer_token(&headers), Some("abc.def"));

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer   xyz "));
    assert_eq!(bearer_token(&headers), Some("xyz"));

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
    assert_eq!(bearer_token(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
    assert_eq!(bearer_token(&headers), None);
}

#[test]
fn error_codes_and_statuses() {
    let cases = [
        (ApiError::InvalidRequest, StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        (ApiError::Unauthorized, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        (ApiError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED"),
        (
            ApiError::RateLimited { retry_after_seconds: 3 },
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
        ),
        (ApiError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        (ApiError::Upstream("x".into()), StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        (
            ApiError::UpstreamNetwork("x".into()),
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_NETWORK_ERROR",
        ),
        (
            ApiError::UpstreamEmptyResponse,
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_EMPTY_RESPONSE",
        ),
        (ApiError::UpstreamTimeout, StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
        (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    ];

    for (error, status, code) in cases {
        assert_eq!(error.status(), status);
        assert_eq!(error.code(), code);
    }
}

#[test]
fn panics_become_internal_errors() {
    let response = handle_panic(Box::new("boom"));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
