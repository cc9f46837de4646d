use serde::Serialize;
use tracing::{Level, event};

use crate::rate_limit::RateLimitDecision;
use crate::redact::redact_audit_text;

/// Name carried by every completion audit event.
pub const COMPLETION_EVENT: &str = "chatbot_complete";

/// How much the proxy writes to the audit sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLogMode {
    /// No audit events at all.
    None,
    /// Request metadata only, never user text.
    #[default]
    Metadata,
    /// Metadata plus a redacted preview of the input.
    RedactedInput,
}

/// Strict allow-list parse of the operator setting. Anything unrecognized,
/// including an absent value, is [`AuditLogMode::Metadata`].
pub fn resolve_audit_log_mode(value: Option<&str>) -> AuditLogMode {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("none") => AuditLogMode::None,
        Some("redacted_input") => AuditLogMode::RedactedInput,
        _ => AuditLogMode::Metadata,
    }
}

/// Terminal state of one proxied request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    RateLimited,
    ConfigError,
    UpstreamTimeout,
    UpstreamNetworkError,
    UpstreamError,
    UpstreamEmptyResponse,
    InternalError,
}

impl AuditOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::RateLimited => "rate_limited",
            AuditOutcome::ConfigError => "config_error",
            AuditOutcome::UpstreamTimeout => "upstream_timeout",
            AuditOutcome::UpstreamNetworkError => "upstream_network_error",
            AuditOutcome::UpstreamError => "upstream_error",
            AuditOutcome::UpstreamEmptyResponse => "upstream_empty_response",
            AuditOutcome::InternalError => "internal_error",
        }
    }
}

/// Everything known about a request at the point an event is built.
#[derive(Debug, Clone)]
pub struct AuditContext<'a> {
    pub request_id: &'a str,
    pub user_id: &'a str,
    pub outcome: AuditOutcome,
    pub history_count: usize,
    pub duration_ms: u64,
    pub error_code: Option<&'a str>,
    pub rate_limit: Option<RateLimitDecision>,
    /// Raw user input. Only ever leaves this crate through
    /// [`redact_audit_text`].
    pub input: &'a str,
}

/// A structured audit record, serialized in the same camelCase shape the
/// rest of the wire protocol uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub event: &'static str,
    pub request_id: String,
    pub user_id: String,
    pub outcome: AuditOutcome,
    pub history_count: usize,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_preview: Option<String>,
}

/// Build the event for `context`, or `None` when `mode` disables auditing.
pub fn build_audit_event(mode: AuditLogMode, context: &AuditContext<'_>) -> Option<AuditEvent> {
    if mode == AuditLogMode::None {
        return None;
    }

    let input_preview =
        (mode == AuditLogMode::RedactedInput).then(|| redact_audit_text(context.input));

    Some(AuditEvent {
        event: COMPLETION_EVENT,
        request_id: context.request_id.to_string(),
        user_id: context.user_id.to_string(),
        outcome: context.outcome,
        history_count: context.history_count,
        duration_ms: context.duration_ms,
        error_code: context.error_code.map(str::to_string),
        rate_limit: context.rate_limit,
        input_preview,
    })
}

impl AuditEvent {
    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        let rate_limit = self.rate_limit.as_ref();
        event!(
            target: "chatgate::audit",
            Level::INFO,
            audit.event = self.event,
            audit.request_id = %self.request_id,
            audit.user_id = %self.user_id,
            audit.outcome = self.outcome.as_str(),
            audit.history_count = self.history_count,
            audit.duration_ms = self.duration_ms,
            audit.error_code = self.error_code.as_deref(),
            audit.rate_limit.limit = rate_limit.map(|r| r.limit),
            audit.rate_limit.remaining = rate_limit.map(|r| r.remaining),
            audit.rate_limit.retry_after_seconds = rate_limit.and_then(|r| r.retry_after_seconds),
            audit.input_preview = self.input_preview.as_deref(),
            "audit event"
        );
    }
}
