//! `POST /chatbot-complete`.
//!
//! Request lifecycle: authenticate (extractor) → parse body → rate check →
//! upstream call → sanitize → respond. Every outcome after the body parse is
//! audited with the elapsed time and the rate-limit snapshot.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::Value;

use chatgate_audit::events::{AuditContext, AuditOutcome, build_audit_event};
use chatgate_audit::rate_limit::RateLimitDecision;
use chatgate_core::models::reply::StructuredReply;
use chatgate_core::models::request::ChatCompleteRequest;
use chatgate_core::sanitize::{parse_request_payload, parse_structured_reply};
use chatgate_upstream::request::UpstreamMetadata;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::middleware::access_log::RequestId;
use crate::state::AppState;

/// Metadata `source` attached to provider calls made by the proxy.
pub const PROXY_SOURCE: &str = "chatbot-complete";

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub success: bool,
    pub data: StructuredReply,
}

/// Complete one chat turn on behalf of the authenticated caller.
pub async fn complete(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    caller: AuthUser,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CompleteResponse>, ApiError> {
    // Oversized or unreadable bodies are invalid requests like malformed JSON.
    let body = body.map_err(|_| ApiError::InvalidRequest)?;
    let raw: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let request = parse_request_payload(&raw).ok_or(ApiError::InvalidRequest)?;

    let mut audit = RequestAudit {
        state: &state,
        request_id: request_id.to_string(),
        user_id: &caller.id,
        request: &request,
        started: Instant::now(),
        rate_limit: None,
    };

    let decision = state.rate_limiter.check(&caller.id);
    audit.rate_limit = Some(decision);
    if !decision.allowed {
        let err = ApiError::RateLimited {
            retry_after_seconds: decision.retry_after_seconds.unwrap_or(1),
        };
        audit.record(err.audit_outcome(), Some(err.code()));
        return Err(err);
    }

    match run_completion(&state, &caller, &request).await {
        Ok(reply) => {
            audit.record(AuditOutcome::Success, None);
            Ok(Json(CompleteResponse {
                success: true,
                data: reply,
            }))
        }
        Err(err) => {
            audit.record(err.audit_outcome(), Some(err.code()));
            Err(err)
        }
    }
}

async fn run_completion(
    state: &AppState,
    caller: &AuthUser,
    request: &ChatCompleteRequest,
) -> Result<StructuredReply, ApiError> {
    let metadata = UpstreamMetadata {
        source: PROXY_SOURCE,
        user_id: &caller.id,
    };
    let output_text = state.upstream.complete(request, metadata).await?;

    Ok(parse_structured_reply(&output_text)?)
}

/// Per-request audit bookkeeping.
struct RequestAudit<'a> {
    state: &'a AppState,
    request_id: String,
    user_id: &'a str,
    request: &'a ChatCompleteRequest,
    started: Instant,
    rate_limit: Option<RateLimitDecision>,
}

impl RequestAudit<'_> {
    fn record(&self, outcome: AuditOutcome, error_code: Option<&str>) {
        let context = AuditContext {
            request_id: &self.request_id,
            user_id: self.user_id,
            outcome,
            history_count: self.request.history.len(),
            duration_ms: self.started.elapsed().as_millis() as u64,
            error_code,
            rate_limit: self.rate_limit,
            input: &self.request.input,
        };

        if let Some(event) = build_audit_event(self.state.audit_mode, &context) {
            event.emit();
        }
    }
}
