use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

/// Per-request id, assigned before any handler runs. Audit events reuse it,
/// and every log line written while the request is handled carries it in
/// the `request` span, including the error line for a caught panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

/// Request logging middleware.
///
/// Logs method, path, status and latency for every request. Never logs
/// headers or bodies; caller-level detail belongs in audit events.
pub async fn access_log(mut req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();
    let request_id = Uuid::new_v4();
    req.extensions_mut().insert(RequestId(request_id));

    let span = tracing::info_span!("request", request_id = %request_id);
    let started = Instant::now();

    let response = next.run(req).instrument(span.clone()).await;

    let status = response.status().as_u16();
    span.in_scope(|| {
        tracing::info!(
            method = %method,
            path = %uri,
            status = status,
            latency_ms = started.elapsed().as_millis() as u64,
            "api_request"
        );
    });

    response
}
