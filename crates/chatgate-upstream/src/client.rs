use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use chatgate_core::envelope::{extract_output_text, to_upstream_error_message};
use chatgate_core::models::request::ChatCompleteRequest;

use crate::error::UpstreamError;
use crate::request::{UpstreamMetadata, build_request_body};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/responses";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Where and how to reach the provider.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub endpoint: String,
    pub model: String,
    /// Missing keys are reported per call as [`UpstreamError::MissingApiKey`].
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    settings: UpstreamSettings,
}

impl UpstreamClient {
    pub fn new(http: reqwest::Client, settings: UpstreamSettings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &UpstreamSettings {
        &self.settings
    }

    /// Send one completion request and return the model's output text.
    ///
    /// The whole exchange, including reading the body, runs under the
    /// configured timeout. On expiry the request future is dropped, which
    /// aborts the connection. Nothing is retried.
    pub async fn complete(
        &self,
        request: &ChatCompleteRequest,
        metadata: UpstreamMetadata<'_>,
    ) -> Result<String, UpstreamError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(UpstreamError::MissingApiKey)?;

        let body = build_request_body(&self.settings.model, request, metadata);
        let timeout = self.settings.timeout;

        let exchange = async {
            let response = self
                .http
                .post(&self.settings.endpoint)
                .bearer_auth(api_key)
                .json(&body)
                .send()
                .await?;
            let status = response.status();
            let payload = response.json::<Value>().await.unwrap_or(Value::Null);
            Ok::<_, reqwest::Error>((status, payload))
        };

        let (status, payload) = match tokio::time::timeout(timeout, exchange).await {
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "upstream request timed out");
                return Err(UpstreamError::Timeout(timeout));
            }
            Ok(Err(e)) if e.is_timeout() => {
                warn!(timeout_ms = timeout.as_millis() as u64, "upstream request timed out");
                return Err(UpstreamError::Timeout(timeout));
            }
            Ok(Err(e)) => {
                warn!(error = %e, "upstream request failed");
                return Err(UpstreamError::Network(e.to_string()));
            }
            Ok(Ok(exchanged)) => exchanged,
        };

        if !status.is_success() {
            let message = to_upstream_error_message(&payload);
            warn!(status = status.as_u16(), message = %message, "upstream returned an error");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let text = extract_output_text(&payload).ok_or(UpstreamError::EmptyResponse)?;
        info!(
            model = %self.settings.model,
            output_len = text.len(),
            "upstream completion received"
        );

        Ok(text)
    }
}
