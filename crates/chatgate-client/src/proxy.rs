use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use chatgate_core::envelope::structured_reply_from_value;
use chatgate_core::models::reply::StructuredReply;
use chatgate_core::models::request::ChatCompleteRequest;
use chatgate_core::sanitize::non_empty_str;

use crate::error::ClientError;

/// Code reported when an error body carries none.
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN";

/// POSTs completion requests to the chatgate proxy.
///
/// A single attempt per call. POSTs are never retried, since a retry could
/// bill the provider twice.
#[derive(Debug, Clone)]
pub struct ProxyTransport {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl ProxyTransport {
    pub fn new(http: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            url: url.into(),
            timeout,
        }
    }

    pub async fn complete(
        &self,
        request: &ChatCompleteRequest,
        access_token: &str,
    ) -> Result<StructuredReply, ClientError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let error = proxy_error(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %error, "proxy completion failed");
            return Err(error);
        }

        structured_reply_from_value(&body).ok_or(ClientError::InvalidResponse)
    }
}

fn classify(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Network(e.to_string())
    }
}

/// Decode a `{message, code}` error body, tolerating anything else.
fn proxy_error(status: u16, body: &Value) -> ClientError {
    let code = non_empty_str(body.get("code")).unwrap_or(UNKNOWN_ERROR_CODE);
    let message = non_empty_str(body.get("message"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Chatbot request failed with status {status}."));

    ClientError::Proxy {
        status,
        code: code.to_string(),
        message,
    }
}
