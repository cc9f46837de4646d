use serde_json::json;
use tracing::{debug, info};

use chatgate_core::models::message::{ChatMessage, history_items};
use chatgate_core::models::reply::StructuredReply;
use chatgate_core::models::request::ChatCompleteRequest;
use chatgate_core::sanitize::{parse_request_payload, parse_structured_reply};
use chatgate_upstream::client::UpstreamClient;
use chatgate_upstream::request::UpstreamMetadata;

use crate::error::ClientError;
use crate::mock::mock_reply;
use crate::mode::{CompletionMode, CompletionSettings};
use crate::proxy::ProxyTransport;

/// Metadata `source` attached to provider calls made in direct mode.
pub const DIRECT_SOURCE: &str = "mobile-direct";

/// Stand-in `userId` for direct calls, which have no verified caller.
const DIRECT_USER_ID: &str = "local-user";

enum Backend {
    Proxy(ProxyTransport),
    Direct(UpstreamClient),
    Mock,
}

/// Completes chat turns through whichever backend the settings select.
pub struct CompletionService {
    mode: CompletionMode,
    backend: Backend,
}

impl CompletionService {
    pub fn new(settings: &CompletionSettings, http: reqwest::Client) -> Self {
        let mode = CompletionMode::resolve(settings);
        let backend = match &mode {
            CompletionMode::Proxy { url } => {
                Backend::Proxy(ProxyTransport::new(http, url.clone(), settings.timeout))
            }
            CompletionMode::Direct { api_key } => {
                Backend::Direct(UpstreamClient::new(http, settings.upstream(api_key)))
            }
            CompletionMode::Mock => Backend::Mock,
        };
        info!(mode = mode.as_str(), "completion backend selected");

        Self { mode, backend }
    }

    pub fn mode(&self) -> &CompletionMode {
        &self.mode
    }

    /// Complete one turn. `history` is the conversation so far, not
    /// including `input`. An access token is required in proxy mode only.
    pub async fn complete(
        &self,
        input: &str,
        history: &[ChatMessage],
        access_token: Option<&str>,
    ) -> Result<StructuredReply, ClientError> {
        let request = build_request(input, history)?;
        debug!(
            mode = self.mode.as_str(),
            history = request.history.len(),
            "completing chat turn"
        );

        match &self.backend {
            Backend::Proxy(proxy) => {
                let token = access_token
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or(ClientError::MissingAccessToken)?;
                proxy.complete(&request, token).await
            }
            Backend::Direct(upstream) => {
                let metadata = UpstreamMetadata {
                    source: DIRECT_SOURCE,
                    user_id: DIRECT_USER_ID,
                };
                let output_text = upstream.complete(&request, metadata).await?;
                Ok(parse_structured_reply(&output_text)?)
            }
            Backend::Mock => Ok(mock_reply(&request.input)),
        }
    }
}

/// Run the outgoing turn through the same validation the proxy applies.
fn build_request(input: &str, history: &[ChatMessage]) -> Result<ChatCompleteRequest, ClientError> {
    let payload = json!({
        "input": input,
        "history": history_items(history),
    });
    parse_request_payload(&payload).ok_or(ClientError::EmptyInput)
}
