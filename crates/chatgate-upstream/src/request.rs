use serde::Serialize;

use chatgate_core::models::request::ChatCompleteRequest;
use chatgate_core::prompt::SYSTEM_PROMPT;

/// Body of the provider completion request.
#[derive(Debug, Serialize)]
pub struct UpstreamRequestBody<'a> {
    pub model: &'a str,
    pub input: Vec<UpstreamMessage<'a>>,
    pub metadata: UpstreamMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub struct UpstreamMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Tags the call with where it came from and on whose behalf.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamMetadata<'a> {
    pub source: &'a str,
    pub user_id: &'a str,
}

/// System prompt first, then the caller's history, then the new input.
pub fn build_request_body<'a>(
    model: &'a str,
    request: &'a ChatCompleteRequest,
    metadata: UpstreamMetadata<'a>,
) -> UpstreamRequestBody<'a> {
    let mut input = Vec::with_capacity(request.history.len() + 2);
    input.push(UpstreamMessage {
        role: "system",
        content: SYSTEM_PROMPT,
    });
    input.extend(request.history.iter().map(|item| UpstreamMessage {
        role: item.role.as_str(),
        content: &item.text,
    }));
    input.push(UpstreamMessage {
        role: "user",
        content: &request.input,
    });

    UpstreamRequestBody {
        model,
        input,
        metadata,
    }
}
