use std::time::Duration;

use chatgate_upstream::client::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT, UpstreamSettings};

/// Where completions come from, as configured by the embedding app.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    /// URL of the completion proxy. Takes precedence over everything else.
    pub proxy_url: Option<String>,
    /// Provider key for direct mode. Ignored unless `allow_direct` is set.
    pub direct_api_key: Option<String>,
    pub allow_direct: bool,
    pub upstream_endpoint: String,
    pub upstream_model: String,
    pub timeout: Duration,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            proxy_url: None,
            direct_api_key: None,
            allow_direct: false,
            upstream_endpoint: DEFAULT_ENDPOINT.to_string(),
            upstream_model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CompletionSettings {
    pub(crate) fn upstream(&self, api_key: &str) -> UpstreamSettings {
        UpstreamSettings {
            endpoint: self.upstream_endpoint.clone(),
            model: self.upstream_model.clone(),
            api_key: Some(api_key.to_string()),
            timeout: self.timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionMode {
    Proxy { url: String },
    Direct { api_key: String },
    Mock,
}

impl CompletionMode {
    /// Proxy if a proxy URL is set, direct only when a key is present and
    /// direct calls were explicitly allowed, mock otherwise.
    pub fn resolve(settings: &CompletionSettings) -> Self {
        if let Some(url) = non_blank(settings.proxy_url.as_deref()) {
            return CompletionMode::Proxy {
                url: url.to_string(),
            };
        }

        match non_blank(settings.direct_api_key.as_deref()) {
            Some(api_key) if settings.allow_direct => CompletionMode::Direct {
                api_key: api_key.to_string(),
            },
            _ => CompletionMode::Mock,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionMode::Proxy { .. } => "proxy",
            CompletionMode::Direct { .. } => "direct",
            CompletionMode::Mock => "mock",
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
