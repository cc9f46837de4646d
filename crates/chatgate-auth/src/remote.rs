use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::AuthError;
use crate::provider::{CallerIdentity, IdentityProvider};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct RemoteUser {
    #[serde(default)]
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Asks the auth backend's user endpoint who owns a token.
///
/// Sends `GET <user_endpoint>` with the caller's bearer token and, when set,
/// the project `apikey` header. Any non-2xx answer means the token is not
/// valid.
pub struct RemoteIdentityProvider {
    http: reqwest::Client,
    user_endpoint: String,
    api_key: Option<String>,
}

impl RemoteIdentityProvider {
    pub fn new(
        http: reqwest::Client,
        user_endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            user_endpoint: user_endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn authenticate(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let mut request = self
            .http
            .get(&self.user_endpoint)
            .bearer_auth(token)
            .timeout(LOOKUP_TIMEOUT);
        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::IdentityService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "identity lookup rejected token");
            return Err(AuthError::InvalidToken(format!(
                "identity endpoint returned {status}"
            )));
        }

        let user: RemoteUser = response
            .json()
            .await
            .map_err(|e| AuthError::IdentityService(e.to_string()))?;

        if user.id.trim().is_empty() {
            return Err(AuthError::InvalidToken("identity has no id".to_string()));
        }

        Ok(CallerIdentity {
            id: user.id,
            email: user.email,
        })
    }
}
