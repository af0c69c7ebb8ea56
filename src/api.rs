use tracing::info;

use crate::errors::HarnessError;

/// One-call REST client for the JSON API smoke test.
///
/// No retry, no timeout override, no auth; transport and decode failures
/// surface as [`HarnessError::Transport`] with the cause chained.
pub struct ApiClient {
    http: reqwest::Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        ApiClient {
            http: reqwest::Client::new(),
        }
    }

    /// GET `uri` and decode the body as a JSON tree
    pub async fn get_json(&self, uri: &str) -> Result<serde_json::Value, HarnessError> {
        info!("get_json for '{}' started", uri);

        let response = self.http.get(uri).send().await.map_err(|e| {
            HarnessError::Transport {
                uri: uri.to_string(),
                cause: e.into(),
            }
        })?;

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| HarnessError::Transport {
                uri: uri.to_string(),
                cause: e.into(),
            })?;

        info!("get_json for '{}' succeeded", uri);
        Ok(body)
    }
}
