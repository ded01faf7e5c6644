//! RemoteBackend: preview via HTTP against `prompt-template serve`.

use std::time::Duration;

use async_trait::async_trait;
use prompt_template::{PreviewRequest, PreviewResponse, PromptFunctionDoc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::PreviewBackend;
use crate::CliError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone, Debug)]
pub struct RemoteBackend {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteBackend {
    /// `base_url` includes any base path, e.g. `http://127.0.0.1:8090/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CliError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, CliError> {
        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(status = status.as_u16(), body = %text, "remote response");
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(CliError::Status {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str(&text).map_err(|e| CliError::Parse {
            what: "remote response".to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PreviewBackend for RemoteBackend {
    async fn preview(&self, request: &PreviewRequest) -> Result<PreviewResponse, CliError> {
        let resp = self
            .client
            .post(self.url("/control/template/preview"))
            .json(request)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn functions(&self) -> Result<Vec<PromptFunctionDoc>, CliError> {
        let resp = self
            .client
            .get(self.url("/control/template/functions"))
            .send()
            .await?;
        Self::decode(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let backend = RemoteBackend::new("http://127.0.0.1:8090/api/").unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:8090/api");
        assert_eq!(
            backend.url("/health"),
            "http://127.0.0.1:8090/api/health"
        );
    }
}
