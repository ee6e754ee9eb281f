use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::food::error::preview;
use crate::providers::traits::{CompletionProvider, CompletionRequest, ProviderError};

/// Chat-completions client for OpenAI-compatible endpoints.
///
/// One request per `complete` call. There is no retry on 429 or 5xx; the
/// status is reported and the caller decides.
#[derive(Clone)]
pub struct OpenAIProvider {
    api_key: String,
    api_url: String,
    model: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(api_key: String, model: String, api_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            api_url,
            model,
            client,
        })
    }

    async fn error_for_status(response: Response) -> ProviderError {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthFailed,
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok());
                ProviderError::RateLimited { retry_after_secs }
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                    .unwrap_or_else(|| preview(&body));
                ProviderError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Unreachable(format!("request timed out: {}", e))
    } else {
        ProviderError::Unreachable(e.to_string())
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": request.system
                    },
                    {
                        "role": "user",
                        "content": request.user
                    }
                ],
                "temperature": request.temperature,
                "max_tokens": request.max_tokens
            }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let err = Self::error_for_status(response).await;
            warn!(error = %err, "Chat completion request failed");
            return Err(err);
        }

        let response_json: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                ProviderError::InvalidResponse(e.to_string())
            } else {
                transport_error(e)
            }
        })?;

        response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ProviderError::InvalidResponse("missing first choice content".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
