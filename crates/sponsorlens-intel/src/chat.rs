//! Minimal client for an OpenAI-compatible chat-completions endpoint.

use reqwest::{Client, Url};
use sponsorlens_core::AppConfig;

use crate::error::IntelError;
use crate::http::{build_client, join, parse_base_url};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const SERVICE: &str = "openai";

/// Sampling settings for one completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
    retry: RetryPolicy,
}

impl ChatClient {
    /// # Errors
    ///
    /// Returns [`IntelError::Http`] if the client cannot be constructed, or
    /// [`IntelError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, IntelError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: parse_base_url(base_url)?,
            retry: RetryPolicy::default(),
        })
    }

    /// # Errors
    ///
    /// See [`ChatClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, IntelError> {
        Ok(Self::with_base_url(
            &config.openai_api_key,
            &config.openai_model,
            config.request_timeout_secs,
            &config.openai_base_url,
        )?
        .with_retry(RetryPolicy {
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }))
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sends one system + user exchange and returns the assistant's text.
    ///
    /// # Errors
    ///
    /// - [`IntelError::Http`] on transport failure or a non-2xx status.
    /// - [`IntelError::Deserialize`] if the body is not a chat completion.
    /// - [`IntelError::UnusableOutput`] if the completion has no content.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        sampling: Sampling,
    ) -> Result<String, IntelError> {
        let url = join(&self.base_url, "chat/completions")?;
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
        };

        let this = self;
        let target = &url;
        let payload = &request;
        let body = retry_with_backoff(self.retry, SERVICE, move || async move {
            let response = this
                .client
                .post(target.clone())
                .bearer_auth(&this.api_key)
                .json(payload)
                .send()
                .await?
                .error_for_status()?;
            Ok::<String, IntelError>(response.text().await?)
        })
        .await?;

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| IntelError::Deserialize {
                context: "chat completion".to_owned(),
                source: e,
            })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| IntelError::UnusableOutput("completion had no content".to_owned()))?;

        tracing::debug!(model = %self.model, len = content.len(), "chat completion received");
        Ok(content)
    }
}
