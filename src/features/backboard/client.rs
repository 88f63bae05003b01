//! Backboard HTTP client
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Thread creation and form-encoded message posting

use async_trait::async_trait;
use log::{debug, error};
use serde::Deserialize;
use std::time::Duration;

use super::{ThreadId, ThreadProvider};
use crate::core::{Config, ProviderError};

#[derive(Debug, Deserialize)]
struct CreateThreadResponse {
    thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct BackboardClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    llm_provider: String,
}

impl BackboardClient {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        llm_provider: String,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; DuetBot/1.0)")
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            llm_provider,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(
            config.backboard_api_key.clone(),
            config.backboard_base_url.clone(),
            config.backboard_model.clone(),
            config.backboard_llm_provider.clone(),
        )
    }

    async fn error_from(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ProviderError::Api { status, body }
    }
}

#[async_trait]
impl ThreadProvider for BackboardClient {
    async fn create_thread(&self, assistant_id: &str) -> Result<ThreadId, ProviderError> {
        if assistant_id.trim().is_empty() {
            return Err(ProviderError::InvalidArgument(
                "assistant_id is required to create a thread".to_string(),
            ));
        }

        let url = format!("{}/assistants/{}/threads", self.base_url, assistant_id);
        let response = self
            .http
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let data: CreateThreadResponse = response.json().await?;
        let thread_id = data
            .thread_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("missing thread_id".to_string()))?;

        debug!("Created Backboard thread {thread_id} for assistant {assistant_id}");
        Ok(ThreadId::new(thread_id))
    }

    async fn send(
        &self,
        thread: &ThreadId,
        text: &str,
        timeout: Duration,
        trigger_completion: bool,
    ) -> Result<String, ProviderError> {
        if thread.as_str().is_empty() {
            return Err(ProviderError::InvalidArgument("thread_id is required".to_string()));
        }

        let url = format!("{}/threads/{}/messages", self.base_url, thread);
        let form = [
            ("content", text),
            ("llm_provider", self.llm_provider.as_str()),
            ("model_name", self.model.as_str()),
            ("memory", if trigger_completion { "Auto" } else { "off" }),
            ("send_to_llm", if trigger_completion { "true" } else { "false" }),
            ("stream", "false"),
            ("web_search", "off"),
        ];

        let response = self
            .http
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .form(&form)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(timeout)
                } else {
                    error!("Backboard API request failed: {e}");
                    ProviderError::Transport(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let data: MessageResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(timeout)
            } else {
                ProviderError::MalformedResponse(e.to_string())
            }
        })?;

        if !trigger_completion {
            return Ok(String::new());
        }
        Ok(data.content.unwrap_or_default())
    }
}
