//! Chat-completions client for the generative-model endpoint

use crate::config::AiConfig;
use hakim_core::chat::{ChatCompletionRequest, ChatCompletionResponse};
use hakim_core::error::truncate_detail;
use hakim_core::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// Single-attempt client for an OpenAI-compatible endpoint
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    referer: Option<String>,
    app_title: Option<String>,
    timeout: Duration,
}

impl ChatClient {
    /// Create a client from configuration; requires an API key
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::config("ai.api_key is not set"))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("failed to build model client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the request and return the first candidate's text content
    pub async fn complete(&self, request: &ChatCompletionRequest) -> Result<String> {
        let mut builder = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request);

        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.app_title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ChatCompletionResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(Error::ai(format!(
                "status {}: {}",
                status.as_u16(),
                truncate_detail(&detail)
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| Error::ai(format!("invalid response body: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(Error::ai(format!(
                "endpoint error: {}",
                truncate_detail(&error.message)
            )));
        }

        let content = parsed
            .first_content()
            .ok_or_else(|| Error::ai("no response from model"))?;

        debug!(chars = content.chars().count(), "Model response received");
        Ok(content.to_string())
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::ai(format!("timeout after {:?}", self.timeout))
        } else {
            Error::ai(format!("request failed: {}", err))
        }
    }
}
