//! Configuration for the classification tiers

use hakim_core::{Category, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the whole classification subsystem
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Generative-model tier
    #[serde(default)]
    pub ai: AiConfig,

    /// Category catalog store
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl ClassifierConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::config(format!("invalid classifier config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if !self.ai.temperature.is_finite() || self.ai.temperature < 0.0 {
            return Err(Error::config(format!(
                "ai.temperature must be a non-negative number, got {}",
                self.ai.temperature
            )));
        }
        if self.ai.max_tokens == 0 {
            return Err(Error::config("ai.max_tokens must be greater than zero"));
        }
        if self.ai.timeout_ms == 0 {
            return Err(Error::config("ai.timeout_ms must be greater than zero"));
        }
        if self.catalog.timeout_ms == 0 {
            return Err(Error::config("catalog.timeout_ms must be greater than zero"));
        }
        Ok(())
    }
}

/// Generative-model endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Bearer credential; the AI tier is skipped entirely when unset
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output-token bound
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Sent as `HTTP-Referer`
    #[serde(default = "default_referer")]
    pub referer: Option<String>,

    /// Sent as `X-Title`
    #[serde(default = "default_app_title")]
    pub app_title: Option<String>,

    /// Image detail hint for multimodal requests
    #[serde(default = "default_image_detail")]
    pub image_detail: String,
}

impl AiConfig {
    /// Whether credentials are present
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .map_or(false, |key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_ai_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
            referer: default_referer(),
            app_title: default_app_title(),
            image_detail: default_image_detail(),
        }
    }
}

/// Category catalog store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the REST data store
    #[serde(default)]
    pub base_url: String,

    /// Service key for the store
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Fixed categories used instead of the store when `base_url` is empty
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Whether a remote store is configured
    pub fn is_remote(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
            categories: Vec::new(),
        }
    }
}

fn default_ai_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "openai/gpt-5.1-codex-max".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_referer() -> Option<String> {
    Some("https://hakim.sa".to_string())
}

fn default_app_title() -> Option<String> {
    Some("HAKIM Complaint System".to_string())
}

fn default_image_detail() -> String {
    "high".to_string()
}
