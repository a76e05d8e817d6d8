//! Service configuration

use hakim_classifiers::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Intake service configuration
///
/// The classifier sections (`ai`, `catalog`) sit at the top level of the file so the same
/// YAML can be handed to [`ClassifierConfig::from_file`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(flatten)]
    pub classifier: ClassifierConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Values taken from the command line or the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub openai_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
}

impl IntakeConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply(overrides);
        config.classifier.validate()?;

        Ok(config)
    }

    fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(key) = non_empty(&overrides.openai_api_key) {
            self.classifier.ai.api_key = Some(key);
        }

        if let Some(url) = non_empty(&overrides.supabase_url) {
            self.classifier.catalog.base_url = url;
        }

        if let Some(key) = non_empty(&overrides.supabase_key) {
            self.classifier.catalog.api_key = key;
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}
