//! Parsing of the model's JSON verdict

use hakim_core::types::null_as_default;
use hakim_core::{Error, Result};
use serde::Deserialize;

/// Structured verdict emitted by the model.
///
/// Every field is optional on the wire; missing or null values fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiVerdict {
    #[serde(deserialize_with = "null_as_default")]
    pub rejected: bool,
    pub rejection_reason: Option<String>,
    pub category_name: Option<String>,
    pub priority: Option<String>,
    pub confidence: Option<f64>,
    #[serde(rename = "summary_ar")]
    pub summary: Option<String>,
    pub sentiment: Option<String>,
    pub image_analysis: Option<String>,
}

/// Strip surrounding whitespace and an optional markdown code fence
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let opened = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let closed = opened.trim_end().strip_suffix("```").unwrap_or(opened);
    closed.trim()
}

/// Parse the model output. Malformed payloads are not partially recovered.
pub fn parse_verdict(raw: &str) -> Result<AiVerdict> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| Error::ai(format!("parse error: {}", e)))
}
