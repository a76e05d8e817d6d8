//! Core types for complaint classification

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// An administrative category a complaint can be routed to.
///
/// Owned by the external store; the classifier only ever holds a per-request copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: Uuid,

    /// Department responsible for this category
    pub department_id: Uuid,

    /// Canonical (English) name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Localized (Arabic) name
    #[serde(rename = "name_ar", default, deserialize_with = "null_as_default")]
    pub name_localized: String,

    /// Free-form description shown to staff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the category accepts new complaints
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub is_active: bool,

    /// Service-level target in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_days: Option<u32>,
}

impl Category {
    /// Create an active category
    pub fn new(
        id: Uuid,
        department_id: Uuid,
        name: impl Into<String>,
        name_localized: impl Into<String>,
    ) -> Self {
        Self {
            id,
            department_id,
            name: name.into(),
            name_localized: name_localized.into(),
            description: None,
            is_active: true,
            sla_days: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Deserialize a nullable column, mapping `null` to the type's default.
///
/// The store returns nullable columns as explicit `null`, which `#[serde(default)]` alone
/// does not cover.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Complaint priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Parse a priority reported by an untrusted source.
    ///
    /// Unknown or empty values fall back to `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submitter sentiment as judged by the AI tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Neutral,
    Frustrated,
    Angry,
    Satisfied,
}

impl Sentiment {
    /// Parse a sentiment label, returning `None` for anything unrecognised
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "neutral" => Some(Self::Neutral),
            "frustrated" => Some(Self::Frustrated),
            "angry" => Some(Self::Angry),
            "satisfied" => Some(Self::Satisfied),
            _ => None,
        }
    }
}

/// Classification strategy that produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Generative-model tier
    Ai,
    /// Deterministic keyword tier
    Heuristic,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp a confidence score into `[0.0, 1.0]`. NaN becomes `0.0`.
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Input to a single classification attempt
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub title: String,
    pub description: String,
    /// Image URLs, in submission order
    pub image_refs: Vec<String>,
    /// Active categories, in catalog order
    pub available_categories: Vec<Category>,
}

impl ClassificationRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_refs: Vec::new(),
            available_categories: Vec::new(),
        }
    }

    pub fn with_images(mut self, image_refs: Vec<String>) -> Self {
        self.image_refs = image_refs;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.available_categories = categories;
        self
    }

    pub fn has_images(&self) -> bool {
        !self.image_refs.is_empty()
    }

    /// Title and description joined by a space, lowercased
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Successful classification of a complaint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    category_id: Option<Uuid>,
    department_id: Option<Uuid>,

    /// Assigned priority
    pub priority: Priority,

    confidence: f32,

    /// Short summary of the complaint
    pub summary: String,

    /// Submitter sentiment (AI tier only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,

    /// What the model saw in attached images (AI tier only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_analysis: Option<String>,

    /// Tier that produced this result
    pub tier: Tier,
}

impl ClassificationResult {
    /// Create an uncategorised result
    pub fn new(tier: Tier, priority: Priority, confidence: f32, summary: impl Into<String>) -> Self {
        Self {
            category_id: None,
            department_id: None,
            priority,
            confidence: clamp_confidence(confidence),
            summary: summary.into(),
            sentiment: None,
            image_analysis: None,
            tier,
        }
    }

    /// Assign a category together with its department
    pub fn assign(&mut self, category: &Category) {
        self.category_id = Some(category.id);
        self.department_id = Some(category.department_id);
    }

    /// Builder form of [`Self::assign`]
    pub fn with_category(mut self, category: &Category) -> Self {
        self.assign(category);
        self
    }

    /// Unset both category and department
    pub fn clear_category(&mut self) {
        self.category_id = None;
        self.department_id = None;
    }

    pub fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }

    pub fn department_id(&self) -> Option<Uuid> {
        self.department_id
    }

    /// Confidence score (0.0-1.0)
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Set confidence, clamping into range
    pub fn set_confidence(&mut self, confidence: f32) {
        self.confidence = clamp_confidence(confidence);
    }
}

/// Terminal judgment that a complaint is invalid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Human-readable reason, shown to the submitter
    pub reason: String,

    /// Tier that rejected the complaint
    pub tier: Tier,
}

impl Rejection {
    pub fn new(tier: Tier, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            tier,
        }
    }
}

/// Verdict of a single tier
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Classified(ClassificationResult),
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn tier(&self) -> Tier {
        match self {
            Self::Classified(result) => result.tier,
            Self::Rejected(rejection) => rejection.tier,
        }
    }
}

/// Caller-facing outcome of a classification call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The complaint was classified
    Classified(ClassificationResult),

    /// The complaint was judged invalid and must not be stored as classified
    Rejected(Rejection),

    /// No tier could run; intake should proceed unclassified
    Unavailable { reason: String },
}

impl Outcome {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Classified(_) => "classified",
            Self::Rejected(_) => "rejected",
            Self::Unavailable { .. } => "unavailable",
        }
    }

    pub fn as_classified(&self) -> Option<&ClassificationResult> {
        match self {
            Self::Classified(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_rejected(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl From<Verdict> for Outcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Classified(result) => Self::Classified(result),
            Verdict::Rejected(rejection) => Self::Rejected(rejection),
        }
    }
}
