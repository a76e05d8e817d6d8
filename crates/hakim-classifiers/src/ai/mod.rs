//! Generative-model classifier (AI tier)
//!
//! Builds a system prompt around the catalog, sends the complaint text (and image
//! references) to a chat-completions endpoint, and turns the model's JSON verdict into a
//! [`Verdict`]. Any transport, status or parse failure is `Error::AiUnavailable`; a
//! rejection returned by the model is a verdict, not an error.

pub mod client;
pub mod prompt;
pub mod resolve;
pub mod response;

pub use client::ChatClient;
pub use resolve::{resolve_category, CategoryMatch};
pub use response::{parse_verdict, AiVerdict};

use crate::classifier::ComplaintClassifier;
use crate::config::AiConfig;
use hakim_core::chat::{ChatCompletionRequest, ChatMessage, UserContent};
use hakim_core::{
    ClassificationRequest, ClassificationResult, Error, Priority, Rejection, Result, Sentiment,
    Tier, Verdict,
};
use std::time::Instant;
use tracing::{debug, info};

/// Reason used when the model rejects without saying why
pub const GENERIC_REJECTION_REASON: &str = "الشكوى غير مقبولة";

/// Confidence multiplier for a category that could not be resolved
const DEGRADED_MATCH_FACTOR: f32 = 0.5;

/// AI-tier classifier
pub struct AiClassifier {
    name: String,
    config: AiConfig,
    client: ChatClient,
}

impl AiClassifier {
    /// Create a new AI classifier; fails when no API key is configured
    pub fn new(config: AiConfig) -> Result<Self> {
        let client = ChatClient::new(&config)?;
        Ok(Self {
            name: "ai".to_string(),
            config,
            client,
        })
    }

    /// Assemble the chat-completions request for a complaint
    pub fn build_request(&self, request: &ClassificationRequest) -> ChatCompletionRequest {
        let system = prompt::system_prompt(&request.available_categories, request.has_images());
        let user = UserContent::build(
            prompt::user_prompt(&request.title, &request.description),
            &request.image_refs,
            &self.config.image_detail,
        );

        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Turn a parsed model verdict into a tier verdict
    pub fn interpret(&self, parsed: AiVerdict, request: &ClassificationRequest) -> Verdict {
        if parsed.rejected {
            let reason = parsed
                .rejection_reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| GENERIC_REJECTION_REASON.to_string());
            return Verdict::Rejected(Rejection::new(Tier::Ai, reason));
        }

        let priority = Priority::parse_lenient(parsed.priority.as_deref().unwrap_or_default());
        let confidence = parsed.confidence.unwrap_or(0.0) as f32;
        let mut result = ClassificationResult::new(
            Tier::Ai,
            priority,
            confidence,
            parsed.summary.unwrap_or_default(),
        );
        result.sentiment = parsed.sentiment.as_deref().and_then(Sentiment::parse);
        result.image_analysis = parsed.image_analysis.filter(|a| !a.trim().is_empty());

        if let Some(analysis) = &result.image_analysis {
            debug!(image_analysis = %analysis, "Model described attached images");
        }

        let model_name = parsed.category_name.unwrap_or_default();
        if let Some(matched) = resolve_category(&model_name, &request.available_categories) {
            result.assign(matched.category());
            if matched.is_degraded() {
                debug!(category_name = %model_name, "Model category did not resolve, using catalog default");
                result.set_confidence(result.confidence() * DEGRADED_MATCH_FACTOR);
            }
        }

        Verdict::Classified(result)
    }
}

#[async_trait::async_trait]
impl ComplaintClassifier for AiClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Verdict> {
        if request.available_categories.is_empty() {
            return Err(Error::ai("no categories"));
        }

        let start = Instant::now();
        let body = self.build_request(request);
        let raw = self.client.complete(&body).await?;
        let parsed = parse_verdict(&raw)?;
        let verdict = self.interpret(parsed, request);

        info!(
            model = %self.config.model,
            images = request.image_refs.len(),
            rejected = verdict.is_rejected(),
            latency_ms = start.elapsed().as_millis() as u64,
            "AI tier produced a verdict"
        );

        Ok(verdict)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> Tier {
        Tier::Ai
    }
}
