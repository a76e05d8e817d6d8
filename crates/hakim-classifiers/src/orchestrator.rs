//! Classification orchestrator
//!
//! Public entry point: tries the AI tier when credentials are configured and falls back to
//! the heuristic tier on any failure. Only an unreachable catalog on the last attempt
//! yields [`Outcome::Unavailable`].

use crate::ai::AiClassifier;
use crate::catalog::{CatalogSource, RestCatalog, StaticCatalog};
use crate::classifier::ComplaintClassifier;
use crate::config::ClassifierConfig;
use crate::heuristic::{HeuristicClassifier, JUNK_REJECTION_REASON};
use hakim_core::{Category, ClassificationRequest, Error, Outcome, Rejection, Result, Tier, Verdict};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Two-tier classification orchestrator
pub struct Orchestrator {
    catalog: Arc<dyn CatalogSource>,
    ai: Option<Arc<dyn ComplaintClassifier>>,
    heuristic: HeuristicClassifier,
}

impl Orchestrator {
    /// Build an orchestrator from explicit configuration.
    ///
    /// Uses the REST catalog when `catalog.base_url` is set, otherwise the categories
    /// listed in the configuration.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;

        let catalog: Arc<dyn CatalogSource> = if config.catalog.is_remote() {
            Arc::new(RestCatalog::new(&config.catalog)?)
        } else {
            Arc::new(StaticCatalog::new(config.catalog.categories.clone()))
        };

        Self::with_catalog(config, catalog)
    }

    /// Build an orchestrator around a given catalog source
    pub fn with_catalog(config: &ClassifierConfig, catalog: Arc<dyn CatalogSource>) -> Result<Self> {
        let ai: Option<Arc<dyn ComplaintClassifier>> = if config.ai.is_configured() {
            Some(Arc::new(AiClassifier::new(config.ai.clone())?))
        } else {
            info!("No model credentials configured, AI tier disabled");
            None
        };

        Ok(Self {
            catalog,
            ai,
            heuristic: HeuristicClassifier::new()?,
        })
    }

    /// Replace the AI tier
    pub fn with_ai_tier(mut self, ai: Option<Arc<dyn ComplaintClassifier>>) -> Self {
        self.ai = ai;
        self
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Classify a complaint. Never fails; see [`Outcome`].
    pub async fn classify(&self, title: &str, description: &str, image_refs: &[String]) -> Outcome {
        let start = Instant::now();
        let outcome = self.run(title, description, image_refs).await;

        let tier = match &outcome {
            Outcome::Classified(result) => result.tier.as_str(),
            Outcome::Rejected(rejection) => rejection.tier.as_str(),
            Outcome::Unavailable { .. } => "none",
        };

        metrics::counter!(
            "hakim_classifications_total",
            "tier" => tier,
            "outcome" => outcome.label()
        )
        .increment(1);
        metrics::histogram!("hakim_classification_latency_us", "tier" => tier)
            .record(start.elapsed().as_micros() as f64);

        info!(tier, outcome = outcome.label(), "Complaint classification finished");
        outcome
    }

    /// Classify a complaint without images
    pub async fn classify_text(&self, title: &str, description: &str) -> Outcome {
        self.classify(title, description, &[]).await
    }

    async fn run(&self, title: &str, description: &str, image_refs: &[String]) -> Outcome {
        let mut catalog = None;

        if let Some(ai) = &self.ai {
            match self.try_ai(ai.as_ref(), title, description, image_refs).await {
                Ok(verdict) => return verdict.into(),
                Err((err, fetched)) => {
                    warn!(error = %err, "AI classification failed, falling back to keywords");
                    metrics::counter!("hakim_ai_fallbacks_total").increment(1);
                    catalog = fetched;
                }
            }
        }

        if self.heuristic.is_junk(title, description) {
            return Outcome::Rejected(Rejection::new(Tier::Heuristic, JUNK_REJECTION_REASON));
        }

        let categories = match catalog {
            Some(categories) => categories,
            None => match self.catalog.fetch_active_categories().await {
                Ok(categories) => categories,
                Err(err) => {
                    warn!(error = %err, catalog = self.catalog.name(), "Catalog fetch failed, classification unavailable");
                    return Outcome::unavailable(err.to_string());
                }
            },
        };

        let request = ClassificationRequest::new(title, description)
            .with_images(image_refs.to_vec())
            .with_categories(categories);

        self.heuristic.evaluate(&request).into()
    }

    /// Run the AI tier. On failure, hands back the catalog if it was fetched.
    async fn try_ai(
        &self,
        ai: &dyn ComplaintClassifier,
        title: &str,
        description: &str,
        image_refs: &[String],
    ) -> std::result::Result<Verdict, (Error, Option<Vec<Category>>)> {
        let categories = self
            .catalog
            .fetch_active_categories()
            .await
            .map_err(|e| (Error::ai(format!("failed to get categories: {}", e)), None))?;

        debug!(count = categories.len(), "Catalog fetched for AI tier");

        let request = ClassificationRequest::new(title, description)
            .with_images(image_refs.to_vec())
            .with_categories(categories);

        // Every tier error, configuration included, is answered by the heuristic tier
        let verdict = ai.classify(&request).await;
        verdict.map_err(|err| (err, Some(request.available_categories)))
    }
}
