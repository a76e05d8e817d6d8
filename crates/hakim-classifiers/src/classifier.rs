//! Classifier trait shared by both tiers

use async_trait::async_trait;
use hakim_core::{ClassificationRequest, Result, Tier, Verdict};

/// Trait for all complaint classifiers
#[async_trait]
pub trait ComplaintClassifier: Send + Sync {
    /// Classify a complaint against the categories carried in the request.
    ///
    /// A rejected complaint is `Ok(Verdict::Rejected)`; `Err` means the tier could not run.
    async fn classify(&self, request: &ClassificationRequest) -> Result<Verdict>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Get the tier this classifier implements
    fn tier(&self) -> Tier;
}
