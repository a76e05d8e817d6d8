//! Hakim Classifiers
//!
//! Decides which category, department and priority a citizen complaint belongs to.
//!
//! Classification runs in two tiers:
//! - AI tier: a generative model reads the text (and any images), screens out invalid
//!   complaints and returns a structured classification
//! - Heuristic tier: deterministic junk screening, keyword priority and fuzzy category
//!   matching, used whenever the AI tier is unconfigured or cannot produce a verdict
//!
//! The [`Orchestrator`] is the public entry point and never fails for classification-quality
//! reasons.

pub mod ai;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod heuristic;
pub mod orchestrator;

pub use ai::AiClassifier;
pub use catalog::{CatalogSource, RestCatalog, StaticCatalog};
pub use classifier::ComplaintClassifier;
pub use config::{AiConfig, CatalogConfig, ClassifierConfig};
pub use heuristic::{HeuristicClassifier, JunkReason};
pub use orchestrator::Orchestrator;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::CatalogSource;
    pub use crate::classifier::ComplaintClassifier;
    pub use crate::config::ClassifierConfig;
    pub use crate::orchestrator::Orchestrator;
    pub use hakim_core::{Outcome, Priority, Verdict};
}
