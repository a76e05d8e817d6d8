//! Hakim Core
//!
//! Core types, traits, and utilities shared across the Hakim complaint-intake components.
//!
//! This crate provides:
//! - The classification data model (categories, requests, results, rejections)
//! - Error types and result handling
//! - Chat-completion wire types for the generative-model endpoint

pub mod chat;
pub mod error;
pub mod types;

pub use chat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Role, UserContent};
pub use error::{Error, Result};
pub use types::{
    Category, ClassificationRequest, ClassificationResult, Outcome, Priority, Rejection,
    Sentiment, Tier, Verdict,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        Category, ClassificationRequest, ClassificationResult, Outcome, Priority, Rejection,
        Tier, Verdict,
    };
}
