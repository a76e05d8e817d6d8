//! Error types for the classification subsystem

/// Result type alias using Hakim's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for classification operations.
///
/// A rejected complaint is not an error; see [`crate::Verdict::Rejected`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The category catalog could not be fetched or decoded
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The generative-model tier could not produce a verdict
    #[error("ai unavailable: {0}")]
    AiUnavailable(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::CatalogUnavailable(msg.into())
    }

    /// Create a new AI-tier error
    pub fn ai(msg: impl Into<String>) -> Self {
        Self::AiUnavailable(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Longest upstream response excerpt kept in an error message
pub const MAX_DETAIL_CHARS: usize = 200;

/// Cut an upstream response body down for inclusion in an error message
pub fn truncate_detail(detail: &str) -> String {
    let detail = detail.trim();
    if detail.chars().count() > MAX_DETAIL_CHARS {
        let mut excerpt: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
        excerpt.push_str("...");
        excerpt
    } else {
        detail.to_string()
    }
}
