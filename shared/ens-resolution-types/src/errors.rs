use serde::{Deserialize, Serialize};

/// Failure taxonomy for every resolution operation.
///
/// `Clone` so a failure can be carried inside a [`crate::WorkflowEvent`] and also returned
/// from the collapsed result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ResolutionError {
    /// Malformed input. Raised before anything reaches the chain.
    #[error("validation error: {0}")]
    Validation(String),
    /// Target resolver, registrar or registry is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Caller lacks the ownership required for the operation.
    #[error("authorization error: {0}")]
    Authorization(String),
    /// A registry query returned no usable answer where one was required.
    #[error("lookup error: {0}")]
    Lookup(String),
    /// Submission or confirmation failure.
    #[error("transaction error: {0}")]
    Transaction(String),
}

pub type Result<T> = core::result::Result<T, ResolutionError>;
