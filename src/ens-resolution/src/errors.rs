//! Workflow error taxonomy and chain-level failures.

pub use ens_resolution_types::{ResolutionError, Result};

use crate::events::TxHash;

/// Errors reported by a [`crate::chain::ChainClient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// A read-only call or code query failed at the transport level.
    #[error("call failed: {0}")]
    Call(String),
    /// The node rejected the transaction or signing failed.
    #[error("submission failed: {0}")]
    Submission(String),
    /// The transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    /// The transaction was dropped or the wait for confirmations failed.
    #[error("confirmation of {tx} failed: {reason}")]
    Confirmation { tx: TxHash, reason: String },
    /// No signer is attached to the client.
    #[error("no signer")]
    NoSigner,
}

/// Errors while decoding contract return data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed return data for `{call}`: {reason}")]
pub struct DecodeError {
    pub call: &'static str,
    pub reason: String,
}

impl From<DecodeError> for ResolutionError {
    fn from(e: DecodeError) -> Self {
        ResolutionError::Lookup(e.to_string())
    }
}

/// Map a read-side chain failure into the workflow taxonomy.
pub(crate) fn lookup(context: &str, e: ChainError) -> ResolutionError {
    ResolutionError::Lookup(format!("{context}: {e}"))
}

/// Map a write-side chain failure into the workflow taxonomy.
pub(crate) fn transaction(context: &str, e: ChainError) -> ResolutionError {
    match e {
        ChainError::NoSigner => ResolutionError::Authorization("no signer".to_string()),
        other => ResolutionError::Transaction(format!("{context}: {other}")),
    }
}
