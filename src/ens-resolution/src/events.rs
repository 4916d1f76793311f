//! Event and result types re-exported from the shared types crate.

pub use ens_resolution_types::{ResolutionSummary, TxHash, WorkflowEvent, WorkflowOutcome};
