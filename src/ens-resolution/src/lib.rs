//! Configure forward (name → address) and reverse (address → name) ENS resolution.
//!
//! The entry point is [`ConfigureResolution`]: it reads the current registry state, plans
//! only the transactions still missing, and executes them in order while streaming
//! [`WorkflowEvent`]s. Re-running after a partial run is safe; satisfied steps are skipped.
//!
//! Chain access goes through the [`ChainClient`] trait so the workflow can run against any
//! node client or an in-memory fake.

pub mod cancel;
pub mod chain;
pub mod config;
pub mod controller;
pub mod emitter;
pub mod errors;
pub mod events;
pub mod executor;
pub mod inspector;
pub mod interfaces;
pub mod planner;
pub mod records;
pub mod utils;

pub use ens_resolution_types::{steps, target};

pub use cancel::CancelToken;
pub use chain::{ChainClient, TxOptions, TxRequest};
pub use config::ResolutionConfig;
pub use controller::{
    configure_resolution, ConfigureResolution, ResolutionRequest, WorkflowHandle, WorkflowState,
};
pub use emitter::{EventEmitter, SummaryReducer};
pub use errors::{ChainError, ResolutionError, Result};
pub use events::{ResolutionSummary, TxHash, WorkflowEvent, WorkflowOutcome};
pub use inspector::OwnershipInspector;
pub use planner::plan;
pub use steps::{NameSetter, Plan, Step, StepKind};
pub use target::{AddressKind, OwnershipFact, ResolutionFacts, ResolutionTarget};

#[cfg(test)]
mod tests;
