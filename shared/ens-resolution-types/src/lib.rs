//! Shared types for ENS resolution configuration: targets, fact snapshots, planned steps,
//! workflow events and the error taxonomy.

pub mod errors;
pub mod events;
pub mod steps;
pub mod target;

pub use errors::{ResolutionError, Result};
pub use events::{ResolutionSummary, TxHash, WorkflowEvent, WorkflowOutcome};
pub use steps::{NameSetter, Plan, Step, StepKind};
pub use target::{AddressKind, OwnershipFact, ResolutionFacts, ResolutionTarget};
