use std::collections::BTreeMap;

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::{
    errors::ResolutionError,
    steps::{Step, StepKind},
    target::{AddressKind, ResolutionTarget},
};

/// Transaction hash returned on submission.
pub type TxHash = B256;

/// Transactions actually sent by a run, keyed by step kind. Skipped steps have no entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub name: String,
    pub address: Address,
    pub kind: AddressKind,
    pub transactions: BTreeMap<StepKind, TxHash>,
}

impl ResolutionSummary {
    pub fn new(target: &ResolutionTarget) -> Self {
        Self {
            name: target.name.clone(),
            address: target.address,
            kind: target.kind,
            transactions: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, kind: StepKind, tx: TxHash) {
        self.transactions.insert(kind, tx);
    }

    pub fn tx(&self, kind: StepKind) -> Option<TxHash> {
        self.transactions.get(&kind).copied()
    }
}

/// Progress reported by a workflow, in execution order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// Emitted once after planning, before any transaction is sent.
    Described { kind: AddressKind, steps: Vec<Step> },
    StepRequested { step: Step },
    StepSubmitted { step: Step, tx: TxHash },
    StepConfirmed { step: Step },
    Completed { summary: ResolutionSummary },
    /// Cancellation honored at a step boundary; carries what was sent so far.
    Aborted { summary: ResolutionSummary },
    Failed { error: ResolutionError },
}

impl WorkflowEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowEvent::Completed { .. }
                | WorkflowEvent::Aborted { .. }
                | WorkflowEvent::Failed { .. }
        )
    }
}

/// Collapsed result of a workflow that did not fail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "summary", rename_all = "snake_case")]
pub enum WorkflowOutcome {
    Completed(ResolutionSummary),
    Aborted(ResolutionSummary),
}

impl WorkflowOutcome {
    pub fn summary(&self) -> &ResolutionSummary {
        match self {
            WorkflowOutcome::Completed(s) | WorkflowOutcome::Aborted(s) => s,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, WorkflowOutcome::Completed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_json_keys_by_step_kind() {
        let target = ResolutionTarget {
            name: "alice.users.example.eth".to_string(),
            address: Address::repeat_byte(0xaa),
            kind: AddressKind::Eoa,
        };
        let mut summary = ResolutionSummary::new(&target);
        summary.record(StepKind::SetAddr, B256::repeat_byte(0x01));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["kind"], "EOA");
        assert!(json["transactions"].get("set_addr").is_some());
        assert!(json["transactions"].get("set_resolver").is_none());
        assert_eq!(summary.tx(StepKind::SetAddr), Some(B256::repeat_byte(0x01)));
    }

    #[test]
    fn test_terminal_events() {
        let err = WorkflowEvent::Failed {
            error: ResolutionError::Lookup("x".into()),
        };
        assert!(err.is_terminal());
        let step = Step::SetResolver {
            name: "a.eth".into(),
            resolver: Address::ZERO,
        };
        assert!(!WorkflowEvent::StepRequested { step }.is_terminal());
    }
}
