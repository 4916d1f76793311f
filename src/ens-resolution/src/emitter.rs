//! Progress emission and the reducer that collapses an event stream into one result.

use std::collections::BTreeMap;

use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    errors::{ResolutionError, Result},
    events::{TxHash, WorkflowEvent, WorkflowOutcome},
    steps::StepKind,
};

/// Events buffered before the workflow waits on a slow subscriber.
pub const EVENT_CHANNEL_BUFFER: usize = 64;

/// Writing half of a workflow's event stream.
pub struct EventEmitter {
    tx: mpsc::Sender<WorkflowEvent>,
}

impl EventEmitter {
    /// New emitter and the single receiver that subscribes to it.
    pub fn channel() -> (Self, mpsc::Receiver<WorkflowEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        (Self { tx }, rx)
    }

    /// Send one event. Returns `false` once the subscriber is gone.
    pub async fn emit(&self, event: WorkflowEvent) -> bool {
        debug!(?event, "workflow event");
        self.tx.send(event).await.is_ok()
    }

    /// The subscriber dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Folds workflow events into a [`WorkflowOutcome`].
///
/// Transaction hashes come from `StepSubmitted` events, so the collapsed result lists
/// exactly what a stream subscriber saw submitted.
#[derive(Debug, Default)]
pub struct SummaryReducer {
    transactions: BTreeMap<StepKind, TxHash>,
    outcome: Option<Result<WorkflowOutcome>>,
}

impl SummaryReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns `true` once a terminal event has been seen.
    pub fn apply(&mut self, event: WorkflowEvent) -> bool {
        if self.outcome.is_some() {
            return true;
        }
        let terminal = event.is_terminal();
        match event {
            WorkflowEvent::StepSubmitted { step, tx } => {
                self.transactions.insert(step.kind(), tx);
            }
            WorkflowEvent::Completed { mut summary } => {
                summary.transactions = std::mem::take(&mut self.transactions);
                self.outcome = Some(Ok(WorkflowOutcome::Completed(summary)));
            }
            WorkflowEvent::Aborted { mut summary } => {
                summary.transactions = std::mem::take(&mut self.transactions);
                self.outcome = Some(Ok(WorkflowOutcome::Aborted(summary)));
            }
            WorkflowEvent::Failed { error } => {
                self.outcome = Some(Err(error));
            }
            WorkflowEvent::Described { .. }
            | WorkflowEvent::StepRequested { .. }
            | WorkflowEvent::StepConfirmed { .. } => {}
        }
        terminal
    }

    pub fn finish(self) -> Result<WorkflowOutcome> {
        self.outcome.unwrap_or_else(|| {
            Err(ResolutionError::Transaction(
                "workflow stopped before reaching a terminal state".to_string(),
            ))
        })
    }

    /// Drain `events` until a terminal event and return the collapsed result.
    pub async fn collect(mut events: mpsc::Receiver<WorkflowEvent>) -> Result<WorkflowOutcome> {
        let mut reducer = Self::new();
        while let Some(event) = events.recv().await {
            if reducer.apply(event) {
                break;
            }
        }
        reducer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::ResolutionSummary,
        steps::Step,
        target::{AddressKind, ResolutionTarget},
    };
    use alloy_primitives::{Address, B256};

    fn summary() -> ResolutionSummary {
        ResolutionSummary::new(&ResolutionTarget {
            name: "alice.eth".to_string(),
            address: Address::repeat_byte(1),
            kind: AddressKind::Eoa,
        })
    }

    #[test]
    fn test_reducer_keeps_submitted_hashes() {
        let step = Step::SetResolver {
            name: "alice.eth".to_string(),
            resolver: Address::repeat_byte(2),
        };
        let mut reducer = SummaryReducer::new();
        assert!(!reducer.apply(WorkflowEvent::StepRequested { step: step.clone() }));
        assert!(!reducer.apply(WorkflowEvent::StepSubmitted {
            step: step.clone(),
            tx: B256::repeat_byte(9),
        }));
        assert!(!reducer.apply(WorkflowEvent::StepConfirmed { step }));
        assert!(reducer.apply(WorkflowEvent::Aborted { summary: summary() }));

        let outcome = reducer.finish().unwrap();
        assert!(!outcome.is_completed());
        assert_eq!(
            outcome.summary().tx(StepKind::SetResolver),
            Some(B256::repeat_byte(9))
        );
    }

    #[test]
    fn test_reducer_without_terminal_event_fails() {
        let reducer = SummaryReducer::new();
        assert!(matches!(
            reducer.finish(),
            Err(ResolutionError::Transaction(_))
        ));
    }

    #[tokio::test]
    async fn test_collect_returns_failure() {
        let (emitter, rx) = EventEmitter::channel();
        assert!(
            emitter
                .emit(WorkflowEvent::Failed {
                    error: ResolutionError::Lookup("boom".to_string()),
                })
                .await
        );
        drop(emitter);
        assert_eq!(
            SummaryReducer::collect(rx).await,
            Err(ResolutionError::Lookup("boom".to_string()))
        );
    }
}
