//! Cancellable workflow that configures forward and reverse resolution for one name.
//!
//! The controller walks `Planning → Describing → Executing(i) → Completed | Aborted | Failed`:
//! it snapshots on-chain facts, plans the missing steps, announces the plan, then executes
//! the steps one by one, polling the [`CancelToken`] before each of them. Every transition
//! is reported on the workflow's event stream, and exactly one terminal event is emitted.
//!
//! Callers must not run two workflows for the same name/address pair at the same time;
//! nothing here locks across workflows.

use std::sync::Arc;

use alloy_primitives::Address;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    cancel::CancelToken,
    chain::ChainClient,
    config::{ResolutionConfig, REVERSE_DOMAIN},
    emitter::{EventEmitter, SummaryReducer},
    errors::{ResolutionError, Result},
    events::{ResolutionSummary, WorkflowEvent, WorkflowOutcome},
    executor::StepExecutor,
    inspector::OwnershipInspector,
    planner::plan,
    steps::Plan,
    target::{AddressKind, OwnershipFact, ResolutionFacts, ResolutionTarget},
    utils::{namehash::reverse_name, validate},
};

/// States of a configuration workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowState {
    Planning,
    Describing,
    Executing(usize),
    Completed,
    Aborted,
    Failed,
}

/// Name to configure and the address it should point at.
///
/// Without an address, the signer's own account is configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub name: String,
    pub address: Option<Address>,
}

impl ResolutionRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }
}

pub struct ConfigureResolution<C: ChainClient + 'static> {
    client: Arc<C>,
    config: ResolutionConfig,
    cancel: CancelToken,
}

impl<C: ChainClient + 'static> ConfigureResolution<C> {
    pub fn new(client: Arc<C>, config: ResolutionConfig, cancel: CancelToken) -> Self {
        Self {
            client,
            config,
            cancel,
        }
    }

    /// Validate `request` and spawn the workflow.
    ///
    /// Malformed input is rejected here and no task is started.
    pub fn start(self, request: ResolutionRequest) -> Result<WorkflowHandle> {
        validate::ens_domain(&request.name)?;
        let cancel = self.cancel.clone();
        let (emitter, events) = EventEmitter::channel();
        let task = tokio::spawn(async move {
            self.run(&request, &emitter).await;
        });
        Ok(WorkflowHandle {
            events,
            cancel,
            task,
        })
    }

    /// Drive the workflow to a terminal state on the calling task.
    pub async fn run(&self, request: &ResolutionRequest, emitter: &EventEmitter) -> WorkflowState {
        info!(name = %request.name, state = ?WorkflowState::Planning, "configuring ENS resolution");
        let (target, plan) = match self.prepare(request).await {
            Ok(prepared) => prepared,
            Err(error) => return self.fail(emitter, error).await,
        };

        info!(kind = ?plan.kind, steps = ?plan.kinds(), state = ?WorkflowState::Describing, "planned");
        emitter
            .emit(WorkflowEvent::Described {
                kind: plan.kind,
                steps: plan.steps.clone(),
            })
            .await;

        let executor = StepExecutor::new(self.client.as_ref(), self.config.registry, &self.config.tx);
        let mut summary = ResolutionSummary::new(&target);
        for (i, step) in plan.steps.iter().enumerate() {
            if self.cancel.is_cancelled() || emitter.is_closed() {
                info!(state = ?WorkflowState::Aborted, next = %step.kind(), "cancelled at step boundary");
                emitter.emit(WorkflowEvent::Aborted { summary }).await;
                return WorkflowState::Aborted;
            }
            debug!(state = ?WorkflowState::Executing(i), step = %step.kind());
            match executor.execute(step, emitter).await {
                Ok(tx) => summary.record(step.kind(), tx),
                Err(error) => return self.fail(emitter, error).await,
            }
        }

        info!(name = %target.name, sent = summary.transactions.len(), state = ?WorkflowState::Completed, "resolution configured");
        emitter.emit(WorkflowEvent::Completed { summary }).await;
        WorkflowState::Completed
    }

    async fn fail(&self, emitter: &EventEmitter, error: ResolutionError) -> WorkflowState {
        warn!(%error, state = ?WorkflowState::Failed, "ENS resolution workflow failed");
        emitter.emit(WorkflowEvent::Failed { error }).await;
        WorkflowState::Failed
    }

    async fn prepare(&self, request: &ResolutionRequest) -> Result<(ResolutionTarget, Plan)> {
        let caller = self
            .client
            .signer()
            .ok_or_else(|| ResolutionError::Authorization("no signer".to_string()))?;
        let (target, facts) = self.gather(request, caller).await?;
        let plan = plan(&target, &facts, self.config.registry)?;
        Ok((target, plan))
    }

    /// Read the fact snapshot sequentially.
    ///
    /// Reading stops as soon as a planner precondition is known to fail; the planner then
    /// reports that precondition from the partial snapshot.
    async fn gather(
        &self,
        request: &ResolutionRequest,
        caller: Address,
    ) -> Result<(ResolutionTarget, ResolutionFacts)> {
        let inspector = OwnershipInspector::new(self.client.as_ref(), self.config.registry);
        let address = request.address.unwrap_or(caller);
        let kind = inspector.address_kind(address).await?;
        let target = ResolutionTarget {
            name: request.name.clone(),
            address,
            kind,
        };
        let mut facts = ResolutionFacts {
            caller,
            resolver: self.config.public_resolver,
            ..Default::default()
        };

        facts.resolver_is_contract = inspector.has_code(facts.resolver).await?;
        if !facts.resolver_is_contract {
            return Ok((target, facts));
        }

        let name_owner = OwnershipFact::new(&target.name, inspector.owner_of(&target.name).await?);
        let owned = name_owner.is_owned_by(caller);
        facts.name_owner = Some(name_owner);
        if !owned {
            return Ok((target, facts));
        }

        match kind {
            AddressKind::Contract => {
                facts.entry_owner = inspector.entry_owner(address).await?;
                if facts.entry_owner != Some(caller) {
                    return Ok((target, facts));
                }
            }
            AddressKind::Eoa => {
                if address != caller {
                    return Ok((target, facts));
                }
                let registrar = inspector.owner_of(REVERSE_DOMAIN).await?;
                facts.reverse_registrar = Some(registrar);
                if registrar == Address::ZERO {
                    return Ok((target, facts));
                }
            }
        }

        facts.current_resolver = inspector.resolver_of(&target.name).await?;
        facts.forward_address = inspector.addr_via(facts.resolver, &target.name).await?;
        if kind == AddressKind::Eoa {
            let subject = reverse_name(address);
            let owner = inspector.owner_of(&subject).await?;
            facts.reverse_owner = Some(OwnershipFact::new(subject, owner));
        }
        facts.reverse_name = inspector.reverse_name_of(address).await?;
        debug!(?facts, "fact snapshot");
        Ok((target, facts))
    }
}

/// Running workflow: its event stream, its cancel setter and its task.
///
/// The handle owns the only receiver, so a workflow has at most one subscriber. Dropping
/// the handle (or its receiver) stops the workflow at the next step boundary.
pub struct WorkflowHandle {
    events: mpsc::Receiver<WorkflowEvent>,
    cancel: CancelToken,
    task: JoinHandle<()>,
}

impl WorkflowHandle {
    /// Stop before the next step; a step already submitted still reaches confirmation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Next event, `None` after the terminal event.
    pub async fn next_event(&mut self) -> Option<WorkflowEvent> {
        self.events.recv().await
    }

    /// Collapse the remaining stream into a single result.
    pub async fn into_result(self) -> Result<WorkflowOutcome> {
        let outcome = SummaryReducer::collect(self.events).await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "workflow task did not finish cleanly");
        }
        outcome
    }
}

/// Configure resolution and wait for the collapsed result.
pub async fn configure_resolution<C: ChainClient + 'static>(
    client: Arc<C>,
    config: ResolutionConfig,
    request: ResolutionRequest,
) -> Result<WorkflowOutcome> {
    ConfigureResolution::new(client, config, CancelToken::new())
        .start(request)?
        .into_result()
        .await
}
