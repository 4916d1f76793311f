//! Builds, submits and confirms the transaction of a single [`Step`].

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use tracing::{debug, warn};

use crate::{
    chain::{ChainClient, TxOptions, TxRequest},
    emitter::EventEmitter,
    errors::{self, Result},
    events::{TxHash, WorkflowEvent},
    interfaces::{IENSRegistry, IPublicResolver, IRegistryEntry, IReverseRegistrar},
    steps::{NameSetter, Step},
    utils::namehash::namehash,
};

pub struct StepExecutor<'a, C: ChainClient + ?Sized> {
    client: &'a C,
    registry: Address,
    options: &'a TxOptions,
}

impl<'a, C: ChainClient + ?Sized> StepExecutor<'a, C> {
    pub fn new(client: &'a C, registry: Address, options: &'a TxOptions) -> Self {
        Self {
            client,
            registry,
            options,
        }
    }

    /// Transaction implementing `step`.
    pub fn request(&self, step: &Step) -> TxRequest {
        let (to, data): (Address, Vec<u8>) = match step {
            Step::SetResolver { name, resolver } => (
                self.registry,
                IENSRegistry::setResolverCall {
                    node: namehash(name),
                    resolver: *resolver,
                }
                .abi_encode(),
            ),
            Step::SetAddr {
                name,
                resolver,
                address,
            } => (
                *resolver,
                IPublicResolver::setAddrCall {
                    node: namehash(name),
                    a: *address,
                }
                .abi_encode(),
            ),
            Step::ClaimReverse {
                address,
                resolver,
                registrar,
            } => (
                *registrar,
                IReverseRegistrar::claimWithResolverCall {
                    owner: *address,
                    resolver: *resolver,
                }
                .abi_encode(),
            ),
            Step::SetName {
                name,
                address,
                setter,
            } => match setter {
                NameSetter::ReverseRegistrar { registrar } => (
                    *registrar,
                    IReverseRegistrar::setNameCall { name: name.clone() }.abi_encode(),
                ),
                NameSetter::RegistryEntry { registry } => (
                    *address,
                    IRegistryEntry::setNameCall {
                        ens: *registry,
                        name: name.clone(),
                    }
                    .abi_encode(),
                ),
            },
        };
        TxRequest {
            to,
            data: Bytes::from(data),
            gas_price: self.options.gas_price,
        }
    }

    /// Sign and broadcast the step's transaction.
    pub async fn submit(&self, step: &Step) -> Result<TxHash> {
        let request = self.request(step);
        let tx = self
            .client
            .send_transaction(request)
            .await
            .map_err(|e| {
                warn!(step = %step.kind(), error = %e, "submission failed");
                errors::transaction(&step.kind().to_string(), e)
            })?;
        debug!(step = %step.kind(), %tx, "transaction sent");
        Ok(tx)
    }

    /// Wait for the configured confirmation depth.
    pub async fn confirm(&self, step: &Step, tx: TxHash) -> Result<()> {
        self.client
            .wait_for_confirmations(tx, self.options.confirmations)
            .await
            .map_err(|e| {
                warn!(step = %step.kind(), %tx, error = %e, "confirmation failed");
                errors::transaction(&step.kind().to_string(), e)
            })
    }

    /// Request, submit and confirm `step`, reporting each phase on `emitter`.
    ///
    /// Once submitted, the transaction is always awaited to its confirmation depth even if
    /// the subscriber went away.
    pub async fn execute(&self, step: &Step, emitter: &EventEmitter) -> Result<TxHash> {
        emitter
            .emit(WorkflowEvent::StepRequested { step: step.clone() })
            .await;
        let tx = self.submit(step).await?;
        emitter
            .emit(WorkflowEvent::StepSubmitted {
                step: step.clone(),
                tx,
            })
            .await;
        self.confirm(step, tx).await?;
        emitter
            .emit(WorkflowEvent::StepConfirmed { step: step.clone() })
            .await;
        Ok(tx)
    }
}
