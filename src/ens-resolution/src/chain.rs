//! Chain client seam.
//!
//! Everything the workflow needs from a node goes through [`ChainClient`]: raw `eth_call`,
//! `eth_getCode`, signed submission, and waiting for a confirmation depth. ABI encoding and
//! decoding stay on this side of the seam (see [`crate::interfaces`]).

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;

use crate::{errors::ChainError, events::TxHash};

/// Transaction parameters applied to every write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOptions {
    /// Blocks after inclusion before a transaction is treated as final.
    pub confirmations: usize,
    /// Legacy gas price override; `None` lets the client decide.
    pub gas_price: Option<U256>,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            confirmations: 1,
            gas_price: None,
        }
    }
}

/// Unsigned transaction ready for submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Address,
    pub data: Bytes,
    pub gas_price: Option<U256>,
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the attached signer, if any.
    fn signer(&self) -> Option<Address>;

    /// Read-only `eth_call`; returns raw ABI-encoded output.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;

    /// Deployed bytecode at `address` (empty for accounts).
    async fn get_code(&self, address: Address) -> Result<Bytes, ChainError>;

    /// Sign and broadcast; returns once the node accepted the transaction.
    async fn send_transaction(&self, request: TxRequest) -> Result<TxHash, ChainError>;

    /// Block until `tx` has `confirmations` confirmations or fail on revert/drop.
    async fn wait_for_confirmations(
        &self,
        tx: TxHash,
        confirmations: usize,
    ) -> Result<(), ChainError>;
}
