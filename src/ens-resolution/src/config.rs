//! Network identity and transaction settings, passed explicitly to every operation.

use alloy_primitives::Address;

use crate::chain::TxOptions;

/// Reserved namespace for reverse records.
pub const REVERSE_DOMAIN: &str = "addr.reverse";

/// Parent domain used by FIFS label registration when none is given.
pub const DEFAULT_BASE_DOMAIN: &str = "users.iexec.eth";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// ENS registry contract of the network.
    pub registry: Address,
    /// Public resolver the configured name should use.
    pub public_resolver: Address,
    pub tx: TxOptions,
}

impl ResolutionConfig {
    pub fn new(registry: Address, public_resolver: Address) -> Self {
        Self {
            registry,
            public_resolver,
            tx: TxOptions::default(),
        }
    }

    pub fn with_tx_options(mut self, tx: TxOptions) -> Self {
        self.tx = tx;
        self
    }
}
