use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Whether the target address is a plain account or a deployed contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressKind {
    Eoa,
    Contract,
}

impl AddressKind {
    /// Classify an address from the bytecode deployed at it.
    pub fn from_code(code: &[u8]) -> Self {
        if code.is_empty() {
            AddressKind::Eoa
        } else {
            AddressKind::Contract
        }
    }

    pub fn is_contract(self) -> bool {
        matches!(self, AddressKind::Contract)
    }
}

/// Name/address pair to configure, with the address kind fixed for the whole run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionTarget {
    pub name: String,
    pub address: Address,
    pub kind: AddressKind,
}

/// Registry ownership of a name or reverse name.
///
/// An unset entry is reported with `owner == Address::ZERO`, never as an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipFact {
    pub subject: String,
    pub owner: Address,
}

impl OwnershipFact {
    pub fn new(subject: impl Into<String>, owner: Address) -> Self {
        Self {
            subject: subject.into(),
            owner,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.owner == Address::ZERO
    }

    pub fn is_owned_by(&self, account: Address) -> bool {
        !self.is_unset() && self.owner == account
    }
}

/// Snapshot of on-chain state the planner works from.
///
/// Gathered sequentially at workflow start. Fields after a failed precondition are left at
/// their defaults: gathering stops as soon as the plan is known to be impossible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionFacts {
    /// Signing account.
    pub caller: Address,
    /// Resolver the name should point at.
    pub resolver: Address,
    pub resolver_is_contract: bool,
    pub name_owner: Option<OwnershipFact>,
    /// `owner()` of the target contract (contract targets only).
    pub entry_owner: Option<Address>,
    /// Owner of `addr.reverse` (EOA targets only).
    pub reverse_registrar: Option<Address>,
    pub current_resolver: Option<Address>,
    /// Forward record of the name on `resolver`.
    pub forward_address: Option<Address>,
    /// Ownership of the target's reverse node (EOA targets only).
    pub reverse_owner: Option<OwnershipFact>,
    pub reverse_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_kind_from_code() {
        assert_eq!(AddressKind::from_code(&[]), AddressKind::Eoa);
        assert_eq!(AddressKind::from_code(&[0x60, 0x80]), AddressKind::Contract);
    }

    #[test]
    fn test_unset_owner_is_never_owned() {
        let fact = OwnershipFact::new("alice.eth", Address::ZERO);
        assert!(fact.is_unset());
        assert!(!fact.is_owned_by(Address::ZERO));

        let owner = Address::repeat_byte(0x11);
        let fact = OwnershipFact::new("alice.eth", owner);
        assert!(fact.is_owned_by(owner));
        assert!(!fact.is_owned_by(Address::repeat_byte(0x22)));
    }
}
