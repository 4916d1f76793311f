//! ENS node hashing (EIP-137) and reverse-node naming.

use alloy_primitives::{keccak256, Address, B256};

use crate::config::REVERSE_DOMAIN;

/// `namehash(name)`: fold `keccak256(node || keccak256(label))` from the rightmost label.
///
/// The empty name hashes to the zero node.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(labelhash(label).as_slice());
        node = keccak256(buf);
    }
    node
}

/// `keccak256(label)` of a single label.
pub fn labelhash(label: &str) -> B256 {
    keccak256(label.as_bytes())
}

/// Reverse name of an address: `<lowercase hex without 0x>.addr.reverse`.
pub fn reverse_name(address: Address) -> String {
    format!("{}.{}", hex::encode(address.as_slice()), REVERSE_DOMAIN)
}
