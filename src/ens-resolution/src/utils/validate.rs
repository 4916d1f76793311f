//! Syntax checks for names, labels, addresses and text-record keys.
//!
//! Every public operation validates its inputs here first; a failure is a
//! [`ResolutionError::Validation`] and nothing reaches the chain.

use std::str::FromStr;

use alloy_primitives::Address;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ResolutionError, Result};

// Normalized ENS label: no dots, no whitespace, no uppercase ASCII.
static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^.\sA-Z]+$").expect("valid regex"));

/// Domain name such as `alice.users.example.eth`.
pub fn ens_domain(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(ResolutionError::Validation("ENS name is empty".to_string()));
    }
    for label in name.split('.') {
        if !LABEL_RE.is_match(label) {
            return Err(ResolutionError::Validation(format!(
                "`{name}` is not a valid ENS name (lowercase, dot separated, no empty label)"
            )));
        }
    }
    Ok(name.to_string())
}

/// Single label registered under a parent domain.
pub fn ens_label(label: &str) -> Result<String> {
    if !LABEL_RE.is_match(label) {
        return Err(ResolutionError::Validation(format!(
            "`{label}` is not a valid ENS label"
        )));
    }
    Ok(label.to_string())
}

/// Hex address; mixed-case input must carry a valid EIP-55 checksum.
pub fn address(input: &str) -> Result<Address> {
    let hex_part = input.strip_prefix("0x").unwrap_or(input);
    let mixed_case = hex_part.chars().any(|c| c.is_ascii_uppercase())
        && hex_part.chars().any(|c| c.is_ascii_lowercase());
    let parsed = if mixed_case {
        Address::parse_checksummed(input, None).map_err(|e| e.to_string())
    } else {
        Address::from_str(input).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| ResolutionError::Validation(format!("`{input}` is not a valid address: {e}")))
}

pub fn text_record_key(key: &str) -> Result<String> {
    if key.trim().is_empty() {
        return Err(ResolutionError::Validation(
            "text record key is empty".to_string(),
        ));
    }
    Ok(key.to_string())
}
