//! Pure helpers: ENS node hashing and input validation.

pub mod namehash;
pub mod validate;
