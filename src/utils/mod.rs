//! Shared utilities.
//!
//! - [`errors`]: Application error type and HTTP mapping
//! - [`jwt`]: JWT token creation and verification
//! - [`pagination`]: Request pagination utilities
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Custom serde deserialization helpers

pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod serde;
