//! # Cryptographic Error Types

use thiserror::Error;

/// Errors from field parsing and hashing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The string is not a decimal or `0x`-hex integer.
    #[error("invalid field element \"{value}\": {reason}")]
    InvalidFieldElement {
        /// The rejected input.
        value: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The integer is not below the field modulus.
    #[error("non-canonical field element \"{0}\": value is not below the field modulus")]
    NonCanonical(String),

    /// The configured hash scheme name is unknown.
    #[error("unknown hash scheme \"{0}\" (expected poseidon or sha256)")]
    UnknownScheme(String),
}
