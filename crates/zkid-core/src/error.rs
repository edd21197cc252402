//! # Error Hierarchy
//!
//! Intake validation errors, state-machine transition errors, and the
//! cross-crate [`ErrorClass`] taxonomy. No `Box<dyn Error>`, no `.unwrap()`
//! outside tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification shared by every error in the workspace.
///
/// Crate-local error enums expose a `class()` accessor returning one of
/// these so the API and CLI layers can present a uniform retry affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Attribute set failed structural checks at intake.
    InputValidation,
    /// Witness computation or proving failed.
    ProofGeneration,
    /// A verification path could not execute (network, timeout, revert).
    VerificationExecution,
    /// A credential payload is not valid JSON.
    Parse,
    /// A credential payload lacks `proof` or `publicSignals`.
    MissingFields,
}

impl ErrorClass {
    /// Whether the caller should be offered a retry.
    ///
    /// Generation failures and execution failures are transient by nature;
    /// malformed input will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProofGeneration | Self::VerificationExecution)
    }

    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputValidation => "INPUT_VALIDATION",
            Self::ProofGeneration => "PROOF_GENERATION",
            Self::VerificationExecution => "VERIFICATION_EXECUTION",
            Self::Parse => "PARSE",
            Self::MissingFields => "MISSING_FIELDS",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for identity attribute newtypes.
///
/// Each variant carries the rejected input so operators can diagnose a bad
/// submission without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty or shorter than two characters after trimming.
    #[error("invalid name: \"{0}\" (expected 2-128 characters after trimming)")]
    InvalidName(String),

    /// Roll number does not match the institutional pattern.
    #[error("invalid roll number: \"{0}\" (expected 2 digits, 2-4 uppercase letters, 2-3 digits, e.g. 22BCS01)")]
    InvalidRollNumber(String),

    /// Date of birth is not an 8-digit ddmmyyyy calendar date.
    #[error("invalid date of birth: \"{0}\" (expected ddmmyyyy)")]
    InvalidDateOfBirth(String),

    /// Phone number is not a 10-digit numeral.
    #[error("invalid phone number: \"{0}\" (expected 10 digits, optionally prefixed with +91)")]
    InvalidPhoneNumber(String),

    /// Branch is not one of the recognized programmes.
    #[error("invalid branch: \"{0}\" (expected one of CSE, ECE, ME, SM, Design)")]
    InvalidBranch(String),
}

impl ValidationError {
    /// The attribute this error concerns, as its wire name.
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "name",
            Self::InvalidRollNumber(_) => "rollNo",
            Self::InvalidDateOfBirth(_) => "dob",
            Self::InvalidPhoneNumber(_) => "phoneNo",
            Self::InvalidBranch(_) => "branch",
        }
    }

    /// Always [`ErrorClass::InputValidation`].
    pub fn class(&self) -> ErrorClass {
        ErrorClass::InputValidation
    }
}

/// Errors during lifecycle state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateTransitionError {
    /// The attempted transition is not valid from the current state.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// The current state name.
        from: String,
        /// The attempted target state name.
        to: String,
    },

    /// The run has already reached a terminal state.
    #[error("run already terminal in state {state}")]
    AlreadyTerminal {
        /// The terminal state name.
        state: String,
    },
}
