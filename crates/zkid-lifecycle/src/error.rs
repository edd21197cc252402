//! Lifecycle errors.

use thiserror::Error;
use zkid_core::{ErrorClass, StateTransitionError, ValidationError};
use zkid_credential::CodecError;
use zkid_zkp::ProofError;

/// Errors that abort a lifecycle run.
///
/// Verification failures never appear here: each path reports through its
/// own [`zkid_core::VerificationOutcome`] and the run continues.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// An attribute failed validation.
    #[error(transparent)]
    InputValidation(#[from] ValidationError),

    /// Proof generation failed.
    #[error(transparent)]
    ProofGeneration(#[from] ProofError),

    /// Proof generation exceeded its deadline.
    #[error("proof generation timed out after {timeout_secs}s")]
    ProofTimeout {
        /// The configured deadline in seconds.
        timeout_secs: u64,
    },

    /// The disclosure bundle could not be decoded.
    #[error(transparent)]
    Decode(#[from] CodecError),

    /// The state machine refused a transition.
    #[error(transparent)]
    Transition(#[from] StateTransitionError),
}

impl LifecycleError {
    /// Error taxonomy class.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InputValidation(e) => e.class(),
            Self::ProofGeneration(e) => e.class(),
            Self::ProofTimeout { .. } => ErrorClass::ProofGeneration,
            Self::Decode(e) => e.class(),
            // A refused transition is a defect in the run, not in its input.
            Self::Transition(_) => ErrorClass::ProofGeneration,
        }
    }

    /// Whether running again with the same input could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ProofGeneration(e) => e.is_retryable(),
            other => other.class().is_retryable(),
        }
    }
}
