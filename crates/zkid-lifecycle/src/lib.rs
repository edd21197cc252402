//! # zkid-lifecycle — Proof Lifecycle Orchestration
//!
//! Coordinates the stages of a credential's life:
//!
//! 1. **Issuance**: validated attributes are hashed into a circuit input,
//!    proven, checked on both verification paths, and packaged into a
//!    disclosure bundle.
//! 2. **Verification**: a presented bundle is decoded and checked on both
//!    paths.
//!
//! Verification-path failures are outcomes, not errors: a run that reaches
//! the verification stage always completes, and "the ledger was
//! unreachable" stays distinguishable from "the proof is invalid" all the
//! way to the [`zkid_core::TrustClassification`].

pub mod coordinator;
pub mod error;
pub mod state;
pub mod verifier;

pub use coordinator::{
    CoordinatorConfig, IssuanceReport, ProofLifecycleCoordinator, RetryPolicy, VerificationReport,
};
pub use error::LifecycleError;
pub use state::{Flow, LifecycleMachine, LifecycleState, TransitionRecord};
pub use verifier::{classify, DualOutcome, DualPathVerifier, OffChainVerifier, VerificationPath};
