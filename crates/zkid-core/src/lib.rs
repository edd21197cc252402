#![deny(missing_docs)]

//! # zkid-core — Foundational Types for Zero-Knowledge Student Identity
//!
//! Every other crate in the workspace depends on this one. It has no internal
//! crate dependencies and no cryptographic dependencies: only `serde`,
//! `serde_json`, `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Validated newtypes at intake.** An [`AttributeSet`] can only be built
//!    from values that pass the intake rules ([`FullName`], [`RollNumber`],
//!    [`DateOfBirth`], [`PhoneNumber`], [`Branch`]). Downstream stages never
//!    re-validate.
//!
//! 2. **Proofs travel as strings.** A [`ProofArtifact`] carries field
//!    elements as decimal strings ([`FieldElement`]), exactly as they appear
//!    on the wire. Parsing into curve points happens at the verification
//!    boundary, where malformed input fails closed.
//!
//! 3. **"Invalid" and "could not check" are different answers.** A
//!    [`VerificationOutcome`] separates `success` (the path executed) from
//!    `valid` (the proof verified), and [`TrustClassification`] keeps
//!    `Rejected` distinct from `Indeterminate`.
//!
//! 4. **[`ErrorClass`] taxonomy.** Each crate's `thiserror` enum maps onto one
//!    class so callers can decide on retry affordances uniformly.

pub mod attributes;
pub mod error;
pub mod proof;
pub mod temporal;
pub mod verification;

pub use attributes::{
    AttributeName, AttributeSet, Branch, DateOfBirth, FullName, PhoneNumber, RawAttributes,
    RollNumber,
};
pub use error::{ErrorClass, StateTransitionError, ValidationError};
pub use proof::{FieldElement, Groth16Proof, ProofArtifact};
pub use temporal::Timestamp;
pub use verification::{PathKind, TrustClassification, VerificationOutcome};
