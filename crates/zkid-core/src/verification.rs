//! # Verification Outcomes
//!
//! The result of running one proof through one verification path, and the
//! reconciled classification across paths.
//!
//! A path that *executed* and found the proof invalid (`success = true`,
//! `valid = Some(false)`) is a definitive negative. A path that *failed to
//! execute* (`success = false`, `valid = None`) says nothing about the
//! proof. Keeping these apart is what lets the classifier distinguish
//! `Rejected` from `Indeterminate`.

use serde::{Deserialize, Serialize};

use crate::temporal::Timestamp;

/// Which verification path produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathKind {
    /// Local pairing check against the verification key.
    OffChain,
    /// Read-only call to the ledger verifier contract through the
    /// service's configured RPC endpoint.
    OnChain,
    /// Read-only call issued through a holder- or verifier-supplied wallet
    /// session.
    DirectContractCall,
}

impl PathKind {
    /// Stable display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OffChain => "OffChain",
            Self::OnChain => "OnChain",
            Self::DirectContractCall => "DirectContractCall",
        }
    }

    /// Whether this path consults the ledger.
    pub fn is_ledger(&self) -> bool {
        !matches!(self, Self::OffChain)
    }
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one verification path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Whether the path executed to completion.
    pub success: bool,
    /// The verdict, present only when `success` is true.
    pub valid: Option<bool>,
    /// Failure or rejection reason.
    pub error: Option<String>,
    /// When the outcome was recorded.
    pub timestamp: Timestamp,
    /// The path that produced it.
    pub path: PathKind,
}

impl VerificationOutcome {
    /// The path executed and returned a verdict.
    pub fn verdict(path: PathKind, valid: bool) -> Self {
        Self {
            success: true,
            valid: Some(valid),
            error: None,
            timestamp: Timestamp::now(),
            path,
        }
    }

    /// The path executed and rejected the proof with a reason, e.g. a
    /// malformed proof structure.
    pub fn rejected(path: PathKind, reason: impl Into<String>) -> Self {
        Self {
            success: true,
            valid: Some(false),
            error: Some(reason.into()),
            timestamp: Timestamp::now(),
            path,
        }
    }

    /// The path could not execute.
    pub fn execution_failed(path: PathKind, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            valid: None,
            error: Some(reason.into()),
            timestamp: Timestamp::now(),
            path,
        }
    }

    /// `Some(verdict)` when the path executed, `None` otherwise.
    ///
    /// An outcome claiming success without a verdict is treated as not
    /// executed.
    pub fn definitive(&self) -> Option<bool> {
        if self.success {
            self.valid
        } else {
            None
        }
    }

    /// Definitively valid.
    pub fn is_valid(&self) -> bool {
        self.definitive() == Some(true)
    }
}

/// Reconciled confidence across the off-chain and ledger paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustClassification {
    /// Both paths executed and accepted the proof.
    FullyVerified,
    /// One path accepted, the other executed and rejected.
    PartiallyVerified,
    /// No path accepted, and at least one executed and rejected.
    Rejected,
    /// A path could not execute and no rejection was observed.
    Indeterminate,
}

impl TrustClassification {
    /// Stable display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullyVerified => "FullyVerified",
            Self::PartiallyVerified => "PartiallyVerified",
            Self::Rejected => "Rejected",
            Self::Indeterminate => "Indeterminate",
        }
    }

    /// Human-readable summary for a verifier.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::FullyVerified => "proof verified off-chain and on the ledger",
            Self::PartiallyVerified => "verification paths disagree; treat with caution",
            Self::Rejected => "proof is invalid",
            Self::Indeterminate => "verification could not be completed; retry later",
        }
    }
}

impl std::fmt::Display for TrustClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
