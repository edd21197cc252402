//! # Dual-Path Verification
//!
//! A proof is checked twice: off-chain against the local verification key,
//! and on a ledger by the deployed verifier contract. Both paths always run
//! to completion and report a [`VerificationOutcome`]; neither can abort the
//! other. [`classify`] reconciles the two into a [`TrustClassification`].

use std::sync::Arc;

use zkid_core::{PathKind, ProofArtifact, TrustClassification, VerificationOutcome};
use zkid_ledger::{LedgerError, OnChainVerifier, WalletSession};
use zkid_zkp::{Groth16ProofSystem, IdentityVerifyingKey, VerifyError};

/// Off-chain Groth16 verifier bound to the fixed verification key.
#[derive(Debug, Clone, Default)]
pub struct OffChainVerifier {
    vk: Option<Arc<IdentityVerifyingKey>>,
}

impl OffChainVerifier {
    /// Verifier backed by `vk`.
    pub fn new(vk: Arc<IdentityVerifyingKey>) -> Self {
        Self { vk: Some(vk) }
    }

    /// Verifier with no key; every call is an execution failure.
    pub fn unavailable() -> Self {
        Self { vk: None }
    }

    /// Whether a key is loaded.
    pub fn is_ready(&self) -> bool {
        self.vk.is_some()
    }

    /// Run the pairing check. CPU-bound.
    pub fn verify(&self, artifact: &ProofArtifact) -> VerificationOutcome {
        let Some(vk) = &self.vk else {
            return VerificationOutcome::execution_failed(
                PathKind::OffChain,
                "verification key not loaded",
            );
        };
        match Groth16ProofSystem::verify_artifact(vk, artifact) {
            Ok(valid) => VerificationOutcome::verdict(PathKind::OffChain, valid),
            Err(VerifyError::MalformedProof(reason)) => {
                VerificationOutcome::rejected(PathKind::OffChain, reason)
            }
            Err(e @ VerifyError::VerificationFailed(_)) => {
                VerificationOutcome::execution_failed(PathKind::OffChain, e.to_string())
            }
        }
    }
}

/// A way of checking a proof, chosen explicitly by the caller.
#[derive(Debug, Clone)]
pub enum VerificationPath {
    /// Local pairing check.
    OffChain(Arc<OffChainVerifier>),
    /// The service's own read-only call to the verifier contract.
    OnChain(Arc<OnChainVerifier>),
    /// A verifier call from a connected wallet account.
    DirectContractCall(Arc<WalletSession>),
}

impl VerificationPath {
    /// Which path this is.
    pub fn kind(&self) -> PathKind {
        match self {
            Self::OffChain(_) => PathKind::OffChain,
            Self::OnChain(_) => PathKind::OnChain,
            Self::DirectContractCall(_) => PathKind::DirectContractCall,
        }
    }

    /// Check `artifact`. Never fails: errors become outcomes.
    pub async fn verify(&self, artifact: &ProofArtifact) -> VerificationOutcome {
        match self {
            Self::OffChain(verifier) => {
                let verifier = Arc::clone(verifier);
                let artifact = artifact.clone();
                tokio::task::spawn_blocking(move || verifier.verify(&artifact))
                    .await
                    .unwrap_or_else(|e| {
                        VerificationOutcome::execution_failed(PathKind::OffChain, e.to_string())
                    })
            }
            Self::OnChain(verifier) => {
                ledger_outcome(self.kind(), verifier.verify_proof(artifact).await)
            }
            Self::DirectContractCall(session) => {
                ledger_outcome(self.kind(), session.verify_proof(artifact).await)
            }
        }
    }
}

fn ledger_outcome(path: PathKind, result: Result<bool, LedgerError>) -> VerificationOutcome {
    match result {
        Ok(valid) => VerificationOutcome::verdict(path, valid),
        Err(e) if !e.is_execution_failure() => VerificationOutcome::rejected(path, e.to_string()),
        Err(e) => {
            tracing::warn!(path = path.as_str(), error = %e, "ledger verification did not execute");
            VerificationOutcome::execution_failed(path, e.to_string())
        }
    }
}

/// Both outcomes and their reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualOutcome {
    /// Off-chain result.
    pub off_chain: VerificationOutcome,
    /// Ledger result.
    pub on_chain: VerificationOutcome,
    /// Reconciled trust level.
    pub classification: TrustClassification,
}

/// Runs the off-chain and a ledger path side by side.
#[derive(Debug, Clone)]
pub struct DualPathVerifier {
    off_chain: VerificationPath,
    ledger: VerificationPath,
}

impl DualPathVerifier {
    /// Pair the off-chain verifier with a ledger path.
    pub fn new(off_chain: Arc<OffChainVerifier>, ledger: VerificationPath) -> Self {
        Self {
            off_chain: VerificationPath::OffChain(off_chain),
            ledger,
        }
    }

    /// Same off-chain verifier, different ledger path.
    pub fn with_ledger(&self, ledger: VerificationPath) -> Self {
        Self {
            off_chain: self.off_chain.clone(),
            ledger,
        }
    }

    /// The configured ledger path.
    pub fn ledger_kind(&self) -> PathKind {
        self.ledger.kind()
    }

    /// Off-chain check only.
    pub async fn verify_off_chain(&self, artifact: &ProofArtifact) -> VerificationOutcome {
        self.off_chain.verify(artifact).await
    }

    /// Ledger check only.
    pub async fn verify_on_chain(&self, artifact: &ProofArtifact) -> VerificationOutcome {
        self.ledger.verify(artifact).await
    }

    /// Both paths concurrently; both settle before classification.
    pub async fn verify_both(&self, artifact: &ProofArtifact) -> DualOutcome {
        let (off_chain, on_chain) = tokio::join!(
            self.verify_off_chain(artifact),
            self.verify_on_chain(artifact)
        );
        let classification = classify(&off_chain, &on_chain);
        tracing::info!(
            off_chain = ?off_chain.definitive(),
            on_chain = ?on_chain.definitive(),
            classification = classification.as_str(),
            "dual-path verification settled"
        );
        DualOutcome {
            off_chain,
            on_chain,
            classification,
        }
    }
}

/// Reconcile two outcomes.
///
/// A path that failed to execute never upgrades the result: paired with a
/// definitive rejection it is `Rejected`, otherwise `Indeterminate`.
pub fn classify(off_chain: &VerificationOutcome, on_chain: &VerificationOutcome) -> TrustClassification {
    match (off_chain.definitive(), on_chain.definitive()) {
        (Some(true), Some(true)) => TrustClassification::FullyVerified,
        (Some(true), Some(false)) | (Some(false), Some(true)) => {
            TrustClassification::PartiallyVerified
        }
        (Some(false), _) | (_, Some(false)) => TrustClassification::Rejected,
        _ => TrustClassification::Indeterminate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(valid: bool) -> VerificationOutcome {
        VerificationOutcome::verdict(PathKind::OffChain, valid)
    }

    fn failed() -> VerificationOutcome {
        VerificationOutcome::execution_failed(PathKind::OnChain, "connection refused")
    }

    #[test]
    fn classification_truth_table() {
        use TrustClassification::*;
        let cases = [
            (ok(true), ok(true), FullyVerified),
            (ok(true), ok(false), PartiallyVerified),
            (ok(false), ok(true), PartiallyVerified),
            (ok(false), ok(false), Rejected),
            (ok(true), failed(), Indeterminate),
            (failed(), ok(true), Indeterminate),
            (ok(false), failed(), Rejected),
            (failed(), ok(false), Rejected),
            (failed(), failed(), Indeterminate),
        ];
        for (off, on, expected) in cases {
            assert_eq!(classify(&off, &on), expected, "{off:?} / {on:?}");
        }
    }

    #[test]
    fn success_without_verdict_is_not_definitive() {
        let mut odd = ok(true);
        odd.valid = None;
        assert_eq!(classify(&odd, &ok(true)), TrustClassification::Indeterminate);
    }

    #[test]
    fn execution_failure_never_fully_verifies() {
        assert_ne!(
            classify(&ok(true), &failed()),
            TrustClassification::FullyVerified
        );
    }

    #[test]
    fn missing_key_is_execution_failure() {
        let outcome = OffChainVerifier::unavailable().verify(&ProofArtifact {
            proof: zkid_core::Groth16Proof {
                pi_a: vec![],
                pi_b: vec![],
                pi_c: vec![],
                protocol: None,
                curve: None,
            },
            public_signals: vec![],
        });
        assert!(!outcome.success);
        assert_eq!(outcome.valid, None);
        assert_eq!(outcome.path, PathKind::OffChain);
    }

    #[test]
    fn ledger_errors_map_to_outcomes() {
        let o = ledger_outcome(PathKind::OnChain, Ok(true));
        assert!(o.is_valid());

        let o = ledger_outcome(
            PathKind::OnChain,
            Err(LedgerError::MalformedProof("pi_a".into())),
        );
        assert_eq!(o.definitive(), Some(false));

        let o = ledger_outcome(
            PathKind::DirectContractCall,
            Err(LedgerError::NoContract {
                address: "0x0".into(),
            }),
        );
        assert!(!o.success);
        assert_eq!(o.path, PathKind::DirectContractCall);
    }
}
