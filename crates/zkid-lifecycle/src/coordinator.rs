//! # Proof Lifecycle Coordinator
//!
//! Drives issuance (attributes in, disclosure bundle out) and verification
//! (bundle in, report out) through the [`LifecycleMachine`].
//!
//! Each run gets a UUID and its own tracing span. Proving runs on a blocking
//! worker under a deadline. After proving, both verification paths are put
//! in flight together; the machine records `OffChainVerifying` then
//! `OnChainVerifying` as they are launched, and moves on once both settle.
//!
//! Runs share nothing mutable. Dropping a run's future abandons it; a
//! proving task that outlives its deadline finishes on the blocking pool and
//! its result is discarded.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;
use zkid_core::{
    AttributeName, AttributeSet, FieldElement, ProofArtifact, TrustClassification,
    VerificationOutcome,
};
use zkid_credential::{DisclosureBundle, DisclosureCodec, PrivacySettings, RevealedDetails};
use zkid_crypto::{CircuitInput, CommitmentHasher, HashScheme};
use zkid_zkp::{ProofError, ProofGenerator};

use crate::error::LifecycleError;
use crate::state::{Flow, LifecycleMachine, LifecycleState, TransitionRecord};
use crate::verifier::{DualOutcome, DualPathVerifier, VerificationPath};

/// How many times proof generation is attempted per issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_generation_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_generation_attempts: 1,
        }
    }
}

/// Coordinator tuning.
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorConfig {
    /// Deadline for a single proving attempt.
    pub proof_timeout: Duration,
    /// Generation retry policy.
    pub retry: RetryPolicy,
    /// String-attribute hash scheme.
    pub hash_scheme: HashScheme,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            proof_timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
            hash_scheme: HashScheme::default(),
        }
    }
}

/// Result of a completed issuance run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// Final state.
    pub state: LifecycleState,
    /// The credential.
    pub bundle: DisclosureBundle,
    /// The public commitment.
    pub commitment: FieldElement,
    /// Off-chain outcome.
    pub off_chain: VerificationOutcome,
    /// Ledger outcome.
    pub on_chain: VerificationOutcome,
    /// Reconciled trust level.
    pub classification: TrustClassification,
    /// Every transition taken.
    pub transitions: Vec<TransitionRecord>,
    /// Proving attempts used.
    pub attempts: u32,
}

/// Result of a completed verification run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// Final state.
    pub state: LifecycleState,
    /// Off-chain outcome.
    pub off_chain: VerificationOutcome,
    /// Ledger outcome.
    pub on_chain: VerificationOutcome,
    /// Reconciled trust level.
    pub classification: TrustClassification,
    /// What the holder disclosed.
    pub revealed_details: Option<RevealedDetails>,
    /// Revealed attributes the holder's own settings did not flag.
    pub disclosure_violations: Vec<AttributeName>,
    /// Credential kind, if stated.
    pub proof_type: Option<String>,
    /// Every transition taken.
    pub transitions: Vec<TransitionRecord>,
}

/// Orchestrates proving, verification, and packaging.
#[derive(Debug, Clone)]
pub struct ProofLifecycleCoordinator {
    hasher: CommitmentHasher,
    generator: ProofGenerator,
    verifier: DualPathVerifier,
    codec: DisclosureCodec,
    config: CoordinatorConfig,
}

impl ProofLifecycleCoordinator {
    /// Assemble a coordinator.
    pub fn new(
        generator: ProofGenerator,
        verifier: DualPathVerifier,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            hasher: CommitmentHasher::new(config.hash_scheme),
            generator,
            verifier,
            codec: DisclosureCodec::default(),
            config,
        }
    }

    /// Same coordinator, verifying through a different ledger path.
    pub fn with_ledger_path(&self, ledger: VerificationPath) -> Self {
        Self {
            verifier: self.verifier.with_ledger(ledger),
            ..self.clone()
        }
    }

    /// The dual-path verifier.
    pub fn verifier(&self) -> &DualPathVerifier {
        &self.verifier
    }

    /// The attribute hasher.
    pub fn hasher(&self) -> &CommitmentHasher {
        &self.hasher
    }

    /// Whether a proving key is loaded.
    pub fn can_issue(&self) -> bool {
        self.generator.is_ready()
    }

    /// Issue a credential.
    pub async fn issue(
        &self,
        attributes: AttributeSet,
        settings: Option<PrivacySettings>,
    ) -> Result<IssuanceReport, LifecycleError> {
        self.run_issuance(attributes, settings, None).await
    }

    /// Issue a credential, publishing each state on `progress`.
    pub async fn issue_with_progress(
        &self,
        attributes: AttributeSet,
        settings: Option<PrivacySettings>,
        progress: watch::Sender<LifecycleState>,
    ) -> Result<IssuanceReport, LifecycleError> {
        self.run_issuance(attributes, settings, Some(progress)).await
    }

    /// Verify a presented bundle, given as a JSON object or a JSON string.
    pub async fn verify_bundle(&self, payload: Value) -> Result<VerificationReport, LifecycleError> {
        self.run_verification(payload, None).await
    }

    /// Verify a presented bundle, publishing each state on `progress`.
    pub async fn verify_bundle_with_progress(
        &self,
        payload: Value,
        progress: watch::Sender<LifecycleState>,
    ) -> Result<VerificationReport, LifecycleError> {
        self.run_verification(payload, Some(progress)).await
    }

    /// Both verification paths for a bare artifact, outside any run.
    pub async fn verify_artifact(&self, artifact: &ProofArtifact) -> DualOutcome {
        self.verifier.verify_both(artifact).await
    }

    /// Prove `input` on a blocking worker, bounded by the configured deadline.
    pub async fn generate(&self, input: CircuitInput) -> Result<ProofArtifact, LifecycleError> {
        let generator = self.generator.clone();
        let task = tokio::task::spawn_blocking(move || generator.generate(&input));
        match tokio::time::timeout(self.config.proof_timeout, task).await {
            Err(_) => Err(LifecycleError::ProofTimeout {
                timeout_secs: self.config.proof_timeout.as_secs(),
            }),
            Ok(Err(join)) => Err(ProofError::GenerationFailed(join.to_string()).into()),
            Ok(Ok(result)) => Ok(result?),
        }
    }

    async fn run_issuance(
        &self,
        attributes: AttributeSet,
        settings: Option<PrivacySettings>,
        progress: Option<watch::Sender<LifecycleState>>,
    ) -> Result<IssuanceReport, LifecycleError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("issuance", %run_id);
        self.issuance_steps(run_id, attributes, settings, progress)
            .instrument(span)
            .await
    }

    async fn issuance_steps(
        &self,
        run_id: Uuid,
        attributes: AttributeSet,
        settings: Option<PrivacySettings>,
        progress: Option<watch::Sender<LifecycleState>>,
    ) -> Result<IssuanceReport, LifecycleError> {
        let mut machine = LifecycleMachine::new(Flow::Issuance, progress);
        let max_attempts = self.config.retry.max_generation_attempts.max(1);
        let mut attempts = 0;

        let artifact = loop {
            attempts += 1;
            machine.advance(LifecycleState::Hashing)?;
            let input = self.hasher.circuit_input(&attributes);
            machine.advance(LifecycleState::ProofGenerating)?;

            match self.generate(input).await {
                Ok(artifact) => break artifact,
                Err(err) => {
                    machine.fail(err.to_string())?;
                    if err.is_retryable() && attempts < max_attempts {
                        tracing::warn!(
                            attempt = attempts,
                            max_attempts,
                            error = %err,
                            "proof generation failed, retrying"
                        );
                        machine.advance(LifecycleState::Preparing)?;
                        continue;
                    }
                    tracing::error!(attempts, error = %err, "issuance failed");
                    return Err(err);
                }
            }
        };

        machine.advance(LifecycleState::OffChainVerifying)?;
        machine.advance(LifecycleState::OnChainVerifying)?;
        let dual = self.verifier.verify_both(&artifact).await;

        machine.advance(LifecycleState::Packaging)?;
        let settings = settings.unwrap_or_default();
        let bundle = self.codec.encode(&artifact, &attributes, &settings);
        let commitment = artifact
            .commitment()
            .cloned()
            .ok_or_else(|| ProofError::GenerationFailed("proof has no public signal".into()))?;
        machine.advance(LifecycleState::Complete)?;

        tracing::info!(
            attempts,
            classification = dual.classification.as_str(),
            "issuance complete"
        );
        let (state, transitions) = machine.finish();
        Ok(IssuanceReport {
            run_id,
            state,
            bundle,
            commitment,
            off_chain: dual.off_chain,
            on_chain: dual.on_chain,
            classification: dual.classification,
            transitions,
            attempts,
        })
    }

    async fn run_verification(
        &self,
        payload: Value,
        progress: Option<watch::Sender<LifecycleState>>,
    ) -> Result<VerificationReport, LifecycleError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("verification", %run_id);
        self.verification_steps(run_id, payload, progress)
            .instrument(span)
            .await
    }

    async fn verification_steps(
        &self,
        run_id: Uuid,
        payload: Value,
        progress: Option<watch::Sender<LifecycleState>>,
    ) -> Result<VerificationReport, LifecycleError> {
        let mut machine = LifecycleMachine::new(Flow::Verification, progress);

        let bundle = match DisclosureCodec::decode_value(payload) {
            Ok(bundle) => bundle,
            Err(err) => {
                machine.fail(err.to_string())?;
                tracing::warn!(error = %err, "bundle rejected at decode");
                return Err(err.into());
            }
        };
        let violations = bundle.disclosure_violations();
        if !violations.is_empty() {
            tracing::warn!(?violations, "bundle reveals attributes its settings conceal");
        }

        machine.advance(LifecycleState::OffChainVerifying)?;
        machine.advance(LifecycleState::OnChainVerifying)?;
        let dual = self.verifier.verify_both(&bundle.artifact()).await;
        machine.advance(LifecycleState::Complete)?;

        tracing::info!(classification = dual.classification.as_str(), "verification complete");
        let (state, transitions) = machine.finish();
        Ok(VerificationReport {
            run_id,
            state,
            off_chain: dual.off_chain,
            on_chain: dual.on_chain,
            classification: dual.classification,
            revealed_details: bundle.revealed_details,
            disclosure_violations: violations,
            proof_type: bundle.proof_type,
            transitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use zkid_core::RawAttributes;
    use zkid_credential::CodecError;

    use crate::verifier::OffChainVerifier;

    fn jane() -> AttributeSet {
        RawAttributes {
            name: "Jane Doe".into(),
            roll_no: "22BCS01".into(),
            dob: "01012000".into(),
            phone_no: "9876543210".into(),
            branch: "CSE".into(),
        }
        .validate()
        .unwrap()
    }

    /// A coordinator with no keys: issuance fails at proving, and nothing
    /// here needs a ledger.
    fn keyless(attempts: u32) -> ProofLifecycleCoordinator {
        let off_chain = Arc::new(OffChainVerifier::unavailable());
        ProofLifecycleCoordinator::new(
            ProofGenerator::unavailable(),
            DualPathVerifier::new(off_chain.clone(), VerificationPath::OffChain(off_chain)),
            CoordinatorConfig {
                retry: RetryPolicy {
                    max_generation_attempts: attempts,
                },
                ..CoordinatorConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn missing_keys_fail_issuance() {
        let coordinator = keyless(1);
        assert!(!coordinator.can_issue());
        let (tx, rx) = watch::channel(LifecycleState::Preparing);
        let err = coordinator
            .issue_with_progress(jane(), None, tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::ProofGeneration(ProofError::KeysUnavailable(_))
        ));
        assert!(err.is_retryable());
        assert!(matches!(*rx.borrow(), LifecycleState::Failed(_)));
    }

    #[tokio::test]
    async fn undecodable_bundle_fails_verification() {
        let coordinator = keyless(1);
        let err = coordinator
            .verify_bundle(serde_json::json!({ "proof": { "pi_a": [] } }))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::Decode(CodecError::MissingFields(ref f)) if f == &vec!["publicSignals"]
        ));
    }

    #[tokio::test]
    async fn verification_without_keys_is_indeterminate() {
        let coordinator = keyless(1);
        let report = coordinator
            .verify_bundle(serde_json::json!({
                "proof": { "pi_a": ["1", "2"], "pi_b": [["1", "0"], ["1", "0"]], "pi_c": ["1", "2"] },
                "publicSignals": ["1"]
            }))
            .await
            .unwrap();
        assert_eq!(report.state, LifecycleState::Complete);
        assert_eq!(report.classification, TrustClassification::Indeterminate);
        assert_eq!(report.transitions.len(), 3);
    }

    #[tokio::test]
    async fn deadline_failures_are_generation_class() {
        let coordinator = ProofLifecycleCoordinator {
            config: CoordinatorConfig {
                proof_timeout: Duration::ZERO,
                ..CoordinatorConfig::default()
            },
            ..keyless(1)
        };
        let input = coordinator.hasher().circuit_input(&jane());
        let err = coordinator.generate(input).await.unwrap_err();
        assert_eq!(err.class(), zkid_core::ErrorClass::ProofGeneration);
    }
}
