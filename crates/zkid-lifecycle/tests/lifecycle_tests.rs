//! # End-to-End Lifecycle Tests
//!
//! Real Groth16 proving and off-chain verification, with the ledger played
//! by a wiremock JSON-RPC node. Keys come from a seeded setup shared across
//! the test binary.

use std::sync::{Arc, OnceLock};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tokio::sync::watch;
use url::Url;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zkid_core::{AttributeSet, FieldElement, PathKind, RawAttributes, TrustClassification};
use zkid_credential::{DisclosureCodec, PrivacySettings};
use zkid_ledger::config::DEFAULT_VERIFIER_ADDRESS;
use zkid_ledger::{LedgerConfig, OnChainVerifier};
use zkid_lifecycle::{
    CoordinatorConfig, DualPathVerifier, LifecycleState, OffChainVerifier,
    ProofLifecycleCoordinator, RetryPolicy, VerificationPath,
};
use zkid_zkp::{KeyPair, ProofGenerator};

fn keys() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| KeyPair::generate(&mut StdRng::seed_from_u64(11)).unwrap())
}

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

fn coordinator(rpc_url: &str) -> ProofLifecycleCoordinator {
    let keys = keys();
    let config = LedgerConfig::new(Url::parse(rpc_url).unwrap(), DEFAULT_VERIFIER_ADDRESS)
        .unwrap()
        .with_timeout(2)
        .with_retries(0);
    let ledger = VerificationPath::OnChain(Arc::new(OnChainVerifier::new(&config).unwrap()));
    let off_chain = Arc::new(OffChainVerifier::new(Arc::new(keys.verifying.clone())));
    ProofLifecycleCoordinator::new(
        ProofGenerator::new(Arc::new(keys.proving.clone())),
        DualPathVerifier::new(off_chain, ledger),
        CoordinatorConfig {
            retry: RetryPolicy {
                max_generation_attempts: 2,
            },
            ..CoordinatorConfig::default()
        },
    )
}

async fn ledger_answering(valid: bool) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_call" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": format!("0x{:064x}", u8::from(valid))
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn issuance_with_agreeing_ledger_is_fully_verified() {
    let ledger = ledger_answering(true).await;
    let coordinator = coordinator(&ledger.uri());

    let (tx, rx) = watch::channel(LifecycleState::Preparing);
    let report = coordinator
        .issue_with_progress(jane(), None, tx)
        .await
        .unwrap();

    assert_eq!(report.state, LifecycleState::Complete);
    assert_eq!(*rx.borrow(), LifecycleState::Complete);
    assert_eq!(report.classification, TrustClassification::FullyVerified);
    assert_eq!(report.attempts, 1);
    assert!(report.off_chain.is_valid());
    assert_eq!(report.on_chain.path, PathKind::OnChain);

    let names: Vec<_> = report.transitions.iter().map(|t| t.to.name()).collect();
    assert_eq!(
        names,
        [
            "HASHING",
            "PROOF_GENERATING",
            "OFF_CHAIN_VERIFYING",
            "ON_CHAIN_VERIFYING",
            "PACKAGING",
            "COMPLETE"
        ]
    );

    let details = report.bundle.revealed_details.as_ref().unwrap();
    assert_eq!(details.name.as_deref(), Some("Jane Doe"));
    assert_eq!(details.roll_no.as_deref(), Some("22BCS01"));
    assert_eq!(details.branch.as_deref(), Some("CSE"));
    assert!(details.dob.is_none());
    assert!(details.phone_no.is_none());

    let recomputed = coordinator.hasher().commitment(&jane());
    assert_eq!(report.commitment, zkid_crypto::to_field_element(&recomputed));
    assert_eq!(report.bundle.public_signals, vec![report.commitment.clone()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_ledger_is_indeterminate_but_completes() {
    let coordinator = coordinator("http://127.0.0.1:1");
    let report = coordinator.issue(jane(), None).await.unwrap();

    assert_eq!(report.state, LifecycleState::Complete);
    assert!(report.off_chain.is_valid());
    assert!(!report.on_chain.success);
    assert_eq!(report.on_chain.valid, None);
    assert_eq!(report.classification, TrustClassification::Indeterminate);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disagreeing_ledger_is_partial() {
    let ledger = ledger_answering(false).await;
    let report = coordinator(&ledger.uri()).issue(jane(), None).await.unwrap();
    assert_eq!(report.classification, TrustClassification::PartiallyVerified);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concealing_everything_still_verifies() {
    let ledger = ledger_answering(true).await;
    let report = coordinator(&ledger.uri())
        .issue(jane(), Some(PrivacySettings::conceal_all()))
        .await
        .unwrap();
    assert!(report.bundle.revealed_details.is_none());
    assert_eq!(report.classification, TrustClassification::FullyVerified);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn issued_bundle_verifies_from_qr_payload() {
    let ledger = ledger_answering(true).await;
    let coordinator = coordinator(&ledger.uri());
    let issued = coordinator.issue(jane(), None).await.unwrap();
    let payload = DisclosureCodec::to_json(&issued.bundle).unwrap();

    let report = coordinator.verify_bundle(json!(payload)).await.unwrap();
    assert_eq!(report.state, LifecycleState::Complete);
    assert_eq!(report.classification, TrustClassification::FullyVerified);
    assert!(report.disclosure_violations.is_empty());
    assert_eq!(report.proof_type.as_deref(), Some("student-identity"));
    assert_eq!(report.transitions.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tampered_commitment_is_rejected() {
    let honest = ledger_answering(true).await;
    let issued = coordinator(&honest.uri()).issue(jane(), None).await.unwrap();

    let mut bundle = issued.bundle;
    bundle.public_signals = vec![FieldElement::from("12345")];

    let ledger = ledger_answering(false).await;
    let report = coordinator(&ledger.uri())
        .verify_bundle(serde_json::to_value(&bundle).unwrap())
        .await
        .unwrap();
    assert_eq!(report.off_chain.definitive(), Some(false));
    assert_eq!(report.classification, TrustClassification::Rejected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tampered_commitment_with_unreachable_ledger_is_still_rejected() {
    let honest = ledger_answering(true).await;
    let issued = coordinator(&honest.uri()).issue(jane(), None).await.unwrap();

    let mut bundle = issued.bundle;
    bundle.public_signals = vec![FieldElement::from("12345")];

    let report = coordinator("http://127.0.0.1:1")
        .verify_bundle(serde_json::to_value(&bundle).unwrap())
        .await
        .unwrap();
    assert!(!report.on_chain.success);
    assert_eq!(report.classification, TrustClassification::Rejected);
}
