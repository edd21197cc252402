//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. Everything in it is immutable after startup or
//! internally synchronized, so handlers never lock.
//!
//! Missing key files do not stop the service: it starts in a degraded mode
//! where readiness reports 503, proving fails with a retry affordance, and
//! the off-chain path reports an execution failure. The ledger path still
//! works.

use std::path::Path;
use std::sync::Arc;

use zkid_ledger::{LedgerError, OnChainVerifier};
use zkid_lifecycle::{
    CoordinatorConfig, DualPathVerifier, OffChainVerifier, ProofLifecycleCoordinator,
    VerificationPath,
};
use zkid_zkp::{KeyPair, ProofGenerator};

use crate::config::ServiceConfig;
use crate::middleware::metrics::ApiMetrics;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The lifecycle coordinator, holding keys and both verification paths.
    pub coordinator: ProofLifecycleCoordinator,
    /// Request and proof counters.
    pub metrics: ApiMetrics,
    keys_loaded: bool,
}

impl AppState {
    /// Wrap an assembled coordinator.
    pub fn new(coordinator: ProofLifecycleCoordinator) -> Self {
        Self {
            keys_loaded: coordinator.can_issue(),
            coordinator,
            metrics: ApiMetrics::new(),
        }
    }

    /// Build from loaded keys and a ledger verifier.
    pub fn with_keys(
        keys: Option<KeyPair>,
        ledger: OnChainVerifier,
        config: CoordinatorConfig,
    ) -> Self {
        let (generator, off_chain) = match keys {
            Some(keys) => (
                ProofGenerator::new(Arc::new(keys.proving)),
                OffChainVerifier::new(Arc::new(keys.verifying)),
            ),
            None => (ProofGenerator::unavailable(), OffChainVerifier::unavailable()),
        };
        let verifier = DualPathVerifier::new(
            Arc::new(off_chain),
            VerificationPath::OnChain(Arc::new(ledger)),
        );
        Self::new(ProofLifecycleCoordinator::new(generator, verifier, config))
    }

    /// Build from service configuration, loading keys from disk.
    ///
    /// # Errors
    ///
    /// Fails only if the ledger client cannot be constructed. Unreadable
    /// keys are logged and leave the service degraded.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, LedgerError> {
        let keys = load_keys(&config.keys_dir);
        let ledger = OnChainVerifier::new(&config.ledger)?;
        tracing::info!(
            rpc_url = %config.ledger.rpc_url,
            verifier = ledger.address(),
            "ledger verifier configured"
        );
        Ok(Self::with_keys(keys, ledger, config.coordinator()))
    }

    /// Whether proving and verification keys are loaded.
    pub fn keys_loaded(&self) -> bool {
        self.keys_loaded
    }
}

fn load_keys(dir: &Path) -> Option<KeyPair> {
    match KeyPair::load(dir) {
        Ok(keys) => {
            tracing::info!(dir = %dir.display(), "loaded circuit keys");
            Some(keys)
        }
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "circuit keys not loaded; run `zkid setup` to generate them"
            );
            None
        }
    }
}
