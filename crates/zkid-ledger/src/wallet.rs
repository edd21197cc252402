//! # Wallet Sessions
//!
//! The direct-contract-call path: the verifier is invoked from a user's
//! wallet account rather than the service's own node connection. A session
//! is only established once the node confirms the expected chain and exposes
//! an account to call from.

use std::time::Duration;

use url::Url;
use zkid_core::ProofArtifact;

use crate::config::{is_valid_eth_address, DEFAULT_CHAIN_ID};
use crate::error::LedgerError;
use crate::rpc::JsonRpcClient;
use crate::verifier::call_verifier;

/// Parameters for [`WalletSession::connect`].
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Wallet-backed JSON-RPC endpoint.
    pub rpc_url: Url,
    /// Verifier contract address.
    pub verifier_address: String,
    /// Chain the verifier is deployed on.
    pub expected_chain_id: u64,
    /// Account to call from. `None` picks the first exposed account.
    pub account: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl WalletConfig {
    /// Defaults: local chain ID, first account, 10s timeout.
    pub fn new(rpc_url: Url, verifier_address: impl Into<String>) -> Self {
        Self {
            rpc_url,
            verifier_address: verifier_address.into(),
            expected_chain_id: DEFAULT_CHAIN_ID,
            account: None,
            timeout_secs: 10,
        }
    }
}

/// A connected wallet.
#[derive(Debug, Clone)]
pub struct WalletSession {
    client: JsonRpcClient,
    verifier_address: String,
    account: String,
    chain_id: u64,
}

impl WalletSession {
    /// Connect, checking the chain ID and resolving the account.
    pub async fn connect(config: WalletConfig) -> Result<Self, LedgerError> {
        if !is_valid_eth_address(&config.verifier_address) {
            return Err(LedgerError::InvalidAddress(config.verifier_address));
        }
        // No automatic retries against a wallet.
        let client = JsonRpcClient::new(
            config.rpc_url,
            Duration::from_secs(config.timeout_secs),
            0,
        )?;

        let chain_id = client.chain_id().await?;
        if chain_id != config.expected_chain_id {
            return Err(LedgerError::ChainMismatch {
                expected: config.expected_chain_id,
                actual: chain_id,
            });
        }

        let accounts = client.accounts().await?;
        let account = match config.account {
            Some(wanted) => {
                if !is_valid_eth_address(&wanted) {
                    return Err(LedgerError::InvalidAddress(wanted));
                }
                accounts
                    .into_iter()
                    .find(|a| a.eq_ignore_ascii_case(&wanted))
                    .ok_or(LedgerError::NotConnected)?
            }
            None => accounts.into_iter().next().ok_or(LedgerError::NotConnected)?,
        };

        tracing::info!(chain_id, %account, "wallet session connected");
        Ok(Self {
            client,
            verifier_address: config.verifier_address,
            account,
            chain_id,
        })
    }

    /// Connected account.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Connected chain.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Call the verifier from the connected account.
    pub async fn verify_proof(&self, artifact: &ProofArtifact) -> Result<bool, LedgerError> {
        call_verifier(
            &self.client,
            &self.verifier_address,
            Some(&self.account),
            artifact,
        )
        .await
    }
}
