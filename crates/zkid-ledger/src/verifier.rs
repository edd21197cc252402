//! # On-Chain Verifier
//!
//! Read-only `verifyProof` calls against the deployed verifier contract.
//! No transaction is sent and no gas is spent.

use std::time::Duration;

use zkid_core::ProofArtifact;

use crate::abi::{decode_bool, VerifyProofCall};
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::rpc::JsonRpcClient;

/// Client for the deployed Groth16 verifier.
#[derive(Debug, Clone)]
pub struct OnChainVerifier {
    client: JsonRpcClient,
    address: String,
}

impl OnChainVerifier {
    /// Connect using the service configuration.
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let client = JsonRpcClient::new(
            config.rpc_url.clone(),
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )?;
        Ok(Self {
            client,
            address: config.verifier_address.clone(),
        })
    }

    /// Verifier contract address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Ask the contract whether `artifact` verifies.
    pub async fn verify_proof(&self, artifact: &ProofArtifact) -> Result<bool, LedgerError> {
        call_verifier(&self.client, &self.address, None, artifact).await
    }

    /// Whether any code is deployed at the verifier address.
    pub async fn contract_deployed(&self) -> Result<bool, LedgerError> {
        let code = self.client.get_code(&self.address).await?;
        Ok(code != "0x" && !code.is_empty())
    }
}

/// Encode, `eth_call`, and decode one verification.
pub(crate) async fn call_verifier(
    client: &JsonRpcClient,
    address: &str,
    from: Option<&str>,
    artifact: &ProofArtifact,
) -> Result<bool, LedgerError> {
    let data = VerifyProofCall::from_artifact(artifact)?.encode();
    let result = client.eth_call(address, from, &data).await?;
    if result == "0x" || result.is_empty() {
        return Err(LedgerError::NoContract {
            address: address.to_string(),
        });
    }
    let valid = decode_bool(&result)?;
    tracing::debug!(address, valid, "verifier contract answered");
    Ok(valid)
}
