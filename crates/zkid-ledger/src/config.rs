//! Ledger connection configuration.
//!
//! Defaults target a local development chain (Hardhat/Anvil on
//! `127.0.0.1:8545`, chain ID 31337) with the verifier at the address the
//! first contract deployment from the default deployer account lands on.

use url::Url;

/// Default JSON-RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Default verifier contract address.
pub const DEFAULT_VERIFIER_ADDRESS: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

/// Default chain ID for wallet sessions.
pub const DEFAULT_CHAIN_ID: u64 = 31337;

/// Configuration for the service's own ledger connection.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: Url,
    /// Verifier contract address (0x-prefixed, 40 hex chars).
    pub verifier_address: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after the first attempt on transport failure.
    pub max_retries: u32,
}

impl LedgerConfig {
    /// Build a configuration, validating the address.
    ///
    /// Defaults: 10s timeout, 2 retries.
    pub fn new(rpc_url: Url, verifier_address: impl Into<String>) -> Result<Self, ConfigError> {
        let verifier_address = verifier_address.into();
        if !is_valid_eth_address(&verifier_address) {
            return Err(ConfigError::InvalidAddress(verifier_address));
        }
        Ok(Self {
            rpc_url,
            verifier_address,
            timeout_secs: 10,
            max_retries: 2,
        })
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the retry budget.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ZKID_RPC_URL` (default: `http://127.0.0.1:8545`)
    /// - `ZKID_VERIFIER_ADDRESS` (default: the local-chain deployment address)
    /// - `ZKID_RPC_TIMEOUT_SECS` (default: 10)
    /// - `ZKID_RPC_MAX_RETRIES` (default: 2)
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url = env_url("ZKID_RPC_URL", DEFAULT_RPC_URL)?;
        let address = std::env::var("ZKID_VERIFIER_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_VERIFIER_ADDRESS.to_string());
        Ok(Self::new(rpc_url, address)?
            .with_timeout(env_number("ZKID_RPC_TIMEOUT_SECS", 10)?)
            .with_retries(env_number("ZKID_RPC_MAX_RETRIES", 2)?))
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_number<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

/// Validate that a string is a well-formed Ethereum address (0x + 40 hex chars).
pub fn is_valid_eth_address(addr: &str) -> bool {
    addr.len() == 42
        && addr.starts_with("0x")
        && addr[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A URL variable does not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// The verifier address is malformed.
    #[error("invalid verifier address: {0}")]
    InvalidAddress(String),
    /// A numeric variable does not parse.
    #[error("invalid value for {0}: \"{1}\"")]
    InvalidNumber(String, String),
}
