//! # Service Configuration
//!
//! Read once at startup from the environment. Any variable that is set but
//! does not parse stops the service before it binds.
//!
//! | Variable                       | Default     |
//! |--------------------------------|-------------|
//! | `PORT`                         | `3001`      |
//! | `ZKID_KEYS_DIR`                | `./keys`    |
//! | `ZKID_HASH_SCHEME`             | `poseidon`  |
//! | `ZKID_PROOF_TIMEOUT_SECS`      | `120`       |
//! | `ZKID_MAX_GENERATION_ATTEMPTS` | `1`         |
//! | `ZKID_LOG_FORMAT`              | `text`      |
//!
//! Ledger variables (`ZKID_RPC_*`, `ZKID_VERIFIER_ADDRESS`) are read by
//! [`LedgerConfig::from_env`].

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use zkid_crypto::HashScheme;
use zkid_ledger::LedgerConfig;
use zkid_lifecycle::{CoordinatorConfig, RetryPolicy};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Log output format for the binaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format \"{other}\"")),
        }
    }
}

/// Startup configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable is set to something unusable.
    #[error("invalid value for {var}: \"{value}\"")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// Ledger configuration is invalid.
    #[error(transparent)]
    Ledger(#[from] zkid_ledger::ConfigError),
}

/// Everything the service reads at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Directory holding `identity.pk` and `identity.vk`.
    pub keys_dir: PathBuf,
    /// String-attribute hash scheme.
    pub hash_scheme: HashScheme,
    /// Per-attempt proving deadline.
    pub proof_timeout_secs: u64,
    /// Proving attempts per issuance.
    pub max_generation_attempts: u32,
    /// Log output format.
    pub log_format: LogFormat,
    /// The service's own ledger connection.
    pub ledger: LedgerConfig,
}

impl ServiceConfig {
    /// Load from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT)?,
            keys_dir: std::env::var("ZKID_KEYS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./keys")),
            hash_scheme: env_parse("ZKID_HASH_SCHEME", HashScheme::Poseidon)?,
            proof_timeout_secs: env_parse("ZKID_PROOF_TIMEOUT_SECS", 120)?,
            max_generation_attempts: env_parse("ZKID_MAX_GENERATION_ATTEMPTS", 1)?,
            log_format: env_parse("ZKID_LOG_FORMAT", LogFormat::Text)?,
            ledger: LedgerConfig::from_env()?,
        })
    }

    /// Coordinator tuning derived from this configuration.
    pub fn coordinator(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            proof_timeout: Duration::from_secs(self.proof_timeout_secs),
            retry: RetryPolicy {
                max_generation_attempts: self.max_generation_attempts,
            },
            hash_scheme: self.hash_scheme,
        }
    }
}

fn env_parse<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => parse_value(var, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Text ".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert_eq!(err.to_string(), "invalid value for PORT: \"eighty\"");
        let err = parse_value::<HashScheme>("ZKID_HASH_SCHEME", "md5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "ZKID_HASH_SCHEME", .. }));
    }

    #[test]
    fn coordinator_config_carries_settings() {
        let config = ServiceConfig {
            port: DEFAULT_PORT,
            keys_dir: PathBuf::from("./keys"),
            hash_scheme: HashScheme::Sha256Reduced,
            proof_timeout_secs: 30,
            max_generation_attempts: 3,
            log_format: LogFormat::Text,
            ledger: LedgerConfig::new(
                zkid_ledger::config::DEFAULT_RPC_URL.parse().unwrap(),
                zkid_ledger::config::DEFAULT_VERIFIER_ADDRESS,
            )
            .unwrap(),
        };
        let c = config.coordinator();
        assert_eq!(c.proof_timeout, Duration::from_secs(30));
        assert_eq!(c.retry.max_generation_attempts, 3);
        assert_eq!(c.hash_scheme, HashScheme::Sha256Reduced);
    }
}
