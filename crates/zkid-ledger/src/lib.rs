//! # zkid-ledger — Ledger Access
//!
//! Everything that talks to an Ethereum-compatible node:
//!
//! - [`rpc::JsonRpcClient`]: JSON-RPC 2.0 over HTTP with transport retry.
//! - [`abi`]: `verifyProof` calldata and `bool` return decoding.
//! - [`OnChainVerifier`]: the service's read-only verifier calls.
//! - [`WalletSession`]: verifier calls from a connected wallet account.
//!
//! Every failure is a [`LedgerError`]. Only
//! [`LedgerError::MalformedProof`] is a definitive rejection; everything
//! else means the ledger produced no verdict.

pub mod abi;
pub mod config;
pub mod error;
mod retry;
pub mod rpc;
pub mod verifier;
pub mod wallet;

pub use abi::{encode_verify_proof_call, VERIFY_PROOF_SELECTOR};
pub use config::{ConfigError, LedgerConfig};
pub use error::LedgerError;
pub use rpc::JsonRpcClient;
pub use verifier::OnChainVerifier;
pub use wallet::{WalletConfig, WalletSession};
