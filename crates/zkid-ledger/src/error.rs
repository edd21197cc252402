//! Error types for ledger access.

use zkid_core::ErrorClass;

/// Errors from JSON-RPC calls and verifier-contract interaction.
///
/// Everything except [`LedgerError::MalformedProof`] means the call did not
/// produce a verdict. `MalformedProof` means the proof could not even be
/// encoded as calldata, which is a definitive rejection.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The request never produced an HTTP response.
    #[error("RPC request to {endpoint} failed: {source}")]
    Transport {
        /// RPC endpoint.
        endpoint: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out.
    #[error("RPC request to {endpoint} timed out")]
    Timeout {
        /// RPC endpoint.
        endpoint: String,
    },

    /// The node answered with a non-success HTTP status.
    #[error("RPC endpoint {endpoint} returned HTTP {status}")]
    HttpStatus {
        /// RPC endpoint.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The node returned a JSON-RPC error object (including reverts).
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// The response body was not what the method promises.
    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),

    /// `eth_call` returned no data: nothing is deployed at the address.
    #[error("no contract deployed at {address}")]
    NoContract {
        /// Verifier address.
        address: String,
    },

    /// The wallet is connected to a different chain than expected.
    #[error("wallet is on chain {actual}, expected {expected}")]
    ChainMismatch {
        /// Expected chain ID.
        expected: u64,
        /// Chain ID reported by the node.
        actual: u64,
    },

    /// The wallet exposes no account to call from.
    #[error("wallet exposes no accounts")]
    NotConnected,

    /// Not a 0x-prefixed 20-byte hex address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The proof cannot be encoded as verifier calldata.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
}

impl LedgerError {
    /// Whether this error means "no verdict" rather than "invalid".
    pub fn is_execution_failure(&self) -> bool {
        !matches!(self, Self::MalformedProof(_))
    }

    /// Error taxonomy class.
    pub fn class(&self) -> ErrorClass {
        if self.is_execution_failure() {
            ErrorClass::VerificationExecution
        } else {
            ErrorClass::Parse
        }
    }
}
