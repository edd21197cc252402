//! # JSON-RPC Client
//!
//! Minimal Ethereum JSON-RPC 2.0 client over HTTP. Covers the read-only
//! methods proof verification needs: `eth_call`, `eth_chainId`,
//! `eth_accounts` and `eth_getCode`.

use std::time::Duration;

use serde_json::{json, Value};
use url::Url;

use crate::error::LedgerError;
use crate::retry::send_with_backoff;

/// JSON-RPC client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    endpoint: Url,
    max_retries: u32,
}

impl JsonRpcClient {
    /// Build a client with a per-request timeout and transport retry budget.
    pub fn new(endpoint: Url, timeout: Duration, max_retries: u32) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LedgerError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            endpoint,
            max_retries,
        })
    }

    /// The endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Invoke `method` and return its `result` value.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });
        let endpoint = self.endpoint.to_string();

        let resp = send_with_backoff(method, self.max_retries, || {
            self.http.post(self.endpoint.clone()).json(&body).send()
        })
        .await
        .map_err(|source| {
            if source.is_timeout() {
                LedgerError::Timeout {
                    endpoint: endpoint.clone(),
                }
            } else {
                LedgerError::Transport {
                    endpoint: endpoint.clone(),
                    source,
                }
            }
        })?;

        if !resp.status().is_success() {
            return Err(LedgerError::HttpStatus {
                endpoint,
                status: resp.status().as_u16(),
            });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(format!("{method}: invalid JSON: {e}")))?;

        if let Some(error) = json.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error")
                .to_string();
            return Err(LedgerError::Rpc { code, message });
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| LedgerError::InvalidResponse(format!("{method}: missing 'result'")))
    }

    /// `eth_call` against the latest block. Returns the hex return data.
    pub async fn eth_call(
        &self,
        to: &str,
        from: Option<&str>,
        data: &str,
    ) -> Result<String, LedgerError> {
        let mut tx = json!({ "to": to, "data": data });
        if let Some(from) = from {
            tx["from"] = Value::String(from.to_string());
        }
        let result = self.call("eth_call", json!([tx, "latest"])).await?;
        expect_string("eth_call", result)
    }

    /// `eth_chainId` as an integer.
    pub async fn chain_id(&self) -> Result<u64, LedgerError> {
        let result = expect_string("eth_chainId", self.call("eth_chainId", json!([])).await?)?;
        parse_quantity(&result)
    }

    /// `eth_accounts`.
    pub async fn accounts(&self) -> Result<Vec<String>, LedgerError> {
        let result = self.call("eth_accounts", json!([])).await?;
        serde_json::from_value(result)
            .map_err(|e| LedgerError::InvalidResponse(format!("eth_accounts: {e}")))
    }

    /// `eth_getCode` at the latest block.
    pub async fn get_code(&self, address: &str) -> Result<String, LedgerError> {
        let result = self
            .call("eth_getCode", json!([address, "latest"]))
            .await?;
        expect_string("eth_getCode", result)
    }
}

fn expect_string(method: &str, value: Value) -> Result<String, LedgerError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(LedgerError::InvalidResponse(format!(
            "{method}: expected hex string, got {other}"
        ))),
    }
}

/// Parse a JSON-RPC hex quantity such as `"0x7a69"`.
pub fn parse_quantity(s: &str) -> Result<u64, LedgerError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| LedgerError::InvalidResponse(format!("quantity without 0x: {s}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|_| LedgerError::InvalidResponse(format!("invalid quantity: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quantities() {
        assert_eq!(parse_quantity("0x7a69").unwrap(), 31337);
        assert_eq!(parse_quantity("0x1").unwrap(), 1);
        assert!(parse_quantity("7a69").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn expect_string_rejects_objects() {
        assert!(expect_string("eth_call", json!({})).is_err());
        assert_eq!(expect_string("eth_call", json!("0x")).unwrap(), "0x");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_execution_failure() {
        let client = JsonRpcClient::new(
            Url::parse("http://127.0.0.1:1").unwrap(),
            Duration::from_millis(100),
            0,
        )
        .unwrap();
        let err = client.chain_id().await.unwrap_err();
        assert!(err.is_execution_failure(), "{err}");
    }
}
