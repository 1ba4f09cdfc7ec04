//! RPC client for token nodes.
//!
//! This module provides a real implementation of `TokenClient` that talks to a
//! token node via JSON-RPC. Amounts travel as `0x`-prefixed hex quantities.

use super::traits::{TokenClient, TokenError};
use crate::address::Address;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// RPC client for a token node
pub struct RpcTokenClient {
    /// HTTP client
    client: Client,
    /// Token node RPC URL
    rpc_url: String,
    /// Custody account the escrow signs transfers as
    holder: Address,
}

impl RpcTokenClient {
    /// Create a new RPC client acting on behalf of `holder`
    pub fn new(rpc_url: impl Into<String>, holder: Address) -> Self {
        Self {
            client: Client::new(),
            rpc_url: rpc_url.into(),
            holder,
        }
    }

    /// Make a JSON-RPC call
    async fn call(&self, method: &str, params: Value) -> Result<Value, TokenError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": [params]
        });

        tracing::debug!(method, request = %request, "token rpc request");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TokenError::NetworkError(e.to_string()))?;

        let result: Value = response
            .json()
            .await
            .map_err(|e| TokenError::NetworkError(e.to_string()))?;

        tracing::debug!(method, response = %result, "token rpc response");

        if let Some(error) = result.get("error") {
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            return Err(TokenError::Rejected(msg.to_string()));
        }

        result
            .get("result")
            .cloned()
            .ok_or_else(|| TokenError::InvalidResponse("No result in response".to_string()))
    }
}

fn to_quantity(amount: u64) -> String {
    format!("0x{:x}", amount)
}

fn parse_quantity(value: &Value) -> Result<u64, TokenError> {
    let text = value
        .as_str()
        .ok_or_else(|| TokenError::InvalidResponse(format!("expected hex quantity, got {value}")))?;
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| TokenError::InvalidResponse(format!("missing 0x prefix: {text}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| TokenError::InvalidResponse(format!("bad quantity {text}: {e}")))
}

fn parse_success(value: &Value) -> Result<bool, TokenError> {
    value
        .as_bool()
        .ok_or_else(|| TokenError::InvalidResponse(format!("expected boolean, got {value}")))
}

#[async_trait]
impl TokenClient for RpcTokenClient {
    fn holder(&self) -> Address {
        self.holder
    }

    async fn balance_of(&self, account: &Address) -> Result<u64, TokenError> {
        let result = self
            .call("balance_of", json!({ "account": account }))
            .await?;
        parse_quantity(&result)
    }

    async fn transfer_from(
        &self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<bool, TokenError> {
        let params = json!({
            "spender": self.holder,
            "from": from,
            "to": to,
            "amount": to_quantity(amount),
        });
        let result = self.call("transfer_from", params).await?;
        parse_success(&result)
    }

    async fn transfer(&self, to: &Address, amount: u64) -> Result<bool, TokenError> {
        let params = json!({
            "from": self.holder,
            "to": to,
            "amount": to_quantity(amount),
        });
        let result = self.call("transfer", params).await?;
        parse_success(&result)
    }
}
