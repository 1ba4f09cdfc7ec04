//! Token client trait definition.

use crate::address::Address;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from token operations
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Insufficient token balance: available {available}, requested {requested}")]
    InsufficientBalance { available: u64, requested: u64 },

    #[error("Transfer rejected: {0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token balance overflow")]
    Overflow,
}

/// Trait for the fungible-token ledger the escrow takes custody through
///
/// Mirrors the ERC20 surface the escrow relies on. Implementations can be:
/// - MockTokenClient for testing
/// - RpcTokenClient for a token node reachable over JSON-RPC
///
/// `Ok(false)` from a transfer means the ledger declined it without error;
/// callers must treat it as a failed transfer.
#[async_trait]
pub trait TokenClient: Send + Sync {
    /// Account on whose behalf `transfer` moves funds (the escrow custody)
    fn holder(&self) -> Address;

    /// Token balance of `account`
    async fn balance_of(&self, account: &Address) -> Result<u64, TokenError>;

    /// Move `amount` from `from` to `to`
    async fn transfer_from(
        &self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<bool, TokenError>;

    /// Move `amount` from the holder to `to`
    async fn transfer(&self, to: &Address, amount: u64) -> Result<bool, TokenError>;
}
