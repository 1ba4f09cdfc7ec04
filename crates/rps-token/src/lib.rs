//! RPS Token Library
//!
//! Shared primitives for talking to the value-transfer ledger that backs the
//! escrow:
//! - Account addresses
//! - TokenClient trait, MockTokenClient and RpcTokenClient

pub mod address;
pub mod token;

pub use address::{Address, AddressParseError};
pub use token::{MockTokenClient, RpcTokenClient, TokenClient, TokenError};
