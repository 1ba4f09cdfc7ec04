//! Mock token client for testing.

use super::traits::{TokenClient, TokenError};
use crate::address::Address;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// In-memory token ledger for testing
///
/// Clones share the same ledger, so a test can keep a handle to inspect
/// balances while the escrow holds another bound to the custody address.
#[derive(Clone)]
pub struct MockTokenClient {
    /// Account `transfer` moves funds out of
    holder: Address,
    /// Map of account -> token balance
    balances: Arc<Mutex<HashMap<Address, u64>>>,
    /// Accounts whose transfers are declined (returns `Ok(false)`)
    declined: Arc<Mutex<HashSet<Address>>>,
}

impl MockTokenClient {
    /// Create an empty ledger acting on behalf of `holder`
    pub fn new(holder: Address) -> Self {
        Self {
            holder,
            balances: Arc::new(Mutex::new(HashMap::new())),
            declined: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Create tokens out of thin air for `account`, returning its new balance
    pub fn mint(&self, account: Address, amount: u64) -> Result<u64, TokenError> {
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(account).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;
        Ok(*balance)
    }

    /// Get current balance of `account`
    pub fn balance(&self, account: &Address) -> u64 {
        self.balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    /// Decline every transfer touching `account` until `accept` is called
    pub fn decline(&self, account: Address) {
        self.declined.lock().unwrap().insert(account);
    }

    pub fn accept(&self, account: &Address) {
        self.declined.lock().unwrap().remove(account);
    }

    fn move_funds(&self, from: &Address, to: &Address, amount: u64) -> Result<bool, TokenError> {
        {
            let declined = self.declined.lock().unwrap();
            if declined.contains(from) || declined.contains(to) {
                return Ok(false);
            }
        }

        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        if from == to {
            return Ok(true);
        }
        let credited = balances
            .get(to)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        balances.insert(*from, available - amount);
        balances.insert(*to, credited);
        Ok(true)
    }
}

#[async_trait]
impl TokenClient for MockTokenClient {
    fn holder(&self) -> Address {
        self.holder
    }

    async fn balance_of(&self, account: &Address) -> Result<u64, TokenError> {
        Ok(self.balance(account))
    }

    async fn transfer_from(
        &self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<bool, TokenError> {
        self.move_funds(from, to, amount)
    }

    async fn transfer(&self, to: &Address, amount: u64) -> Result<bool, TokenError> {
        self.move_funds(&self.holder, to, amount)
    }
}
