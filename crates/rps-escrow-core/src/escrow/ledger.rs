//! Free balances held in custody for each account.

use crate::error::EscrowError;
use rps_token::{Address, TokenClient};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};

type AccountLocks = Mutex<HashMap<Address, Arc<tokio::sync::Mutex<()>>>>;

/// Per-account free balances backed by tokens in the custody account.
///
/// `balances` is always the innermost lock: it is never held across an
/// `.await` or while acquiring another lock.
pub struct BalanceLedger {
    token: Arc<dyn TokenClient>,
    balances: Mutex<HashMap<Address, u64>>,
    /// Serializes deposit/withdraw per account across the external transfer
    account_locks: AccountLocks,
    /// Timeout remainders paid to nobody; they stay in custody
    burned: Mutex<u64>,
}

impl BalanceLedger {
    pub fn new(token: Arc<dyn TokenClient>) -> Self {
        Self {
            token,
            balances: Mutex::new(HashMap::new()),
            account_locks: Mutex::new(HashMap::new()),
            burned: Mutex::new(0),
        }
    }

    /// Account holding every deposited token
    pub fn custody(&self) -> Address {
        self.token.holder()
    }

    pub fn balance_of(&self, account: &Address) -> u64 {
        self.balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all free balances
    pub fn total_free(&self) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .values()
            .map(|&balance| u128::from(balance))
            .sum()
    }

    pub fn burned(&self) -> u64 {
        *self.burned.lock().unwrap()
    }

    async fn lock_account(&self, account: Address) -> AccountGuard<'_> {
        let lock = {
            let mut locks = self.account_locks.lock().unwrap();
            Arc::clone(locks.entry(account).or_default())
        };
        AccountGuard {
            locks: &self.account_locks,
            account,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Pull `amount` tokens from `account` into custody and credit them.
    /// Returns the new free balance.
    pub async fn deposit(&self, account: Address, amount: u64) -> Result<u64, EscrowError> {
        let _guard = self.lock_account(account).await;

        let available = self.token.balance_of(&account).await?;
        if available < amount {
            warn!(%account, available, amount, "deposit rejected");
            return Err(EscrowError::InsufficientExternalFunds {
                account,
                available,
                requested: amount,
            });
        }

        let custody = self.custody();
        if !self.token.transfer_from(&account, &custody, amount).await? {
            warn!(%account, amount, "deposit transfer declined");
            return Err(EscrowError::TransferDeclined);
        }

        // Tokens are in custody now; only a u64 overflow can stop the credit.
        if let Err(e) = self.pay_out(&[(account, amount)]) {
            warn!(%account, amount, error = %e, "deposit credit failed, returning tokens");
            if !self.token.transfer(&account, amount).await? {
                return Err(EscrowError::TransferDeclined);
            }
            return Err(e);
        }
        let balance = self.balance_of(&account);
        info!(%account, amount, balance, "deposit");
        Ok(balance)
    }

    /// Debit `amount` from the free balance, then send it to `account`.
    /// The debit is restored if the transfer fails. Returns the new free
    /// balance.
    pub async fn withdraw(&self, account: Address, amount: u64) -> Result<u64, EscrowError> {
        let _guard = self.lock_account(account).await;

        self.lock_stake(account, amount)?;

        let sent = match self.token.transfer(&account, amount).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(EscrowError::TransferDeclined),
            Err(e) => Err(EscrowError::Token(e)),
        };

        if let Err(e) = sent {
            warn!(%account, amount, error = %e, "withdraw transfer failed, restoring balance");
            self.pay_out(&[(account, amount)])?;
            return Err(e);
        }

        let balance = self.balance_of(&account);
        info!(%account, amount, balance, "withdraw");
        Ok(balance)
    }

    /// Atomically check and debit `amount` from a free balance
    pub(crate) fn lock_stake(&self, account: Address, amount: u64) -> Result<(), EscrowError> {
        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(&account).copied().unwrap_or(0);
        if available < amount {
            return Err(EscrowError::InsufficientFreeBalance {
                account,
                available,
                requested: amount,
            });
        }
        balances.insert(account, available - amount);
        Ok(())
    }

    /// Credit every `(account, amount)` pair, or none of them
    pub(crate) fn pay_out(&self, credits: &[(Address, u64)]) -> Result<(), EscrowError> {
        let mut balances = self.balances.lock().unwrap();

        let mut updated: HashMap<Address, u64> = HashMap::new();
        for (account, amount) in credits {
            let current = updated
                .get(account)
                .copied()
                .unwrap_or_else(|| balances.get(account).copied().unwrap_or(0));
            let next = current
                .checked_add(*amount)
                .ok_or(EscrowError::BalanceOverflow)?;
            updated.insert(*account, next);
        }

        balances.extend(updated);
        Ok(())
    }

    pub(crate) fn burn(&self, amount: u64) {
        let mut burned = self.burned.lock().unwrap();
        *burned = burned.saturating_add(amount);
    }
}

/// Held for the duration of a deposit or withdrawal. On release the account's
/// lock entry is dropped unless another call is already waiting on it.
struct AccountGuard<'a> {
    locks: &'a AccountLocks,
    account: Address,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for AccountGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap();
        if locks
            .get(&self.account)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.account);
        }
    }
}
