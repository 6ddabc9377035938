//! # Balance Sheet
//!
//! Records what the escrow engine has released to each account: hauler
//! payouts, fee collector cuts, poster refunds, tip refunds. Incoming funds
//! arrive attached to calls (the embedding layer's transfer primitive), so
//! the sheet is credit-only — it is the settlement surface the scenario
//! tests observe.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use haul_core::{AccountId, Amount, MarketError};

/// Per-account record of released funds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    accounts: BTreeMap<AccountId, Amount>,
    total_released: Amount,
}

impl BalanceSheet {
    /// An empty balance sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The balance released to an account so far (zero if never credited).
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.accounts.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Credit an account.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` on overflow; the sheet is unchanged.
    pub fn credit(&mut self, account: AccountId, amount: Amount) -> Result<(), MarketError> {
        let updated = self.balance_of(&account).checked_add(amount)?;
        let total = self.total_released.checked_add(amount)?;
        self.accounts.insert(account, updated);
        self.total_released = total;
        Ok(())
    }

    /// Credit several accounts atomically.
    ///
    /// Only the touched balances are staged; validation completes before
    /// the first write, so an overflow anywhere leaves the sheet
    /// untouched. Accounts may repeat.
    pub fn credit_all(&mut self, credits: &[(AccountId, Amount)]) -> Result<(), MarketError> {
        let mut staged: BTreeMap<AccountId, Amount> = BTreeMap::new();
        let mut total = self.total_released;
        for (account, amount) in credits {
            let current = match staged.get(account) {
                Some(balance) => *balance,
                None => self.balance_of(account),
            };
            staged.insert(*account, current.checked_add(*amount)?);
            total = total.checked_add(*amount)?;
        }
        self.accounts.extend(staged);
        self.total_released = total;
        Ok(())
    }

    /// Total released across all accounts.
    pub fn total_released(&self) -> Amount {
        self.total_released
    }
}
