//! # Membership Ledger Adapter
//!
//! In-memory fungible token ledger standing in for the membership token.
//! Supports balance seeding, transfers and simulated outages.

use crate::domain::value_objects::{Address, U256};
use crate::errors::OracleError;
use crate::ports::outbound::BalanceOracle;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// In-memory membership token ledger.
#[derive(Debug, Default)]
pub struct InMemoryMembershipLedger {
    balances: RwLock<HashMap<Address, U256>>,
    outage: RwLock<Option<OracleError>>,
}

impl InMemoryMembershipLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger where `holder` owns the whole initial supply.
    #[must_use]
    pub fn with_supply(holder: Address, supply: U256) -> Self {
        let ledger = Self::new();
        ledger.set_balance(holder, supply);
        ledger
    }

    /// Overwrite the balance of `holder`.
    pub fn set_balance(&self, holder: Address, balance: U256) {
        self.balances.write().insert(holder, balance);
    }

    /// Move `amount` from `from` to `to`.
    pub fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), OracleError> {
        let mut balances = self.balances.write();
        let available = balances.get(&from).copied().unwrap_or_default();
        if available < amount {
            return Err(OracleError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        balances.insert(from, available - amount);
        let credited = balances.entry(to).or_default();
        *credited = credited.saturating_add(amount);
        debug!(%from, %to, %amount, "membership tokens transferred");
        Ok(())
    }

    /// Make every subsequent read fail with `error` until `restore` is called.
    pub fn fail_with(&self, error: OracleError) {
        *self.outage.write() = Some(error);
    }

    /// End a simulated outage.
    pub fn restore(&self) {
        *self.outage.write() = None;
    }
}

#[async_trait]
impl BalanceOracle for InMemoryMembershipLedger {
    async fn balance_of(&self, holder: Address) -> Result<U256, OracleError> {
        if let Some(error) = self.outage.read().clone() {
            return Err(error);
        }
        Ok(self.balances.read().get(&holder).copied().unwrap_or_default())
    }
}
