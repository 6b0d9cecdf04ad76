//! # Mint Controller
//!
//! Public, membership-gated minting of one record per call.
//!
//! ## Check Order
//!
//! | Step | Check | Error |
//! |------|-------|-------|
//! | 1 | Payment equals price | `InsufficientPayment` / `ExcessPayment` |
//! | 2 | Membership balance meets threshold | `NotEligible` |
//! | 3 | Caller below per-caller cap | `MintLimitExceeded` |
//! | 4 | Supply left | `MaxSupplyExceeded` |
//!
//! The intermediary check and the balance lookup happen before this, in the
//! service, because they need the outbound ports.

use crate::domain::entities::{AllocationKind, CallContext};
use crate::domain::registry::{Committed, RegistryState};
use crate::domain::value_objects::{TokenId, U256};
use crate::errors::RegistryError;

impl RegistryState {
    /// Fails unless `paid` equals the mint price exactly.
    pub fn check_payment(&self, paid: U256) -> Result<(), RegistryError> {
        let price = self.config.mint_price;
        if paid < price {
            return Err(RegistryError::InsufficientPayment { paid, price });
        }
        if paid > price {
            return Err(RegistryError::ExcessPayment { paid, price });
        }
        Ok(())
    }

    /// Returns true if `balance` meets the membership threshold.
    #[must_use]
    pub fn is_eligible(&self, balance: U256) -> bool {
        self.gate.admits(balance)
    }

    /// Mints one record to `ctx.caller`, whose membership balance is
    /// `member_balance`.
    ///
    /// On success the payment moves to the treasury and, when due, the
    /// starting-index block is recorded.
    pub fn mint(
        &mut self,
        ctx: &CallContext,
        member_balance: U256,
    ) -> Result<Committed<TokenId>, RegistryError> {
        let caller = ctx.caller;

        self.check_payment(ctx.value)?;

        if !self.gate.admits(member_balance) {
            return Err(RegistryError::NotEligible {
                caller,
                balance: member_balance,
                threshold: self.gate.threshold(),
            });
        }

        let minted = self.issuance.mints_of(&caller);
        let cap = self.config.per_caller_cap;
        if minted >= cap {
            return Err(RegistryError::MintLimitExceeded {
                caller,
                minted,
                cap,
            });
        }

        // Last fallible step: everything after this commits.
        let allocation = self.issuance.reserve_next_id(1, AllocationKind::Mint)?;

        let mut events = self.issue(&allocation, caller);
        self.issuance.note_mint(caller);
        self.treasury = self.treasury.saturating_add(ctx.value);
        events.extend(self.maybe_record_starting_block(&ctx.block));

        Ok(Committed::new(allocation.first_id, events))
    }
}
