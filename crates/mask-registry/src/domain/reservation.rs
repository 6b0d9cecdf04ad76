//! # Reservation Controller
//!
//! Owner-only batch issuance from the reservation pool. Reserved records
//! are free, skip the membership gate and share the identifier sequence with
//! public mints.

use crate::domain::entities::{Allocation, AllocationKind};
use crate::domain::registry::{Committed, RegistryState};
use crate::domain::value_objects::Address;
use crate::errors::RegistryError;

impl RegistryState {
    /// Issues `count` records to the owner.
    ///
    /// Checked in order: owner, non-empty batch, per-call ceiling, lifetime
    /// pool, total supply.
    pub fn reserve_to_owner(
        &mut self,
        caller: Address,
        count: u64,
    ) -> Result<Committed<Allocation>, RegistryError> {
        self.ensure_owner(caller)?;

        if count == 0 {
            return Err(RegistryError::EmptyBatch);
        }
        let max = self.config.max_batch_reserve;
        if count > max {
            return Err(RegistryError::BatchTooLarge {
                requested: count,
                max,
            });
        }

        let allocation = self.issuance.reserve_next_id(count, AllocationKind::Reserve)?;
        let events = self.issue(&allocation, self.owner);

        Ok(Committed::new(allocation, events))
    }

    /// Records issued from the reservation pool so far.
    #[must_use]
    pub fn reserved_tokens(&self) -> u64 {
        self.issuance.reserved_count()
    }

    /// Returns true while the reservation pool has room.
    #[must_use]
    pub fn can_reserve(&self) -> bool {
        self.issuance.can_reserve()
    }
}
