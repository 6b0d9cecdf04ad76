//! # Issuance Counter
//!
//! Single serialization point for identifier allocation. Tracks the total
//! number of issued records, the owner reservation pool and per-caller mint
//! counts, and enforces every numeric cap.
//!
//! ## Invariants
//!
//! - `total_minted <= max_total_records`
//! - `reserved_count <= max_reserved_records`
//! - `reserved_count <= total_minted`
//! - per-caller counts never decrease
//!
//! `reserve_next_id` validates before mutating, so a rejected allocation
//! leaves the counter untouched.

use crate::domain::entities::{Allocation, AllocationKind};
use crate::domain::value_objects::Address;
use crate::errors::RegistryError;
use std::collections::HashMap;

/// Counters and caps for record issuance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuanceCounter {
    max_total_records: u64,
    max_reserved_records: u64,
    total_minted: u64,
    reserved_count: u64,
    per_caller: HashMap<Address, u32>,
}

impl IssuanceCounter {
    /// Creates a counter with the given caps and nothing issued.
    #[must_use]
    pub fn new(max_total_records: u64, max_reserved_records: u64) -> Self {
        Self {
            max_total_records,
            max_reserved_records,
            total_minted: 0,
            reserved_count: 0,
            per_caller: HashMap::new(),
        }
    }

    /// Allocates `count` consecutive identifiers.
    ///
    /// Reservation allocations also count against the reservation pool and
    /// are checked against it first.
    pub fn reserve_next_id(
        &mut self,
        count: u64,
        kind: AllocationKind,
    ) -> Result<Allocation, RegistryError> {
        if kind == AllocationKind::Reserve {
            self.check_reserve_capacity(count)?;
        }
        self.check_supply(count)?;

        let allocation = Allocation {
            first_id: self.total_minted + 1,
            count,
            kind,
        };
        self.total_minted += count;
        if kind == AllocationKind::Reserve {
            self.reserved_count += count;
        }
        Ok(allocation)
    }

    /// Records one more public mint by `caller`.
    pub fn note_mint(&mut self, caller: Address) {
        let minted = self.per_caller.entry(caller).or_insert(0);
        *minted = minted.saturating_add(1);
    }

    /// Fails if `count` more records would exceed the total supply.
    pub fn check_supply(&self, count: u64) -> Result<(), RegistryError> {
        match self.total_minted.checked_add(count) {
            Some(total) if total <= self.max_total_records => Ok(()),
            _ => Err(RegistryError::MaxSupplyExceeded {
                requested: count,
                minted: self.total_minted,
                max: self.max_total_records,
            }),
        }
    }

    /// Fails if `count` more reservations would exceed the reservation pool.
    pub fn check_reserve_capacity(&self, count: u64) -> Result<(), RegistryError> {
        match self.reserved_count.checked_add(count) {
            Some(total) if total <= self.max_reserved_records => Ok(()),
            _ => Err(RegistryError::ReserveCapExceeded {
                requested: count,
                reserved: self.reserved_count,
                max: self.max_reserved_records,
            }),
        }
    }

    /// Number of public mints by `caller`.
    #[must_use]
    pub fn mints_of(&self, caller: &Address) -> u32 {
        self.per_caller.get(caller).copied().unwrap_or(0)
    }

    /// Total records issued through either path.
    #[must_use]
    pub const fn total_minted(&self) -> u64 {
        self.total_minted
    }

    /// Records issued from the reservation pool.
    #[must_use]
    pub const fn reserved_count(&self) -> u64 {
        self.reserved_count
    }

    /// Total supply cap.
    #[must_use]
    pub const fn max_total_records(&self) -> u64 {
        self.max_total_records
    }

    /// Reservation pool cap.
    #[must_use]
    pub const fn max_reserved_records(&self) -> u64 {
        self.max_reserved_records
    }

    /// Returns true while the reservation pool has room.
    #[must_use]
    pub fn can_reserve(&self) -> bool {
        self.reserved_count < self.max_reserved_records
    }

    /// Returns true once every record has been issued.
    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.total_minted >= self.max_total_records
    }
}
