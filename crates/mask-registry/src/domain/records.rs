//! # Record Book
//!
//! Append-only store of issued records. Record `id` lives at index `id - 1`.

use crate::domain::entities::{Allocation, AllocationKind, Record};
use crate::domain::value_objects::{Address, TokenId};
use crate::errors::RegistryError;
use std::collections::HashMap;

/// Issued records and per-holder counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordBook {
    records: Vec<Record>,
    holdings: HashMap<Address, u64>,
}

impl RecordBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record per identifier in `allocation`, all held by `owner`.
    ///
    /// The allocation must continue the book exactly; the issuance counter
    /// guarantees this.
    pub fn issue(&mut self, allocation: &Allocation, owner: Address) -> Vec<Record> {
        debug_assert_eq!(allocation.first_id, self.next_id());

        let reserved = allocation.kind == AllocationKind::Reserve;
        let issued: Vec<Record> = allocation
            .ids()
            .map(|id| Record {
                id,
                owner,
                reserved,
            })
            .collect();

        self.records.extend_from_slice(&issued);
        *self.holdings.entry(owner).or_insert(0) += allocation.count;
        issued
    }

    /// Looks up a record.
    #[must_use]
    pub fn get(&self, id: TokenId) -> Option<&Record> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.records.get(index)
    }

    /// Returns true if `id` has been issued.
    #[must_use]
    pub fn exists(&self, id: TokenId) -> bool {
        self.get(id).is_some()
    }

    /// Holder of record `id`.
    pub fn owner_of(&self, id: TokenId) -> Result<Address, RegistryError> {
        self.get(id)
            .map(|record| record.owner)
            .ok_or(RegistryError::NonexistentRecord(id))
    }

    /// Number of records held by `holder`.
    #[must_use]
    pub fn balance_of(&self, holder: &Address) -> u64 {
        self.holdings.get(holder).copied().unwrap_or(0)
    }

    /// Number of issued records.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.records.len() as u64
    }

    /// Returns true if nothing has been issued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifier the next issued record will get.
    #[must_use]
    pub fn next_id(&self) -> TokenId {
        self.len() + 1
    }

    /// Iterates records in issuance order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}
