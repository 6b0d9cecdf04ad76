//! # Starting Index
//!
//! Offset applied to the committed collection order when records are
//! revealed. The offset comes from a block hash that nobody knows while the
//! sale is running:
//!
//! 1. The first mint after the reveal timestamp (or the mint that sells out)
//!    records the current block number.
//! 2. Anyone may then derive `starting_index = blockhash(recorded) mod supply`.
//!
//! Only the last 256 block hashes are retrievable, so a recorded block that
//! has fallen out of that window is replaced by the previous block.

use crate::domain::value_objects::{Hash, U256};
use crate::errors::RegistryError;

/// Number of recent block hashes the ledger keeps available.
pub const BLOCKHASH_WINDOW: u64 = 256;

/// Starting-index derivation state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StartingIndex {
    block: Option<u64>,
    index: Option<u64>,
}

impl StartingIndex {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a mint at `timestamp` should record its block.
    #[must_use]
    pub fn should_record(&self, sold_out: bool, timestamp: u64, reveal_timestamp: u64) -> bool {
        self.block.is_none() && (sold_out || timestamp >= reveal_timestamp)
    }

    /// Records `number` if nothing is recorded yet. Returns true if recorded.
    pub fn record_block(&mut self, number: u64) -> bool {
        if self.block.is_some() {
            return false;
        }
        self.block = Some(number);
        true
    }

    /// Block whose hash seeds the index when deriving at `current_block`.
    pub fn source_block(&self, current_block: u64) -> Result<u64, RegistryError> {
        if self.index.is_some() {
            return Err(RegistryError::StartingIndexAlreadySet);
        }
        let recorded = self.block.ok_or(RegistryError::StartingIndexBlockNotSet)?;

        if current_block.saturating_sub(recorded) >= BLOCKHASH_WINDOW {
            Ok(current_block.saturating_sub(1))
        } else {
            Ok(recorded)
        }
    }

    /// Derives and stores the index from `block_hash`.
    pub fn finalize(&mut self, block_hash: Hash, max_supply: u64) -> Result<u64, RegistryError> {
        if self.index.is_some() {
            return Err(RegistryError::StartingIndexAlreadySet);
        }
        if self.block.is_none() {
            return Err(RegistryError::StartingIndexBlockNotSet);
        }
        let index = derive_starting_index(&block_hash, max_supply);
        self.index = Some(index);
        Ok(index)
    }

    /// Recorded block, if any.
    #[must_use]
    pub fn block(&self) -> Option<u64> {
        self.block
    }

    /// Derived index, if any.
    #[must_use]
    pub fn index(&self) -> Option<u64> {
        self.index
    }
}

/// `hash mod max_supply`, with zero bumped to one.
#[must_use]
pub fn derive_starting_index(block_hash: &Hash, max_supply: u64) -> u64 {
    if max_supply == 0 {
        return 1;
    }
    let index = (block_hash.to_u256() % U256::from(max_supply)).low_u64();
    if index == 0 {
        1
    } else {
        index
    }
}
