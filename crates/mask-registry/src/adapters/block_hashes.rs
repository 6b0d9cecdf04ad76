//! # Block Hash Adapter
//!
//! In-memory block hash table with the 256-block visibility window.

use crate::domain::starting_index::BLOCKHASH_WINDOW;
use crate::domain::value_objects::Hash;
use crate::ports::outbound::BlockHashOracle;
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// In-memory block hashes.
///
/// Explicitly inserted hashes win; otherwise, when synthesis is enabled, a
/// deterministic hash is derived from the block number.
#[derive(Debug, Default)]
pub struct InMemoryBlockHashes {
    hashes: RwLock<HashMap<u64, Hash>>,
    synthesize: bool,
}

impl InMemoryBlockHashes {
    /// Create a table that only knows inserted hashes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table that answers for every block in the window.
    #[must_use]
    pub fn deterministic() -> Self {
        Self {
            hashes: RwLock::new(HashMap::new()),
            synthesize: true,
        }
    }

    /// Set the hash of block `number`.
    pub fn insert(&self, number: u64, hash: Hash) {
        self.hashes.write().insert(number, hash);
    }
}

/// Deterministic hash for a block number.
fn synthetic_block_hash(number: u64) -> Hash {
    let digest = Sha256::digest(number.to_le_bytes());
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    Hash::new(hash)
}

#[async_trait]
impl BlockHashOracle for InMemoryBlockHashes {
    async fn get_block_hash(&self, number: u64, current_number: u64) -> Option<Hash> {
        if number >= current_number || current_number - number > BLOCKHASH_WINDOW {
            return None;
        }
        if let Some(hash) = self.hashes.read().get(&number) {
            return Some(*hash);
        }
        self.synthesize.then(|| synthetic_block_hash(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_window_bounds() {
        let oracle = InMemoryBlockHashes::deterministic();
        assert!(oracle.get_block_hash(100, 100).await.is_none());
        assert!(oracle.get_block_hash(101, 100).await.is_none());
        assert!(oracle.get_block_hash(99, 100).await.is_some());
        assert!(oracle.get_block_hash(44, 300).await.is_some());
        assert!(oracle.get_block_hash(43, 300).await.is_none());
    }

    #[tokio::test]
    async fn test_inserted_hash_wins() {
        let oracle = InMemoryBlockHashes::deterministic();
        let hash = Hash::new([7u8; 32]);
        oracle.insert(5, hash);
        assert_eq!(oracle.get_block_hash(5, 10).await, Some(hash));
        assert_ne!(oracle.get_block_hash(6, 10).await, Some(hash));
    }

    #[tokio::test]
    async fn test_unknown_block_without_synthesis() {
        let oracle = InMemoryBlockHashes::new();
        assert!(oracle.get_block_hash(5, 10).await.is_none());
    }
}
