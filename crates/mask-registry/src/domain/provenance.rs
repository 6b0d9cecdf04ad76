//! # Provenance Registry
//!
//! Holds the commitment hash over the full collection (images and their
//! order). The commitment is written at most once, and only while nothing
//! has been issued. The first issuance locks the registry even when no
//! commitment was ever written.
//!
//! ## State Machine
//!
//! ```text
//! [Empty] ──set_commitment──→ [Committed]
//!    │                            │
//!    └──lock_on_first_issuance──→ [Locked]   (terminal)
//! ```

use crate::domain::value_objects::Hash;
use crate::errors::RegistryError;
use sha2::{Digest, Sha256};

/// Write-once provenance commitment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProvenanceRegistry {
    hash: Option<Hash>,
    locked: bool,
}

impl ProvenanceRegistry {
    /// Creates an empty, unlocked registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `hash` as the commitment.
    ///
    /// Fails with `ProvenanceLocked` if a commitment already exists or
    /// anything has been issued (see [`Self::lock_on_first_issuance`]).
    pub fn set_commitment(&mut self, hash: Hash) -> Result<(), RegistryError> {
        if self.locked || self.hash.is_some() {
            return Err(RegistryError::ProvenanceLocked);
        }
        self.hash = Some(hash);
        Ok(())
    }

    /// Locks the commitment. Invoked from the issuance success path; returns
    /// true only on the call that actually performed the transition.
    pub fn lock_on_first_issuance(&mut self) -> bool {
        let first = !self.locked;
        self.locked = true;
        first
    }

    /// Current commitment, if any.
    #[must_use]
    pub fn commitment(&self) -> Option<Hash> {
        self.hash
    }

    /// Returns true once any record has been issued.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Computes a collection commitment: SHA-256 over the concatenation of each
/// item's hash in lowercase hex, in collection order.
#[must_use]
pub fn compute_provenance<'a, I>(item_hashes: I) -> Hash
where
    I: IntoIterator<Item = &'a Hash>,
{
    let mut hasher = Sha256::new();
    for item in item_hashes {
        hasher.update(item.to_hex().as_bytes());
    }
    Hash::new(hasher.finalize().into())
}
