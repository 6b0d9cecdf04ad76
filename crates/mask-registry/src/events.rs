//! # Event Schema
//!
//! Events emitted by successful registry calls. Rejected calls emit nothing.
//!
//! | Event | Emitted by |
//! |-------|------------|
//! | `Transfer` | `mint_mask`, `reserve_tokens_to_owner` (one per record) |
//! | `ProvenanceSet` | `set_provenance_hash` |
//! | `BaseUriSet` | `set_base_uri` (first reveal only) |
//! | `StartingIndexBlockSet` | `mint_mask`, `emergency_set_starting_index_block` |
//! | `StartingIndexSet` | `set_starting_index` |
//! | `Withdrawal` | `withdraw` |
//! | `OwnershipTransferred` | `transfer_ownership` |

use crate::domain::value_objects::{Address, Hash, TokenId, U256};
use serde::{Deserialize, Serialize};

/// Event topics.
pub mod topics {
    /// Record created.
    pub const TRANSFER: &str = "masks.transfer";
    /// Provenance commitment written.
    pub const PROVENANCE_SET: &str = "masks.provenance_set";
    /// Metadata revealed.
    pub const BASE_URI_SET: &str = "masks.base_uri_set";
    /// Starting-index block recorded.
    pub const STARTING_INDEX_BLOCK_SET: &str = "masks.starting_index_block_set";
    /// Starting index derived.
    pub const STARTING_INDEX_SET: &str = "masks.starting_index_set";
    /// Treasury paid out.
    pub const WITHDRAWAL: &str = "masks.withdrawal";
    /// Ownership changed.
    pub const OWNERSHIP_TRANSFERRED: &str = "masks.ownership_transferred";
}

/// A registry state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// A record was created. `from` is always the zero address.
    Transfer {
        /// Always `Address::ZERO` (creation).
        from: Address,
        /// Holder of the new record.
        to: Address,
        /// Identifier of the new record.
        token_id: TokenId,
    },
    /// The provenance commitment was written.
    ProvenanceSet {
        /// New commitment.
        hash: Hash,
    },
    /// Metadata was revealed.
    BaseUriSet {
        /// Base URI records now resolve under.
        base_uri: String,
    },
    /// A block was recorded to seed the starting index.
    StartingIndexBlockSet {
        /// Recorded block number.
        block_number: u64,
    },
    /// The starting index was derived.
    StartingIndexSet {
        /// Derived index.
        starting_index: u64,
    },
    /// Treasury paid out to the owner.
    Withdrawal {
        /// Recipient.
        to: Address,
        /// Amount paid out.
        amount: U256,
    },
    /// Registry ownership changed.
    OwnershipTransferred {
        /// Previous owner.
        previous: Address,
        /// New owner.
        new: Address,
    },
}

impl RegistryEvent {
    /// Creation event for record `token_id` held by `to`.
    #[must_use]
    pub fn minted(to: Address, token_id: TokenId) -> Self {
        Self::Transfer {
            from: Address::ZERO,
            to,
            token_id,
        }
    }

    /// Topic this event is published under.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => topics::TRANSFER,
            Self::ProvenanceSet { .. } => topics::PROVENANCE_SET,
            Self::BaseUriSet { .. } => topics::BASE_URI_SET,
            Self::StartingIndexBlockSet { .. } => topics::STARTING_INDEX_BLOCK_SET,
            Self::StartingIndexSet { .. } => topics::STARTING_INDEX_SET,
            Self::Withdrawal { .. } => topics::WITHDRAWAL,
            Self::OwnershipTransferred { .. } => topics::OWNERSHIP_TRANSFERRED,
        }
    }

    /// Identifier of the created record, for `Transfer` events.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            Self::Transfer { token_id, .. } => Some(*token_id),
            _ => None,
        }
    }
}
