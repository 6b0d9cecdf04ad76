//! # Core Domain Entities
//!
//! Call context, issued records and identifier allocations.

use crate::domain::value_objects::{Address, TokenId, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// BLOCK CONTEXT
// =============================================================================

/// Block the current call executes in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Block number.
    pub number: u64,
    /// Block timestamp (unix seconds).
    pub timestamp: u64,
}

impl BlockContext {
    /// Creates a block context.
    #[must_use]
    pub const fn new(number: u64, timestamp: u64) -> Self {
        Self { number, timestamp }
    }
}

// =============================================================================
// CALL CONTEXT
// =============================================================================

/// Context of an external call into the registry.
///
/// `origin` is the account that signed the transaction; `caller` is the
/// immediate sender. They differ when a contract forwards the call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Immediate sender of the call.
    pub caller: Address,
    /// Account that originated the transaction.
    pub origin: Address,
    /// Native payment attached to the call.
    pub value: U256,
    /// Block the call executes in.
    pub block: BlockContext,
}

impl CallContext {
    /// A call sent directly by an externally owned account.
    #[must_use]
    pub fn direct(caller: Address, value: U256, block: BlockContext) -> Self {
        Self {
            caller,
            origin: caller,
            value,
            block,
        }
    }

    /// A call originated by `origin` and forwarded through the contract `via`.
    #[must_use]
    pub fn forwarded(origin: Address, via: Address, value: U256, block: BlockContext) -> Self {
        Self {
            caller: via,
            origin,
            value,
            block,
        }
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// An issued mask. Created exactly once, never destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Sequential identifier, starting at 1.
    pub id: TokenId,
    /// Holder the record was issued to.
    pub owner: Address,
    /// Whether the record came out of the owner reservation pool.
    pub reserved: bool,
}

// =============================================================================
// ALLOCATION
// =============================================================================

/// Which path an identifier allocation came through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationKind {
    /// Public membership-gated mint.
    Mint,
    /// Owner reservation pool.
    Reserve,
}

/// A block of consecutive identifiers handed out by one allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// First identifier of the block.
    pub first_id: TokenId,
    /// Number of identifiers (at least 1).
    pub count: u64,
    /// Path the allocation came through.
    pub kind: AllocationKind,
}

impl Allocation {
    /// Last identifier of the block (inclusive).
    #[must_use]
    pub fn last_id(&self) -> TokenId {
        self.first_id + self.count - 1
    }

    /// Identifiers in this block, ascending.
    pub fn ids(&self) -> impl Iterator<Item = TokenId> {
        self.first_id..self.first_id + self.count
    }
}

// =============================================================================
// TESTS
// =============================================================================
