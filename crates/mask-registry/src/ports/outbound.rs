//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the registry depends on. Adapters implement these to provide:
//! - Membership-token balances (the fungible ledger the gate reads)
//! - Caller classification (direct caller vs. forwarding contract)
//! - Historical block hashes (starting-index seed)

use crate::domain::entities::CallContext;
use crate::domain::value_objects::{Address, Hash, U256};
use crate::errors::OracleError;
use async_trait::async_trait;

// =============================================================================
// BALANCE ORACLE (Membership Ledger)
// =============================================================================

/// Read access to the membership token ledger.
///
/// The gate never grants access when this fails: an error becomes
/// `RegistryError::OracleUnavailable`.
#[async_trait]
pub trait BalanceOracle: Send + Sync {
    /// Membership balance of `holder`, in base units.
    async fn balance_of(&self, holder: Address) -> Result<U256, OracleError>;
}

// =============================================================================
// CALLER CLASSIFIER
// =============================================================================

/// Distinguishes an originating account from a contract forwarding its call.
pub trait CallerClassifier: Send + Sync {
    /// Returns true if `ctx.caller` is acting for itself.
    fn is_direct_caller(&self, ctx: &CallContext) -> bool;
}

// =============================================================================
// BLOCK HASH ORACLE
// =============================================================================

/// Interface for querying historical block hashes.
///
/// Only the last 256 block hashes are available, as with the BLOCKHASH opcode.
#[async_trait]
pub trait BlockHashOracle: Send + Sync {
    /// Get block hash for a given block number.
    ///
    /// # Returns
    ///
    /// * `Some(Hash)` - Block hash if within the valid range
    /// * `None` - If the block is too old, in the future, or unknown
    async fn get_block_hash(&self, number: u64, current_number: u64) -> Option<Hash>;
}
