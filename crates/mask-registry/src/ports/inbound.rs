//! # Driving Ports (API - Inbound)
//!
//! The public operations of the mask registry. Each mutating call is applied
//! atomically: it either commits fully or fails with a `RegistryError` and
//! leaves no trace.

use crate::domain::entities::{Allocation, CallContext};
use crate::domain::value_objects::{Address, Hash, TokenId};
use crate::errors::RegistryError;
use async_trait::async_trait;

// =============================================================================
// MASK REGISTRY API (Primary Driving Port)
// =============================================================================

/// Primary API of the registry.
///
/// ## Usage
///
/// ```ignore
/// let ctx = CallContext::direct(buyer, price, block);
/// let id = api.mint_mask(ctx).await?;
/// let uri = api.token_uri(id).await?;
/// ```
#[async_trait]
pub trait MaskRegistryApi: Send + Sync {
    /// Mint one mask to `ctx.caller`, paying `ctx.value`.
    ///
    /// # Returns
    ///
    /// * `TokenId` - Identifier of the new record
    async fn mint_mask(&self, ctx: CallContext) -> Result<TokenId, RegistryError>;

    /// Owner-only. Issue `count` records to the owner, free of charge.
    async fn reserve_tokens_to_owner(
        &self,
        caller: Address,
        count: u64,
    ) -> Result<Allocation, RegistryError>;

    /// Owner-only. Write the provenance commitment. Write-once, and only
    /// before anything is issued.
    async fn set_provenance_hash(&self, caller: Address, hash: Hash)
        -> Result<(), RegistryError>;

    /// Owner-only. Reveal metadata under `base_uri`.
    async fn set_base_uri(&self, caller: Address, base_uri: String)
        -> Result<(), RegistryError>;

    /// Metadata location of record `id`.
    async fn token_uri(&self, id: TokenId) -> Result<String, RegistryError>;

    /// Current owner.
    async fn owner(&self) -> Address;

    /// Records issued from the reservation pool so far.
    async fn reserved_tokens(&self) -> u64;

    /// Returns true while the reservation pool has room.
    async fn can_reserve(&self) -> bool;

    /// Whether `holder` meets the membership threshold right now.
    async fn is_eligible(&self, holder: Address) -> Result<bool, RegistryError>;
}
