//! # Mask Registry - Membership-Gated Collectible Issuance
//!
//! Issues a fixed-supply collection of sequentially numbered masks. Public
//! mints are paid, limited per caller and gated on a minimum balance of a
//! membership token; the owner may additionally reserve a bounded pool of
//! records for itself. A provenance commitment freezes the collection order
//! before the first issuance, and metadata is revealed once, one way.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `total_minted <= max_total_records` | `domain/issuance.rs` - `check_supply()` |
//! | `reserved_count <= max_reserved_records` | `domain/issuance.rs` - `check_reserve_capacity()` |
//! | `reserved_count <= total_minted` | `domain/issuance.rs` - `reserve_next_id()` |
//! | Provenance written at most once | `domain/provenance.rs` - `set_commitment()` |
//! | Provenance frozen after first issuance | `domain/registry.rs` - `issue()` |
//! | Reveal is terminal | `domain/metadata.rs` - `RevealState` |
//! | Rejected calls leave no trace | `service.rs` - single write guard per call |
//!
//! All of them are re-checked after every commit by
//! `domain/invariants.rs` - `check_all_invariants()`.
//!
//! ## Mint Gates (in order)
//!
//! | Gate | Error |
//! |------|-------|
//! | Caller is not a forwarding contract | `IntermediaryRejected` |
//! | Payment equals the price | `InsufficientPayment` / `ExcessPayment` |
//! | Membership ledger answers within `oracle_timeout_ms` | `OracleUnavailable` |
//! | Balance meets the threshold | `NotEligible` |
//! | Caller below its mint cap | `MintLimitExceeded` |
//! | Supply left | `MaxSupplyExceeded` |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `BalanceOracle` | Membership-token balance of the caller |
//! | `CallerClassifier` | Direct caller vs. forwarding contract |
//! | `BlockHashOracle` | Seed hash for the starting index |
//!
//! ## Usage Example
//!
//! ```ignore
//! use mask_registry::prelude::*;
//!
//! let service = create_test_service(owner)?;
//! service.oracle().set_balance(buyer, whole_units(5000));
//!
//! let ctx = CallContext::direct(buyer, service.mint_price().await, block);
//! let id = service.mint_mask(ctx).await?;
//! assert_eq!(service.token_uri(id).await?, "ipfs://hidden");
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Configuration
    pub use crate::config::RegistryConfig;

    // Domain entities
    pub use crate::domain::entities::{
        Allocation, AllocationKind, BlockContext, CallContext, Record,
    };

    // Value objects
    pub use crate::domain::value_objects::{whole_units, Address, Hash, TokenId, U256};

    // Domain components
    pub use crate::domain::metadata::{RevealOutcome, RevealState};
    pub use crate::domain::provenance::compute_provenance;
    pub use crate::domain::registry::{Committed, RegistryState};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::MaskRegistryApi;
    pub use crate::ports::outbound::{BalanceOracle, BlockHashOracle, CallerClassifier};

    // Events
    pub use crate::events::{topics, RegistryEvent};

    // Errors
    pub use crate::errors::{ConfigError, OracleError, RegistryError};

    // Adapters
    pub use crate::adapters::{
        InMemoryBlockHashes, InMemoryMembershipLedger, OriginCallerClassifier,
    };

    // Service
    pub use crate::service::{
        create_test_service, create_test_service_with_config, MaskRegistryService, ServiceStats,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
