//! # Error Types
//!
//! All error types for the mask registry.
//!
//! Every rejected call maps to exactly one `RegistryError` variant, and every
//! variant carries a stable `reason()` code so callers can branch on it.

use crate::domain::value_objects::{Address, TokenId, U256};
use thiserror::Error;

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Reasons a registry call is rejected. A rejected call leaves no state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Payment below the mint price.
    #[error("insufficient payment: sent {paid}, price is {price}")]
    InsufficientPayment {
        /// Amount sent.
        paid: U256,
        /// Required price.
        price: U256,
    },

    /// Payment above the mint price. Overpayment is refused rather than kept.
    #[error("excess payment: sent {paid}, price is {price}")]
    ExcessPayment {
        /// Amount sent.
        paid: U256,
        /// Required price.
        price: U256,
    },

    /// Caller's membership balance is below the threshold.
    #[error("{caller} does not fulfill the membership requirement: balance {balance} < {threshold}")]
    NotEligible {
        /// Rejected caller.
        caller: Address,
        /// Membership balance read from the ledger.
        balance: U256,
        /// Required balance.
        threshold: U256,
    },

    /// Caller already minted its per-caller allowance.
    #[error("{caller} reached the mint limit: {minted} of {cap}")]
    MintLimitExceeded {
        /// Rejected caller.
        caller: Address,
        /// Mints already made by the caller.
        minted: u32,
        /// Per-caller allowance.
        cap: u32,
    },

    /// Call was forwarded by a contract instead of sent by its originator.
    #[error("call from intermediary {caller} on behalf of {origin} rejected")]
    IntermediaryRejected {
        /// Forwarding contract.
        caller: Address,
        /// Account the call originated from.
        origin: Address,
    },

    /// Provenance is already committed or the sale has started.
    #[error("provenance can not be changed after the sale is started")]
    ProvenanceLocked,

    /// Allocation would exceed the total supply.
    #[error("max supply exceeded: {minted} + {requested} > {max}")]
    MaxSupplyExceeded {
        /// Records requested by the call.
        requested: u64,
        /// Records issued so far.
        minted: u64,
        /// Total supply.
        max: u64,
    },

    /// Reservation batch larger than a single call may process.
    #[error("batch too large: {requested} > {max} per call")]
    BatchTooLarge {
        /// Records requested by the call.
        requested: u64,
        /// Per-call ceiling.
        max: u64,
    },

    /// Reservation would exceed the lifetime reservation pool.
    #[error("reserve cap exceeded: {reserved} + {requested} > {max}")]
    ReserveCapExceeded {
        /// Records requested by the call.
        requested: u64,
        /// Records reserved so far.
        reserved: u64,
        /// Lifetime reservation pool.
        max: u64,
    },

    /// Reservation of zero records.
    #[error("reservation batch is empty")]
    EmptyBatch,

    /// URI or owner query for an identifier that was never issued.
    #[error("query for nonexistent token {0}")]
    NonexistentRecord(TokenId),

    /// The membership balance oracle could not be read.
    #[error("balance oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// Owner-only operation called by someone else.
    #[error("caller {caller} is not the owner")]
    Unauthorized {
        /// Rejected caller.
        caller: Address,
    },

    /// Empty base URI; revealing to nothing is not allowed.
    #[error("base URI must not be empty")]
    InvalidBaseUri,

    /// Base URI already revealed with a different value.
    #[error("metadata already revealed at {current}")]
    AlreadyRevealed {
        /// Base URI set at reveal.
        current: String,
    },

    /// Ownership transfer to the zero address.
    #[error("new owner is the zero address")]
    InvalidOwner,

    /// Starting index was already derived.
    #[error("starting index is already set")]
    StartingIndexAlreadySet,

    /// No starting-index block has been recorded yet.
    #[error("starting index block must be set")]
    StartingIndexBlockNotSet,

    /// Block hash for the starting index could not be obtained.
    #[error("block hash unavailable for block {number}")]
    BlockHashUnavailable {
        /// Block whose hash was requested.
        number: u64,
    },

    /// Withdraw with an empty treasury.
    #[error("treasury is empty")]
    NothingToWithdraw,
}

impl RegistryError {
    /// Stable machine-readable reason code.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InsufficientPayment { .. } => "INSUFFICIENT_PAYMENT",
            Self::ExcessPayment { .. } => "EXCESS_PAYMENT",
            Self::NotEligible { .. } => "NOT_ELIGIBLE",
            Self::MintLimitExceeded { .. } => "MINT_LIMIT_EXCEEDED",
            Self::IntermediaryRejected { .. } => "INTERMEDIARY_REJECTED",
            Self::ProvenanceLocked => "PROVENANCE_LOCKED",
            Self::MaxSupplyExceeded { .. } => "MAX_SUPPLY_EXCEEDED",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::ReserveCapExceeded { .. } => "RESERVE_CAP_EXCEEDED",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::NonexistentRecord(_) => "NONEXISTENT_RECORD",
            Self::OracleUnavailable(_) => "ORACLE_UNAVAILABLE",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::InvalidBaseUri => "INVALID_BASE_URI",
            Self::AlreadyRevealed { .. } => "ALREADY_REVEALED",
            Self::InvalidOwner => "INVALID_OWNER",
            Self::StartingIndexAlreadySet => "STARTING_INDEX_ALREADY_SET",
            Self::StartingIndexBlockNotSet => "STARTING_INDEX_BLOCK_NOT_SET",
            Self::BlockHashUnavailable { .. } => "BLOCK_HASH_UNAVAILABLE",
            Self::NothingToWithdraw => "NOTHING_TO_WITHDRAW",
        }
    }

    /// Returns true if the same call may succeed later without any action by
    /// the caller (e.g. the oracle comes back).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::OracleUnavailable(_) | Self::BlockHashUnavailable { .. }
        )
    }
}

// =============================================================================
// ORACLE ERRORS
// =============================================================================

/// Errors from the membership balance oracle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// Ledger not reachable.
    #[error("membership ledger unavailable")]
    Unavailable,

    /// Ledger did not answer in time.
    #[error("membership ledger timeout")]
    Timeout,

    /// Transfer exceeding the sender's balance (ledger-side).
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Amount to transfer.
        required: U256,
        /// Sender's balance.
        available: U256,
    },

    /// Other ledger error.
    #[error("ledger error: {0}")]
    Other(String),
}

impl From<OracleError> for RegistryError {
    fn from(err: OracleError) -> Self {
        RegistryError::OracleUnavailable(err.to_string())
    }
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Errors raised while building or validating a `RegistryConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable present but unparsable.
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv {
        /// Environment key.
        key: &'static str,
        /// Raw value found.
        value: String,
    },

    /// Parameters out of range or inconsistent.
    #[error("invalid registry parameters: {0}")]
    InvalidParameters(String),

    /// Malformed JSON configuration document.
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// TESTS
// =============================================================================
