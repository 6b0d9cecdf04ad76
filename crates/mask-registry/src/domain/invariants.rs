//! # Domain Invariants
//!
//! Properties that MUST hold after every committed registry call. The
//! service checks them after each mutation and logs any violation.
//!
//! - Supply: `total_minted <= max_total_records`
//! - Reserve pool: `reserved_count <= max_reserved_records`
//! - Reserve subset: `reserved_count <= total_minted`
//! - Record density: the record book holds exactly `total_minted` records
//! - Provenance lock: anything issued implies the commitment is locked

use crate::domain::registry::RegistryState;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Total issued never exceeds the supply cap.
#[must_use]
pub fn check_supply_invariant(total_minted: u64, max_total_records: u64) -> bool {
    total_minted <= max_total_records
}

/// Owner reservations never exceed the reservation pool.
#[must_use]
pub fn check_reserve_cap_invariant(reserved_count: u64, max_reserved_records: u64) -> bool {
    reserved_count <= max_reserved_records
}

/// Reserved records are a subset of all issued records.
#[must_use]
pub fn check_reserve_subset_invariant(reserved_count: u64, total_minted: u64) -> bool {
    reserved_count <= total_minted
}

/// Identifiers `1..=total_minted` are all issued, and nothing beyond.
#[must_use]
pub fn check_record_density_invariant(record_count: u64, total_minted: u64) -> bool {
    record_count == total_minted
}

/// Once anything is issued the provenance commitment is frozen.
#[must_use]
pub fn check_provenance_lock_invariant(total_minted: u64, locked: bool) -> bool {
    total_minted == 0 || locked
}

/// Check all invariants against a registry state.
#[must_use]
pub fn check_all_invariants(state: &RegistryState) -> InvariantCheckResult {
    let issuance = state.issuance();
    let total = issuance.total_minted();
    let reserved = issuance.reserved_count();
    let mut violations = Vec::new();

    if !check_supply_invariant(total, issuance.max_total_records()) {
        violations.push(InvariantViolation::SupplyExceeded {
            total,
            max: issuance.max_total_records(),
        });
    }

    if !check_reserve_cap_invariant(reserved, issuance.max_reserved_records()) {
        violations.push(InvariantViolation::ReservePoolExceeded {
            reserved,
            max: issuance.max_reserved_records(),
        });
    }

    if !check_reserve_subset_invariant(reserved, total) {
        violations.push(InvariantViolation::ReservedExceedsIssued { reserved, total });
    }

    let records = state.records().len();
    if !check_record_density_invariant(records, total) {
        violations.push(InvariantViolation::RecordCountMismatch { records, total });
    }

    if !check_provenance_lock_invariant(total, state.is_provenance_locked()) {
        violations.push(InvariantViolation::ProvenanceUnlocked { total });
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// More records issued than the supply cap.
    SupplyExceeded {
        /// Records issued.
        total: u64,
        /// Total supply.
        max: u64,
    },
    /// More records reserved than the pool allows.
    ReservePoolExceeded {
        /// Records reserved.
        reserved: u64,
        /// Reservation pool.
        max: u64,
    },
    /// Reserved count larger than the issued count.
    ReservedExceedsIssued {
        /// Records reserved.
        reserved: u64,
        /// Records issued.
        total: u64,
    },
    /// Record book out of step with the counter.
    RecordCountMismatch {
        /// Records in the record book.
        records: u64,
        /// Records counted by the issuance counter.
        total: u64,
    },
    /// Records issued while provenance is still writable.
    ProvenanceUnlocked {
        /// Records issued.
        total: u64,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SupplyExceeded { total, max } => {
                write!(f, "supply exceeded: {total} > {max}")
            }
            Self::ReservePoolExceeded { reserved, max } => {
                write!(f, "reserve pool exceeded: {reserved} > {max}")
            }
            Self::ReservedExceedsIssued { reserved, total } => {
                write!(f, "reserved {reserved} exceeds issued {total}")
            }
            Self::RecordCountMismatch { records, total } => {
                write!(f, "record book holds {records} records, counter says {total}")
            }
            Self::ProvenanceUnlocked { total } => {
                write!(f, "{total} records issued with provenance unlocked")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
