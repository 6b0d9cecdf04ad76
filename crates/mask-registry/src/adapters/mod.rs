//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the driven ports, used by tests and local
//! tooling. A deployment backs the same ports with its ledger.

pub mod block_hashes;
pub mod caller_classifier;
pub mod membership_ledger;

pub use block_hashes::*;
pub use caller_classifier::*;
pub use membership_ledger::*;
