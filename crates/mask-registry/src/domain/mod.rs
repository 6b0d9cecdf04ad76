//! # Domain Layer (Inner Hexagon)
//!
//! Pure registry logic. NO I/O, NO async.
//!
//! - Leaf components (`access`, `provenance`, `issuance`, `records`,
//!   `metadata`, `starting_index`) own one concern each.
//! - `registry` composes them into `RegistryState`; `mint` and `reservation`
//!   add the two issuance paths on top.
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).

pub mod access;
pub mod entities;
pub mod invariants;
pub mod issuance;
pub mod metadata;
pub mod mint;
pub mod provenance;
pub mod records;
pub mod registry;
pub mod reservation;
pub mod starting_index;
pub mod value_objects;

pub use access::*;
pub use entities::*;
pub use invariants::*;
pub use issuance::*;
pub use metadata::*;
pub use provenance::*;
pub use records::*;
pub use registry::*;
pub use starting_index::*;
pub use value_objects::*;
