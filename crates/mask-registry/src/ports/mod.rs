//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the registry domain and the outside world.
//!
//! - **Driving Port (Inbound)**: `MaskRegistryApi`
//! - **Driven Ports (Outbound)**: `BalanceOracle`, `CallerClassifier`, `BlockHashOracle`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
