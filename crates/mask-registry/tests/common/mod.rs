//! Shared helpers for the integration suites.

#![allow(dead_code)]

use mask_registry::prelude::*;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub type TestService =
    MaskRegistryService<InMemoryMembershipLedger, OriginCallerClassifier, InMemoryBlockHashes>;

pub const OWNER: Address = Address::new([0xA0; 20]);

static TRACING: Once = Once::new();

/// Install a fmt subscriber once per test binary. `RUST_LOG` overrides the
/// default `mask_registry=debug` filter.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("mask_registry=debug"))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Distinct account for index `n`.
pub fn account(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0x10;
    bytes[19] = n;
    Address::new(bytes)
}

/// Service with `config`, owned by `OWNER`.
pub fn service_with(config: RegistryConfig) -> TestService {
    init_tracing();
    create_test_service_with_config(config, OWNER).expect("valid test config")
}

/// Paid direct call from `caller` at block `number`.
pub fn paid(service_price: U256, caller: Address, number: u64) -> CallContext {
    CallContext::direct(caller, service_price, BlockContext::new(number, 1_700_000_000 + number))
}

/// Give `holder` exactly the membership threshold.
pub fn make_member(service: &TestService, holder: Address, threshold: U256) {
    service.oracle().set_balance(holder, threshold);
}
