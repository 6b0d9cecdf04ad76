//! Registry configuration, validation and loading.
//!
//! # Example
//!
//! ```ignore
//! use mask_registry::config::RegistryConfig;
//!
//! let config = RegistryConfig::default()
//!     .with_max_total_records(10_000)
//!     .with_hidden_uri("ipfs://QmHidden");
//! config.validate()?;
//! ```

use crate::domain::value_objects::{whole_units, U256};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Default lifetime size of the owner reservation pool.
pub const DEFAULT_MAX_RESERVED_RECORDS: u64 = 50;

/// Default ceiling on records reserved by a single call.
pub const DEFAULT_MAX_BATCH_RESERVE: u64 = 50;

/// Default number of public mints allowed per caller.
pub const DEFAULT_PER_CALLER_CAP: u32 = 3;

/// Default time limit on one membership-balance query.
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 5000;

/// Environment keys read by [`RegistryConfig::from_env`].
pub mod env_keys {
    /// Total supply.
    pub const MAX_TOKENS: &str = "MASKS_MAX_TOKENS";
    /// Mint price in base units.
    pub const MINT_PRICE: &str = "MASKS_MINT_PRICE";
    /// Membership threshold in base units.
    pub const MEMBERSHIP_THRESHOLD: &str = "MASKS_MEMBERSHIP_THRESHOLD";
    /// Owner reservation pool.
    pub const TOTAL_RESERVE: &str = "MASKS_TOTAL_RESERVE";
    /// Per-call reservation ceiling.
    pub const MAX_BATCH_RESERVE: &str = "MASKS_MAX_BATCH_RESERVE";
    /// Public mints per caller.
    pub const PER_CALLER_CAP: &str = "MASKS_PER_CALLER_CAP";
    /// Reveal time, unix seconds.
    pub const REVEAL_TIMESTAMP: &str = "MASKS_REVEAL_TIMESTAMP";
    /// Hidden metadata CID or URI.
    pub const IPFS_HIDDEN: &str = "MASKS_IPFS_HIDDEN";
    /// Membership-balance query time limit in milliseconds.
    pub const ORACLE_TIMEOUT_MS: &str = "MASKS_ORACLE_TIMEOUT_MS";
}

/// Registry configuration. Fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Total number of records that can ever exist.
    pub max_total_records: u64,
    /// Exact native payment required per mint.
    pub mint_price: U256,
    /// Minimum membership-token balance required to mint.
    pub membership_threshold: U256,
    /// Lifetime size of the owner reservation pool.
    pub max_reserved_records: u64,
    /// Ceiling on records reserved by one call.
    pub max_batch_reserve: u64,
    /// Public mints allowed per caller.
    pub per_caller_cap: u32,
    /// Unix time after which the next mint records the starting-index block.
    pub reveal_timestamp: u64,
    /// Placeholder location served for every record until reveal.
    pub hidden_uri: String,
    /// Time limit on one membership-balance query, in milliseconds.
    pub oracle_timeout_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_total_records: 10_000,
            mint_price: U256::from(5) * U256::exp10(16), // 0.05 native
            membership_threshold: whole_units(5000),
            max_reserved_records: DEFAULT_MAX_RESERVED_RECORDS,
            max_batch_reserve: DEFAULT_MAX_BATCH_RESERVE,
            per_caller_cap: DEFAULT_PER_CALLER_CAP,
            reveal_timestamp: u64::MAX,
            hidden_uri: "ipfs://hidden".to_string(),
            oracle_timeout_ms: DEFAULT_ORACLE_TIMEOUT_MS,
        }
    }
}

impl RegistryConfig {
    /// Validate limits and their consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_total_records == 0 {
            return Err(ConfigError::InvalidParameters(
                "max_total_records cannot be 0".to_string(),
            ));
        }

        if self.max_reserved_records > self.max_total_records {
            return Err(ConfigError::InvalidParameters(format!(
                "max_reserved_records {} exceeds max_total_records {}",
                self.max_reserved_records, self.max_total_records
            )));
        }

        if self.max_batch_reserve == 0 {
            return Err(ConfigError::InvalidParameters(
                "max_batch_reserve cannot be 0".to_string(),
            ));
        }

        if self.per_caller_cap == 0 {
            return Err(ConfigError::InvalidParameters(
                "per_caller_cap cannot be 0".to_string(),
            ));
        }

        if self.hidden_uri.trim().is_empty() {
            return Err(ConfigError::InvalidParameters(
                "hidden_uri cannot be empty".to_string(),
            ));
        }

        if self.oracle_timeout_ms == 0 {
            return Err(ConfigError::InvalidParameters(
                "oracle_timeout_ms cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MASKS_MAX_TOKENS`: total supply (default: 10000)
    /// - `MASKS_MINT_PRICE`: mint price in base units, decimal
    /// - `MASKS_MEMBERSHIP_THRESHOLD`: membership threshold in base units, decimal
    /// - `MASKS_TOTAL_RESERVE`: owner reservation pool (default: 50)
    /// - `MASKS_MAX_BATCH_RESERVE`: per-call reservation ceiling (default: 50)
    /// - `MASKS_PER_CALLER_CAP`: mints per caller (default: 3)
    /// - `MASKS_REVEAL_TIMESTAMP`: unix seconds
    /// - `MASKS_IPFS_HIDDEN`: hidden metadata CID or full URI
    /// - `MASKS_ORACLE_TIMEOUT_MS`: balance query time limit (default: 5000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup. Missing keys keep
    /// their defaults; present but unparsable keys fail.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            max_total_records: parse_or(&lookup, env_keys::MAX_TOKENS, defaults.max_total_records)?,
            mint_price: parse_u256_or(&lookup, env_keys::MINT_PRICE, defaults.mint_price)?,
            membership_threshold: parse_u256_or(
                &lookup,
                env_keys::MEMBERSHIP_THRESHOLD,
                defaults.membership_threshold,
            )?,
            max_reserved_records: parse_or(
                &lookup,
                env_keys::TOTAL_RESERVE,
                defaults.max_reserved_records,
            )?,
            max_batch_reserve: parse_or(
                &lookup,
                env_keys::MAX_BATCH_RESERVE,
                defaults.max_batch_reserve,
            )?,
            per_caller_cap: parse_or(&lookup, env_keys::PER_CALLER_CAP, defaults.per_caller_cap)?,
            reveal_timestamp: parse_or(
                &lookup,
                env_keys::REVEAL_TIMESTAMP,
                defaults.reveal_timestamp,
            )?,
            hidden_uri: lookup(env_keys::IPFS_HIDDEN)
                .map(|v| hidden_uri_from(&v))
                .unwrap_or(defaults.hidden_uri),
            oracle_timeout_ms: parse_or(
                &lookup,
                env_keys::ORACLE_TIMEOUT_MS,
                defaults.oracle_timeout_ms,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration document. Absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set the total supply
    #[must_use]
    pub fn with_max_total_records(mut self, max: u64) -> Self {
        self.max_total_records = max;
        self
    }

    /// Builder-style method to set the mint price
    #[must_use]
    pub fn with_mint_price(mut self, price: U256) -> Self {
        self.mint_price = price;
        self
    }

    /// Builder-style method to set the membership threshold
    #[must_use]
    pub fn with_membership_threshold(mut self, threshold: U256) -> Self {
        self.membership_threshold = threshold;
        self
    }

    /// Builder-style method to set the reservation pool size
    #[must_use]
    pub fn with_max_reserved_records(mut self, max: u64) -> Self {
        self.max_reserved_records = max;
        self
    }

    /// Builder-style method to set the per-call reservation ceiling
    #[must_use]
    pub fn with_max_batch_reserve(mut self, max: u64) -> Self {
        self.max_batch_reserve = max;
        self
    }

    /// Builder-style method to set the per-caller mint cap
    #[must_use]
    pub fn with_per_caller_cap(mut self, cap: u32) -> Self {
        self.per_caller_cap = cap;
        self
    }

    /// Builder-style method to set the reveal timestamp
    #[must_use]
    pub fn with_reveal_timestamp(mut self, timestamp: u64) -> Self {
        self.reveal_timestamp = timestamp;
        self
    }

    /// Builder-style method to set the hidden URI
    #[must_use]
    pub fn with_hidden_uri(mut self, uri: impl Into<String>) -> Self {
        self.hidden_uri = uri.into();
        self
    }

    /// Builder-style method to set the balance query time limit
    #[must_use]
    pub fn with_oracle_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.oracle_timeout_ms = timeout_ms;
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
        None => Ok(default),
    }
}

fn parse_u256_or<F>(lookup: &F, key: &'static str, default: U256) -> Result<U256, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => {
            U256::from_dec_str(value.trim()).map_err(|_| ConfigError::InvalidEnv { key, value })
        }
        None => Ok(default),
    }
}

// A bare CID is expanded to an ipfs:// URI, as the deployment scripts do.
fn hidden_uri_from(value: &str) -> String {
    let value = value.trim();
    if value.contains("://") {
        value.to_string()
    } else {
        format!("ipfs://{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = RegistryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_reserved_records, 50);
        assert_eq!(config.max_batch_reserve, 50);
        assert_eq!(config.per_caller_cap, 3);
    }

    #[test]
    fn test_validation_rejects_zero_supply() {
        let config = RegistryConfig::default().with_max_total_records(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_validation_rejects_reserve_above_supply() {
        let config = RegistryConfig::default()
            .with_max_total_records(10)
            .with_max_reserved_records(11);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_batch_and_cap() {
        assert!(RegistryConfig::default()
            .with_max_batch_reserve(0)
            .validate()
            .is_err());
        assert!(RegistryConfig::default()
            .with_per_caller_cap(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validation_rejects_zero_oracle_timeout() {
        let config = RegistryConfig::default().with_oracle_timeout_ms(0);
        assert!(config.validate().is_err());
        assert_eq!(
            RegistryConfig::default().oracle_timeout_ms,
            DEFAULT_ORACLE_TIMEOUT_MS
        );
    }

    #[test]
    fn test_validation_rejects_empty_hidden_uri() {
        let config = RegistryConfig::default().with_hidden_uri("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = RegistryConfig::from_lookup(lookup_from(&[
            (env_keys::MAX_TOKENS, "8888"),
            (env_keys::MINT_PRICE, "80000000000000000"),
            (env_keys::TOTAL_RESERVE, "70"),
            (env_keys::REVEAL_TIMESTAMP, "1640995200"),
            (env_keys::IPFS_HIDDEN, "QmHiddenCid"),
            (env_keys::ORACLE_TIMEOUT_MS, "250"),
        ]))
        .unwrap();

        assert_eq!(config.max_total_records, 8888);
        assert_eq!(config.mint_price, U256::from(80_000_000_000_000_000u64));
        assert_eq!(config.max_reserved_records, 70);
        assert_eq!(config.reveal_timestamp, 1_640_995_200);
        assert_eq!(config.hidden_uri, "ipfs://QmHiddenCid");
        assert_eq!(config.oracle_timeout_ms, 250);
        // Untouched keys keep defaults
        assert_eq!(config.per_caller_cap, DEFAULT_PER_CALLER_CAP);
    }

    #[test]
    fn test_from_lookup_keeps_full_uri() {
        let config = RegistryConfig::from_lookup(lookup_from(&[(
            env_keys::IPFS_HIDDEN,
            "https://example.org/hidden.json",
        )]))
        .unwrap();
        assert_eq!(config.hidden_uri, "https://example.org/hidden.json");
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result = RegistryConfig::from_lookup(lookup_from(&[(env_keys::MAX_TOKENS, "lots")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnv {
                key: env_keys::MAX_TOKENS,
                ..
            })
        ));

        let result =
            RegistryConfig::from_lookup(lookup_from(&[(env_keys::MINT_PRICE, "0.08")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }

    #[test]
    fn test_from_lookup_validates() {
        let result = RegistryConfig::from_lookup(lookup_from(&[
            (env_keys::MAX_TOKENS, "10"),
            (env_keys::TOTAL_RESERVE, "20"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidParameters(_))));
    }

    #[test]
    fn test_from_json_partial_document() {
        let config =
            RegistryConfig::from_json_str(r#"{ "max_total_records": 100, "per_caller_cap": 5 }"#)
                .unwrap();
        assert_eq!(config.max_total_records, 100);
        assert_eq!(config.per_caller_cap, 5);
        assert_eq!(config.max_batch_reserve, DEFAULT_MAX_BATCH_RESERVE);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            RegistryConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .with_max_total_records(500)
            .with_membership_threshold(U256::from(1))
            .with_hidden_uri("ipfs://x");
        assert_eq!(config.max_total_records, 500);
        assert_eq!(config.membership_threshold, U256::from(1));
        assert_eq!(config.hidden_uri, "ipfs://x");
    }
}
