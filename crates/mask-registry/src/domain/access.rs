//! # Access Gate
//!
//! Membership rule for public minting: a caller may mint when its balance of
//! the membership token is at least the configured threshold.
//!
//! The balance itself comes from the `BalanceOracle` port; this module only
//! holds the rule so it stays a pure function of its inputs.

use crate::domain::value_objects::U256;

/// Fixed-threshold membership gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MembershipGate {
    threshold: U256,
}

impl MembershipGate {
    /// Creates a gate admitting balances `>= threshold`.
    #[must_use]
    pub const fn new(threshold: U256) -> Self {
        Self { threshold }
    }

    /// Returns the threshold.
    #[must_use]
    pub const fn threshold(&self) -> U256 {
        self.threshold
    }

    /// Returns true if `balance` satisfies the membership requirement.
    #[must_use]
    pub fn admits(&self, balance: U256) -> bool {
        balance >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::whole_units;

    #[test]
    fn test_threshold_is_inclusive() {
        let gate = MembershipGate::new(whole_units(5000));
        assert!(!gate.admits(U256::zero()));
        assert!(!gate.admits(whole_units(5000) - U256::one()));
        assert!(gate.admits(whole_units(5000)));
        assert!(gate.admits(whole_units(1_000_000)));
    }

    #[test]
    fn test_zero_threshold_admits_everyone() {
        let gate = MembershipGate::new(U256::zero());
        assert!(gate.admits(U256::zero()));
    }
}
