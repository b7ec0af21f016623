//! Position sizing for a matched instrument.

use serde::{Deserialize, Serialize};

use crate::{PatternError, Result};

/// Spending limits applied when sizing a position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionLimits {
    /// Total cash available
    pub budget: f64,
    /// Cash cap for a single order
    pub max_order: f64,
    /// Share cap per instrument
    pub max_shares: u64,
}

impl Default for PositionLimits {
    fn default() -> Self {
        Self {
            budget: 1000.0,
            max_order: 500.0,
            max_shares: 1000,
        }
    }
}

impl PositionLimits {
    /// Whole shares purchasable at `price` under every limit.
    pub fn shares_at(&self, price: f64) -> Result<u64> {
        if !price.is_finite() || price <= 0.0 {
            return Err(PatternError::InvalidValue("price must be positive and finite"));
        }
        if self.budget < 0.0 || self.max_order < 0.0 {
            return Err(PatternError::InvalidValue("limits must be non-negative"));
        }

        let by_budget = (self.budget / price).floor() as u64;
        let by_order = (self.max_order / price).floor() as u64;
        Ok(by_budget.min(by_order).min(self.max_shares))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_cap_binds() {
        let limits = PositionLimits::default();
        assert_eq!(limits.shares_at(30.0).unwrap(), 16);
    }

    #[test]
    fn test_share_cap_binds() {
        let limits = PositionLimits {
            max_shares: 10,
            ..PositionLimits::default()
        };
        assert_eq!(limits.shares_at(1.0).unwrap(), 10);
    }

    #[test]
    fn test_budget_binds() {
        let limits = PositionLimits {
            budget: 100.0,
            ..PositionLimits::default()
        };
        assert_eq!(limits.shares_at(30.0).unwrap(), 3);
        assert_eq!(limits.shares_at(150.0).unwrap(), 0);
    }

    #[test]
    fn test_invalid_price() {
        let limits = PositionLimits::default();
        assert!(limits.shares_at(0.0).is_err());
        assert!(limits.shares_at(-5.0).is_err());
        assert!(limits.shares_at(f64::NAN).is_err());
    }
}
