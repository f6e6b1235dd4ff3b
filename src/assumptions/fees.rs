//! Brokerage and administration fees

use serde::{Deserialize, Serialize};

/// Fee assumptions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Per-operation brokerage fee (fraction of the traded amount)
    pub brokerage: f64,

    /// Annual administration fee (fraction of contributed capital)
    pub administration_annual: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            brokerage: 0.005,
            administration_annual: 0.01,
        }
    }
}

impl FeeSchedule {
    /// Administration fee charged on contributed capital over `months`
    ///
    /// Simple accrual: contributed * (annual / 12) * months. Non-positive
    /// horizons cost nothing.
    pub fn administration_fee(&self, total_contributed: f64, months: i32) -> f64 {
        if months <= 0 {
            return 0.0;
        }
        total_contributed * (self.administration_annual / 12.0) * months as f64
    }

    /// Brokerage charged on a single operation
    pub fn brokerage_fee(&self, amount: f64) -> f64 {
        amount.max(0.0) * self.brokerage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_administration_fee() {
        let fees = FeeSchedule::default();
        // 1% a year on 60k over 5 years
        assert_relative_eq!(fees.administration_fee(60_000.0, 60), 3_000.0, max_relative = 1e-12);
        assert_eq!(fees.administration_fee(60_000.0, 0), 0.0);
    }

    #[test]
    fn test_brokerage_fee() {
        let fees = FeeSchedule::default();
        assert_relative_eq!(fees.brokerage_fee(10_000.0), 50.0);
        assert_eq!(fees.brokerage_fee(-1.0), 0.0);
    }
}
