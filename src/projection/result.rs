//! Projection output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::AssetClass;

/// What moved at a history point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum HistoryFlow {
    /// Amount deposited at this point (fixed income and bonds)
    Contribution(f64),
    /// Dividends accumulated so far (variable income)
    Dividends(f64),
}

/// One row of balance history, recorded after each contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,

    /// Running balance across all contributions so far
    pub balance: f64,

    pub flow: HistoryFlow,
}

/// Class-specific part of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstrumentDetails {
    FixedIncome,
    GovernmentBond {
        bond_name: Option<String>,
        inflation_linked: bool,
    },
    VariableIncome {
        class: AssetClass,
        dividend_yield: f64,
        annual_return: f64,
        monthly_appreciation: f64,
        monthly_dividend: f64,
    },
}

/// Partial withdrawal applied to a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalOutcome {
    pub date: NaiveDate,
    pub amount: f64,

    /// Balance right after the withdrawal, floored at zero
    pub balance_after_withdrawal: f64,
}

/// Complete projection result for one instrument and parameter set
///
/// Taxes are already netted out of both `final_balance` and `earnings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub final_balance: f64,
    pub total_contributed: f64,
    pub earnings: f64,
    pub taxes: f64,

    /// Accumulated dividends (variable income only)
    pub dividends: Option<f64>,

    /// Earnings as a percentage of contributed capital
    pub earnings_percentage: f64,

    /// Monthly rate used for compounding
    pub monthly_rate: f64,

    /// Calendar months between start and end
    pub horizon_months: i32,

    pub history: Vec<HistoryPoint>,
    pub details: InstrumentDetails,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawal: Option<WithdrawalOutcome>,
}

impl ProjectionResult {
    /// Earnings as a percentage of contributed capital, 0 when nothing was contributed
    pub fn percentage_of(earnings: f64, total_contributed: f64) -> f64 {
        if total_contributed > 0.0 {
            earnings / total_contributed * 100.0
        } else {
            0.0
        }
    }

    /// Whether the projected instrument is an inflation-indexed government bond
    pub fn is_inflation_linked(&self) -> bool {
        matches!(
            self.details,
            InstrumentDetails::GovernmentBond {
                inflation_linked: true,
                ..
            }
        )
    }

    /// Return over contributed capital, computed from the (possibly scenario-adjusted) final balance
    pub fn return_pct(&self) -> f64 {
        Self::percentage_of(self.final_balance - self.total_contributed, self.total_contributed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_guard() {
        assert_eq!(ProjectionResult::percentage_of(100.0, 0.0), 0.0);
        assert_eq!(ProjectionResult::percentage_of(250.0, 1000.0), 25.0);
    }

    #[test]
    fn test_history_flow_serializes_tagged() {
        let json = serde_json::to_string(&HistoryFlow::Dividends(12.5)).unwrap();
        assert_eq!(json, r#"{"kind":"dividends","amount":12.5}"#);
    }
}
