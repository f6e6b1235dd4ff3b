//! Goal solving: inverse of the future value of a monthly annuity
//!
//! Degenerate inputs never fail. They produce [`MonthsToGoal::Unreachable`]
//! or a zero contribution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Months needed to reach a goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "months", rename_all = "snake_case")]
pub enum MonthsToGoal {
    Months(f64),
    /// No positive contribution/rate combination reaches the goal
    Unreachable,
}

impl MonthsToGoal {
    pub fn months(&self) -> Option<f64> {
        match self {
            MonthsToGoal::Months(m) => Some(*m),
            MonthsToGoal::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, MonthsToGoal::Months(_))
    }
}

impl fmt::Display for MonthsToGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthsToGoal::Months(m) => write!(f, "{:.1} months", m),
            MonthsToGoal::Unreachable => f.write_str("unreachable"),
        }
    }
}

/// Time and contribution figures for reaching a financial goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalScenario {
    /// Time to goal keeping the current contribution
    pub time_with_current: MonthsToGoal,

    /// Monthly contribution that reaches the goal within the horizon
    pub required_monthly: f64,

    /// Shortfall of the current contribution, never negative
    pub additional_monthly: f64,
    pub additional_quarterly: f64,
    pub additional_semiannual: f64,
    pub additional_annual: f64,
}

impl GoalScenario {
    /// Whether a projected balance reaches the goal
    pub fn meets_goal(final_balance: f64, goal_amount: f64) -> bool {
        final_balance >= goal_amount
    }
}

/// Months of `monthly_contribution` at `monthly_rate` needed to accumulate `goal_amount`
///
/// `ln(1 + goal * r / c) / ln(1 + r)`, floored at zero.
pub fn time_to_goal(monthly_contribution: f64, monthly_rate: f64, goal_amount: f64) -> MonthsToGoal {
    if monthly_rate <= 0.0 || monthly_contribution <= 0.0 {
        return MonthsToGoal::Unreachable;
    }

    let months = (1.0 + goal_amount * monthly_rate / monthly_contribution).ln() / monthly_rate.ln_1p();
    if months.is_finite() {
        MonthsToGoal::Months(months.max(0.0))
    } else {
        MonthsToGoal::Unreachable
    }
}

/// Monthly contribution that accumulates `goal_amount` in `months_available`
///
/// Falls back to straight division without a positive rate; a non-positive
/// horizon yields zero.
pub fn required_contribution(monthly_rate: f64, goal_amount: f64, months_available: i32) -> f64 {
    if months_available <= 0 {
        return 0.0;
    }
    let months = months_available as f64;
    if monthly_rate <= 0.0 {
        return (goal_amount / months).max(0.0);
    }

    let required = goal_amount * monthly_rate / ((1.0 + monthly_rate).powi(months_available) - 1.0);
    if required.is_finite() {
        required.max(0.0)
    } else {
        0.0
    }
}

/// Both solutions plus the contribution shortfall at several frequencies
pub fn goal_scenario(
    monthly_rate: f64,
    goal_amount: f64,
    current_monthly_contribution: f64,
    total_months: i32,
) -> GoalScenario {
    let time_with_current = time_to_goal(current_monthly_contribution, monthly_rate, goal_amount);
    let required_monthly = required_contribution(monthly_rate, goal_amount, total_months);
    let additional_monthly = (required_monthly - current_monthly_contribution).max(0.0);

    GoalScenario {
        time_with_current,
        required_monthly,
        additional_monthly,
        additional_quarterly: additional_monthly * 3.0,
        additional_semiannual: additional_monthly * 6.0,
        additional_annual: additional_monthly * 12.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Future value of `months` end-of-month deposits
    fn annuity_value(contribution: f64, rate: f64, months: i32) -> f64 {
        contribution * ((1.0 + rate).powi(months) - 1.0) / rate
    }

    #[test]
    fn test_required_contribution_round_trip() {
        for &(rate, goal, months) in &[(0.0093, 100_000.0, 60), (0.01, 1_000_000.0, 240), (0.002, 5_000.0, 12)] {
            let c = required_contribution(rate, goal, months);
            assert_relative_eq!(annuity_value(c, rate, months), goal, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_time_to_goal_inverts_annuity() {
        let rate = 0.01;
        let months = time_to_goal(1000.0, rate, annuity_value(1000.0, rate, 48)).months().unwrap();
        assert_relative_eq!(months, 48.0, max_relative = 1e-9);
    }

    #[test]
    fn test_unreachable_sentinel() {
        assert_eq!(time_to_goal(0.0, 0.01, 100_000.0), MonthsToGoal::Unreachable);
        assert_eq!(time_to_goal(1000.0, 0.0, 100_000.0), MonthsToGoal::Unreachable);
        assert_eq!(time_to_goal(-5.0, 0.01, 100_000.0), MonthsToGoal::Unreachable);
        // ln of a negative argument
        assert_eq!(time_to_goal(100.0, 0.01, -50_000.0), MonthsToGoal::Unreachable);
        assert!(!MonthsToGoal::Unreachable.is_reachable());
    }

    #[test]
    fn test_required_contribution_degenerate_inputs() {
        assert_eq!(required_contribution(0.0, 12_000.0, 12), 1_000.0);
        assert_eq!(required_contribution(-0.01, 12_000.0, 12), 1_000.0);
        assert_eq!(required_contribution(0.01, 12_000.0, 0), 0.0);
        assert_eq!(required_contribution(0.01, -12_000.0, 12), 0.0);
    }

    #[test]
    fn test_goal_scenario_shortfall() {
        let scenario = goal_scenario(0.01, 100_000.0, 1_000.0, 60);
        let required = required_contribution(0.01, 100_000.0, 60);

        assert_eq!(scenario.required_monthly, required);
        assert_relative_eq!(scenario.additional_monthly, required - 1_000.0);
        assert_relative_eq!(scenario.additional_annual, scenario.additional_monthly * 12.0);
        assert!(scenario.time_with_current.months().unwrap() > 60.0);
    }

    #[test]
    fn test_goal_already_covered() {
        let scenario = goal_scenario(0.01, 10_000.0, 1_000.0, 60);
        assert_eq!(scenario.additional_monthly, 0.0);
        assert_eq!(scenario.additional_quarterly, 0.0);
        assert!(GoalScenario::meets_goal(10_000.0, 10_000.0));
        assert!(!GoalScenario::meets_goal(9_999.0, 10_000.0));
    }
}
