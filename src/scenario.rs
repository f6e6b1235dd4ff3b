//! Economic scenario adjustment of finished projections
//!
//! Holds the scenario table once and rescales any number of results
//! without re-running the projection.

use log::debug;

use crate::assumptions::{EconomicScenario, MarketAssumptions, ScenarioTable};
use crate::projection::ProjectionResult;

/// Applies flat economic-scenario factors to projection results
///
/// # Example
/// ```ignore
/// let adjuster = ScenarioAdjuster::default();
/// let crisis = adjuster.apply("crise", &result);
/// for (scenario, adjusted) in adjuster.apply_all(&result) {
///     println!("{}: {:.2}", scenario.name, adjusted.final_balance);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioAdjuster {
    table: ScenarioTable,
}

impl ScenarioAdjuster {
    pub fn new(table: ScenarioTable) -> Self {
        Self { table }
    }

    /// Adjuster using the scenario table of `assumptions`
    pub fn from_assumptions(assumptions: &MarketAssumptions) -> Self {
        Self::new(assumptions.scenarios.clone())
    }

    pub fn table(&self) -> &ScenarioTable {
        &self.table
    }

    /// Rescale final balance, earnings and dividends by the named scenario
    ///
    /// Unknown names leave the result unchanged.
    pub fn apply(&self, scenario: &str, result: &ProjectionResult) -> ProjectionResult {
        match self.table.get(scenario) {
            Some(s) => scale(result, s.factor),
            None => {
                debug!("Unknown scenario '{}', result left unchanged", scenario);
                result.clone()
            }
        }
    }

    /// The result under every scenario, in table order
    pub fn apply_all<'a>(
        &'a self,
        result: &ProjectionResult,
    ) -> Vec<(&'a EconomicScenario, ProjectionResult)> {
        self.table
            .iter()
            .map(|s| (s, scale(result, s.factor)))
            .collect()
    }
}

fn scale(result: &ProjectionResult, factor: f64) -> ProjectionResult {
    let mut adjusted = result.clone();
    adjusted.final_balance *= factor;
    adjusted.earnings *= factor;
    adjusted.dividends = adjusted.dividends.map(|d| d * factor);
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{RateSpec, TaxClass, YieldEstimates};
    use crate::catalog::AssetClass;
    use crate::projection::{Instrument, ProjectionConfig, ProjectionEngine};
    use chrono::NaiveDate;

    fn config() -> ProjectionConfig {
        ProjectionConfig::monthly(
            1000.0,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2029, 1, 1).unwrap(),
        )
    }

    fn selic_result() -> ProjectionResult {
        ProjectionEngine::new(MarketAssumptions::default_reference()).project(
            &config(),
            &Instrument::FixedIncome {
                rate: RateSpec::annual(0.1175),
                tax_class: TaxClass::Exempt,
            },
        )
    }

    #[test]
    fn test_neutral_scenario_is_identity() {
        let result = selic_result();
        assert_eq!(ScenarioAdjuster::default().apply("neutro", &result), result);
    }

    #[test]
    fn test_crisis_scales_balance() {
        let result = selic_result();
        let adjusted = ScenarioAdjuster::default().apply("crise", &result);
        assert_eq!(adjusted.final_balance, result.final_balance * 0.6);
        assert_eq!(adjusted.earnings, result.earnings * 0.6);
        assert_eq!(adjusted.total_contributed, result.total_contributed);
        assert_eq!(adjusted.history, result.history);
    }

    #[test]
    fn test_dividends_are_scaled() {
        let result = ProjectionEngine::new(MarketAssumptions::default_reference()).project(
            &config(),
            &Instrument::VariableIncome {
                class: AssetClass::RealEstateFund,
                estimates: YieldEstimates {
                    dividend_yield: 0.075,
                    annual_return: 0.12,
                },
            },
        );
        let adjusted = ScenarioAdjuster::default().apply("otimista", &result);
        assert_eq!(adjusted.dividends, result.dividends.map(|d| d * 1.2));
    }

    #[test]
    fn test_unknown_scenario_passes_through() {
        let result = selic_result();
        assert_eq!(ScenarioAdjuster::default().apply("hyperinflation", &result), result);
    }

    #[test]
    fn test_apply_all_in_table_order() {
        let result = selic_result();
        let adjuster = ScenarioAdjuster::default();
        let all = adjuster.apply_all(&result);

        let names: Vec<&str> = all.iter().map(|(s, _)| s.name.as_str()).collect();
        assert_eq!(names, vec!["otimista", "neutro", "pessimista", "crise"]);
        assert!(all[0].1.final_balance > all[3].1.final_balance);
    }
}
