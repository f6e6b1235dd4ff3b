//! Market assumptions: reference rates, inflation, taxes, fees and scenarios

mod fees;
mod rates;
mod scenarios;
mod tax;

pub use fees::FeeSchedule;
pub use rates::{
    monthly_inflation, monthly_rate, real_monthly_dividend, real_monthly_rate, RateQuote, RateSpec,
};
pub use scenarios::{EconomicScenario, ScenarioTable, NEUTRAL_SCENARIO};
pub use tax::{TaxClass, TaxTable};

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Dividend yield and appreciation used when no specific asset is selected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldEstimates {
    pub dividend_yield: f64,
    pub annual_return: f64,
}

/// Container for all projection assumptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAssumptions {
    /// Selic reference rate (annual)
    pub selic_annual: f64,

    /// CDB yield, quoted flat per month
    pub cdb_monthly: f64,

    /// IPCA inflation (annual)
    pub inflation_annual: f64,

    /// Treasury rate used when the selected bond is unknown
    pub treasury_fallback_annual: f64,

    /// Class-level averages for real-estate funds
    pub fii_defaults: YieldEstimates,

    /// Class-level averages for equities
    pub stock_defaults: YieldEstimates,

    pub taxes: TaxTable,
    pub fees: FeeSchedule,
    pub scenarios: ScenarioTable,
}

impl MarketAssumptions {
    /// Reference values the simulator ships with
    pub fn default_reference() -> Self {
        Self {
            selic_annual: 0.1175,
            cdb_monthly: 0.01,
            inflation_annual: 0.045,
            treasury_fallback_annual: 0.10,
            fii_defaults: YieldEstimates {
                dividend_yield: 0.075,
                annual_return: 0.12,
            },
            stock_defaults: YieldEstimates {
                dividend_yield: 0.062,
                annual_return: 0.13,
            },
            taxes: TaxTable::default(),
            fees: FeeSchedule::default(),
            scenarios: ScenarioTable::default(),
        }
    }

    /// Load assumptions from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Load from any JSON reader
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Selic as a `RateSpec`
    pub fn selic(&self) -> RateSpec {
        RateSpec::annual(self.selic_annual)
    }

    /// CDB as a `RateSpec`
    pub fn cdb(&self) -> RateSpec {
        RateSpec::monthly(self.cdb_monthly)
    }
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self::default_reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        let a = MarketAssumptions::default_reference();
        assert_eq!(a.selic_annual, 0.1175);
        assert_eq!(a.cdb().nominal_monthly(), 0.01);
        assert_eq!(a.inflation_annual, 0.045);
    }

    #[test]
    fn test_json_round_trip_overrides() {
        let mut a = MarketAssumptions::default_reference();
        a.selic_annual = 0.105;
        let json = serde_json::to_string(&a).unwrap();

        let loaded = MarketAssumptions::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(loaded.selic_annual, 0.105);
        assert_eq!(loaded.scenarios.factor("crise"), Some(0.6));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(MarketAssumptions::from_json_reader("{ not json".as_bytes()).is_err());
    }
}
