//! Rate conversions: annual to effective monthly, and nominal to real

use serde::{Deserialize, Serialize};

/// How an instrument quotes its return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RateQuote {
    /// Effective annual rate, converted geometrically to monthly
    Annual(f64),
    /// Flat monthly rate, used as-is
    Monthly(f64),
}

/// Return assumption of an instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSpec {
    pub quote: RateQuote,

    /// Already indexed to inflation (never deflated a second time)
    pub inflation_linked: bool,
}

impl RateSpec {
    pub fn annual(rate: f64) -> Self {
        Self {
            quote: RateQuote::Annual(rate),
            inflation_linked: false,
        }
    }

    pub fn monthly(rate: f64) -> Self {
        Self {
            quote: RateQuote::Monthly(rate),
            inflation_linked: false,
        }
    }

    pub fn inflation_linked(mut self, linked: bool) -> Self {
        self.inflation_linked = linked;
        self
    }

    /// Nominal effective monthly rate
    pub fn nominal_monthly(&self) -> f64 {
        match self.quote {
            RateQuote::Annual(rate) => monthly_rate(rate),
            RateQuote::Monthly(rate) => rate,
        }
    }

    /// Monthly rate used for compounding
    ///
    /// Deflated by `annual_inflation` when requested, unless the instrument
    /// is inflation-linked.
    pub fn effective_monthly(&self, include_inflation: bool, annual_inflation: f64) -> f64 {
        let nominal = self.nominal_monthly();
        if include_inflation && !self.inflation_linked {
            real_monthly_rate(nominal, annual_inflation)
        } else {
            nominal
        }
    }
}

/// (1 + annual)^(1/12) - 1
pub fn monthly_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

/// Monthly inflation implied by an annual figure
pub fn monthly_inflation(annual_inflation: f64) -> f64 {
    monthly_rate(annual_inflation)
}

/// Fisher adjustment of a nominal monthly rate
pub fn real_monthly_rate(nominal_monthly: f64, annual_inflation: f64) -> f64 {
    (1.0 + nominal_monthly) / (1.0 + monthly_inflation(annual_inflation)) - 1.0
}

/// Deflate a monthly dividend rate (divided, not Fisher-adjusted)
pub fn real_monthly_dividend(nominal_monthly_dividend: f64, annual_inflation: f64) -> f64 {
    nominal_monthly_dividend / (1.0 + monthly_inflation(annual_inflation))
}
