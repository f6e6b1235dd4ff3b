//! Income tax withheld on projected earnings
//!
//! Flat rates per instrument class, except CDB which follows the regressive
//! table by holding period:
//!
//! | Holding period | Rate  |
//! |----------------|-------|
//! | up to 6 months | 22.5% |
//! | up to 12       | 20.0% |
//! | up to 24       | 17.5% |
//! | over 24        | 15.0% |

use serde::{Deserialize, Serialize};

/// Withholding class of an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxClass {
    /// LCI/LCA and any modality without a withholding entry
    Exempt,
    /// Treasury Direct bonds
    TreasuryDirect,
    /// Real-estate fund (FII) income
    RealEstateFund,
    /// Equity capital gains
    Equity,
    /// Bank deposit certificate, regressive table
    Cdb,
}

/// Withholding rates by class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxTable {
    pub treasury_direct: f64,
    pub real_estate_fund: f64,
    pub equity: f64,

    /// (max holding months, rate) in ascending order; longer holdings use `cdb_long_term`
    pub cdb_brackets: Vec<(u32, f64)>,
    pub cdb_long_term: f64,
}

impl Default for TaxTable {
    fn default() -> Self {
        Self {
            treasury_direct: 0.15,
            real_estate_fund: 0.20,
            equity: 0.15,
            cdb_brackets: vec![(6, 0.225), (12, 0.20), (24, 0.175)],
            cdb_long_term: 0.15,
        }
    }
}

impl TaxTable {
    /// Withholding rate for a class and holding period
    pub fn rate(&self, class: TaxClass, holding_months: i32) -> f64 {
        match class {
            TaxClass::Exempt => 0.0,
            TaxClass::TreasuryDirect => self.treasury_direct,
            TaxClass::RealEstateFund => self.real_estate_fund,
            TaxClass::Equity => self.equity,
            TaxClass::Cdb => self
                .cdb_brackets
                .iter()
                .find(|(max_months, _)| holding_months <= *max_months as i32)
                .map(|(_, rate)| *rate)
                .unwrap_or(self.cdb_long_term),
        }
    }

    /// Tax due on pre-tax earnings
    ///
    /// Principal is never taxed: a loss owes nothing.
    pub fn tax(&self, class: TaxClass, earnings: f64, holding_months: i32) -> f64 {
        earnings.max(0.0) * self.rate(class, holding_months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_rates() {
        let table = TaxTable::default();
        assert_eq!(table.rate(TaxClass::Exempt, 60), 0.0);
        assert_eq!(table.rate(TaxClass::TreasuryDirect, 3), 0.15);
        assert_eq!(table.rate(TaxClass::RealEstateFund, 60), 0.20);
        assert_eq!(table.rate(TaxClass::Equity, 60), 0.15);
    }

    #[test]
    fn test_cdb_regressive_schedule() {
        let table = TaxTable::default();
        assert_eq!(table.rate(TaxClass::Cdb, 0), 0.225);
        assert_eq!(table.rate(TaxClass::Cdb, 6), 0.225);
        assert_eq!(table.rate(TaxClass::Cdb, 7), 0.20);
        assert_eq!(table.rate(TaxClass::Cdb, 12), 0.20);
        assert_eq!(table.rate(TaxClass::Cdb, 24), 0.175);
        assert_eq!(table.rate(TaxClass::Cdb, 25), 0.15);
        assert_eq!(table.rate(TaxClass::Cdb, 120), 0.15);
    }

    #[test]
    fn test_tax_on_earnings() {
        let table = TaxTable::default();
        assert!((table.tax(TaxClass::Cdb, 10_000.0, 60) - 1_500.0).abs() < 1e-9);
        assert_eq!(table.tax(TaxClass::Exempt, 10_000.0, 60), 0.0);
    }

    #[test]
    fn test_no_tax_on_losses() {
        let table = TaxTable::default();
        assert_eq!(table.tax(TaxClass::Equity, -2_000.0, 60), 0.0);
    }
}
