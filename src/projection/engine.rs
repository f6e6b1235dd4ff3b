//! Core projection engine: compounds each contribution to the end of the horizon

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use super::result::{HistoryFlow, HistoryPoint, InstrumentDetails, ProjectionResult, WithdrawalOutcome};
use crate::assumptions::{
    monthly_rate, real_monthly_dividend, real_monthly_rate, MarketAssumptions, RateSpec, TaxClass,
    YieldEstimates,
};
use crate::catalog::{AssetCatalogEntry, AssetClass, BondEntry};
use crate::schedule::{horizon_months, schedule, Contribution, Frequency};

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Amount deposited at each contribution
    pub amount: f64,

    pub frequency: Frequency,
    pub start: NaiveDate,
    pub end: NaiveDate,

    /// Deflate returns by the assumed inflation
    #[serde(default)]
    pub include_inflation: bool,

    /// Withhold income tax on earnings
    #[serde(default)]
    pub include_taxes: bool,
}

impl ProjectionConfig {
    pub fn monthly(amount: f64, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            amount,
            frequency: Frequency::Monthly,
            start,
            end,
            include_inflation: false,
            include_taxes: false,
        }
    }

    pub fn with_inflation(mut self, include: bool) -> Self {
        self.include_inflation = include;
        self
    }

    pub fn with_taxes(mut self, include: bool) -> Self {
        self.include_taxes = include;
        self
    }

    /// Same parameters, ending on a different date
    pub fn ending(&self, end: NaiveDate) -> Self {
        Self { end, ..self.clone() }
    }
}

/// What is being projected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instrument {
    /// Deposit-like instrument with a fixed rate
    FixedIncome { rate: RateSpec, tax_class: TaxClass },

    /// Treasury Direct bond; `None` uses the fallback rate, not indexed
    TreasuryBond { bond: Option<BondEntry> },

    /// Real-estate fund or equity basket
    VariableIncome {
        class: AssetClass,
        estimates: YieldEstimates,
    },
}

/// A partial withdrawal request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub amount: f64,
    pub date: NaiveDate,
}

/// Unweighted mean of the selected entries, or `fallback` when none are given
pub fn average_estimates(entries: &[&AssetCatalogEntry], fallback: YieldEstimates) -> YieldEstimates {
    if entries.is_empty() {
        return fallback;
    }
    let n = entries.len() as f64;
    YieldEstimates {
        dividend_yield: entries.iter().map(|e| e.dividend_yield).sum::<f64>() / n,
        annual_return: entries.iter().map(|e| e.annual_return).sum::<f64>() / n,
    }
}

/// Tax class for a variable-income asset class
pub fn variable_income_tax_class(class: AssetClass) -> TaxClass {
    match class {
        AssetClass::RealEstateFund => TaxClass::RealEstateFund,
        AssetClass::Stock => TaxClass::Equity,
        AssetClass::Treasury => TaxClass::TreasuryDirect,
    }
}

/// Main projection engine
///
/// Stateless apart from the assumptions it was built with; every method is a
/// pure function of its inputs.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: MarketAssumptions,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions
    pub fn new(assumptions: MarketAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &MarketAssumptions {
        &self.assumptions
    }

    /// Run the projection matching `instrument`
    pub fn project(&self, config: &ProjectionConfig, instrument: &Instrument) -> ProjectionResult {
        match instrument {
            Instrument::FixedIncome { rate, tax_class } => {
                self.project_fixed_income(config, *rate, *tax_class)
            }
            Instrument::TreasuryBond { bond } => self.project_bond(config, bond.as_ref()),
            Instrument::VariableIncome { class, estimates } => {
                self.project_variable_income(config, *class, *estimates)
            }
        }
    }

    /// Fixed-rate instrument (Selic, CDB, ...)
    pub fn project_fixed_income(
        &self,
        config: &ProjectionConfig,
        rate: RateSpec,
        tax_class: TaxClass,
    ) -> ProjectionResult {
        let monthly = rate.effective_monthly(config.include_inflation, self.assumptions.inflation_annual);
        self.compound_fixed(config, monthly, tax_class, InstrumentDetails::FixedIncome)
    }

    /// Treasury Direct bond
    ///
    /// Inflation-linked bonds are never deflated again.
    pub fn project_bond(&self, config: &ProjectionConfig, bond: Option<&BondEntry>) -> ProjectionResult {
        let (rate, details) = match bond {
            Some(b) => (
                RateSpec::annual(b.annual_return).inflation_linked(b.inflation_linked),
                InstrumentDetails::GovernmentBond {
                    bond_name: Some(b.name.clone()),
                    inflation_linked: b.inflation_linked,
                },
            ),
            None => (
                RateSpec::annual(self.assumptions.treasury_fallback_annual),
                InstrumentDetails::GovernmentBond {
                    bond_name: None,
                    inflation_linked: false,
                },
            ),
        };

        let monthly = rate.effective_monthly(config.include_inflation, self.assumptions.inflation_annual);
        self.compound_fixed(config, monthly, TaxClass::TreasuryDirect, details)
    }

    /// Real-estate fund or equity basket
    ///
    /// Capital compounds at the monthly appreciation rate; dividends accrue
    /// simply (amount * monthly dividend * remaining months) and are not
    /// reinvested.
    pub fn project_variable_income(
        &self,
        config: &ProjectionConfig,
        class: AssetClass,
        estimates: YieldEstimates,
    ) -> ProjectionResult {
        let months = horizon_months(config.start, config.end);
        let inflation = self.assumptions.inflation_annual;

        let mut monthly_appreciation = monthly_rate(estimates.annual_return);
        let mut monthly_dividend = estimates.dividend_yield / 12.0;
        if config.include_inflation {
            monthly_appreciation = real_monthly_rate(monthly_appreciation, inflation);
            monthly_dividend = real_monthly_dividend(monthly_dividend, inflation);
        }

        let contributions = schedule(config.amount, config.frequency, config.start, config.end);
        let total_contributed = total_of(&contributions);

        let mut capital = 0.0;
        let mut dividends = 0.0;
        let mut history = Vec::with_capacity(contributions.len());

        for contribution in &contributions {
            let remaining = months - contribution.elapsed_months as i32;
            if remaining > 0 {
                capital += contribution.amount * (1.0 + monthly_appreciation).powi(remaining);
                dividends += contribution.amount * monthly_dividend * remaining as f64;
            }
            history.push(HistoryPoint {
                date: contribution.date,
                balance: capital + dividends,
                flow: HistoryFlow::Dividends(dividends),
            });
        }

        let gross_balance = capital + dividends;
        let (final_balance, earnings, taxes) = self.net_of_taxes(
            config,
            gross_balance,
            total_contributed,
            variable_income_tax_class(class),
            months,
        );

        debug!(
            "{} projection: {} contributions over {} months, final {:.2}",
            class,
            contributions.len(),
            months,
            final_balance
        );

        ProjectionResult {
            final_balance,
            total_contributed,
            earnings,
            taxes,
            dividends: Some(dividends),
            earnings_percentage: ProjectionResult::percentage_of(earnings, total_contributed),
            monthly_rate: monthly_appreciation + monthly_dividend,
            horizon_months: months,
            history,
            details: InstrumentDetails::VariableIncome {
                class,
                dividend_yield: estimates.dividend_yield,
                annual_return: estimates.annual_return,
                monthly_appreciation,
                monthly_dividend,
            },
            withdrawal: None,
        }
    }

    /// Project up to the withdrawal date, withdraw, then keep compounding to the end
    ///
    /// The remainder compounds at the first phase's monthly rate for the
    /// calendar months left between the withdrawal date and the end date.
    pub fn project_with_withdrawal(
        &self,
        config: &ProjectionConfig,
        instrument: &Instrument,
        withdrawal: Withdrawal,
    ) -> ProjectionResult {
        let months = horizon_months(config.start, config.end);
        let withdrawal_months = horizon_months(config.start, withdrawal.date);

        let mut result = self.project(&config.ending(withdrawal.date), instrument);

        let balance_after_withdrawal = (result.final_balance - withdrawal.amount).max(0.0);
        let remaining = months - withdrawal_months;
        let final_balance = if remaining > 0 {
            balance_after_withdrawal * (1.0 + result.monthly_rate).powi(remaining)
        } else {
            balance_after_withdrawal
        };

        debug!(
            "Withdrawal of {:.2} on {}: {:.2} left, {} months to compound",
            withdrawal.amount, withdrawal.date, balance_after_withdrawal, remaining
        );

        result.final_balance = final_balance;
        result.withdrawal = Some(WithdrawalOutcome {
            date: withdrawal.date,
            amount: withdrawal.amount,
            balance_after_withdrawal,
        });
        result
    }

    /// Shared compounding loop for fixed income and bonds
    fn compound_fixed(
        &self,
        config: &ProjectionConfig,
        monthly_rate: f64,
        tax_class: TaxClass,
        details: InstrumentDetails,
    ) -> ProjectionResult {
        let months = horizon_months(config.start, config.end);
        let contributions = schedule(config.amount, config.frequency, config.start, config.end);
        let total_contributed = total_of(&contributions);

        let mut balance = 0.0;
        let mut history = Vec::with_capacity(contributions.len());

        for contribution in &contributions {
            // Contributions at or past the horizon are counted but not compounded
            let remaining = months - contribution.elapsed_months as i32;
            if remaining > 0 {
                balance += contribution.amount * (1.0 + monthly_rate).powi(remaining);
            }
            history.push(HistoryPoint {
                date: contribution.date,
                balance,
                flow: HistoryFlow::Contribution(contribution.amount),
            });
        }

        let (final_balance, earnings, taxes) =
            self.net_of_taxes(config, balance, total_contributed, tax_class, months);

        ProjectionResult {
            final_balance,
            total_contributed,
            earnings,
            taxes,
            dividends: None,
            earnings_percentage: ProjectionResult::percentage_of(earnings, total_contributed),
            monthly_rate,
            horizon_months: months,
            history,
            details,
            withdrawal: None,
        }
    }

    /// (final balance, earnings, taxes) after optional withholding
    fn net_of_taxes(
        &self,
        config: &ProjectionConfig,
        gross_balance: f64,
        total_contributed: f64,
        tax_class: TaxClass,
        months: i32,
    ) -> (f64, f64, f64) {
        let gross_earnings = gross_balance - total_contributed;
        let taxes = if config.include_taxes {
            self.assumptions.taxes.tax(tax_class, gross_earnings, months)
        } else {
            0.0
        };
        (gross_balance - taxes, gross_earnings - taxes, taxes)
    }
}

fn total_of(contributions: &[Contribution]) -> f64 {
    contributions.iter().map(|c| c.amount).sum()
}
