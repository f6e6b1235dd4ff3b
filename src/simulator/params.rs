//! Simulation inputs: modalities and the parameter set saved with a portfolio

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assumptions::NEUTRAL_SCENARIO;
use crate::error::{ProjectionError, Result};
use crate::projection::{ProjectionConfig, Withdrawal};
use crate::schedule::Frequency;

/// Bond projected when the treasury modality names none
pub const DEFAULT_TREASURY_BOND: &str = "Tesouro Selic";

/// One selectable simulation line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Treasury Selic through the fixed-income path
    Selic,
    /// Bank deposit certificate at a flat monthly rate
    Cdb,
    /// Real-estate fund basket
    Fii,
    /// Equity basket
    Stocks,
    /// A named Treasury Direct bond
    Treasury,
}

impl Modality {
    pub fn all() -> [Modality; 5] {
        [
            Modality::Selic,
            Modality::Cdb,
            Modality::Fii,
            Modality::Stocks,
            Modality::Treasury,
        ]
    }

    /// Key used in exports and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Modality::Selic => "selic",
            Modality::Cdb => "cdb",
            Modality::Fii => "fii",
            Modality::Stocks => "stocks",
            Modality::Treasury => "treasury",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Modality::Selic => "Tesouro Selic",
            Modality::Cdb => "CDB",
            Modality::Fii => "FIIs",
            Modality::Stocks => "Ações",
            Modality::Treasury => "Tesouro",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Modality {
    type Err = ProjectionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selic" => Ok(Modality::Selic),
            "cdb" => Ok(Modality::Cdb),
            "fii" | "fiis" => Ok(Modality::Fii),
            "stocks" | "stock" | "acoes" => Ok(Modality::Stocks),
            "treasury" | "tesouro" => Ok(Modality::Treasury),
            other => Err(ProjectionError::UnknownModality(other.to_string())),
        }
    }
}

fn default_frequency() -> Frequency {
    Frequency::Monthly
}

fn default_scenario() -> String {
    NEUTRAL_SCENARIO.to_string()
}

fn default_modalities() -> Vec<Modality> {
    Modality::all().to_vec()
}

/// Everything needed to run a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Amount deposited at each contribution
    pub monthly_investment: f64,

    #[serde(default = "default_frequency")]
    pub frequency: Frequency,

    pub start: NaiveDate,
    pub end: NaiveDate,

    #[serde(default = "default_modalities")]
    pub modalities: Vec<Modality>,

    /// Also run the inflation-deflated twin of every modality
    #[serde(default)]
    pub include_inflation: bool,

    #[serde(default)]
    pub include_taxes: bool,

    /// Economic scenario applied to every result
    #[serde(default = "default_scenario")]
    pub scenario: String,

    #[serde(default)]
    pub financial_goal: f64,

    /// FII tickers averaged for the FII modality; empty uses class defaults
    #[serde(default)]
    pub selected_funds: Vec<String>,

    /// Stock tickers averaged for the stocks modality; empty uses class defaults
    #[serde(default)]
    pub selected_stocks: Vec<String>,

    /// Bond for the treasury modality, [`DEFAULT_TREASURY_BOND`] when absent
    #[serde(default)]
    pub treasury_bond: Option<String>,

    #[serde(default)]
    pub withdrawal: Option<Withdrawal>,
}

impl SimulationParams {
    /// Monthly contributions into every modality, neutral scenario, no goal
    pub fn new(monthly_investment: f64, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            monthly_investment,
            frequency: Frequency::Monthly,
            start,
            end,
            modalities: default_modalities(),
            include_inflation: false,
            include_taxes: false,
            scenario: default_scenario(),
            financial_goal: 0.0,
            selected_funds: Vec::new(),
            selected_stocks: Vec::new(),
            treasury_bond: None,
            withdrawal: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(ProjectionError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        if let Some(w) = &self.withdrawal {
            if w.date < self.start || w.date > self.end {
                return Err(ProjectionError::InvalidWithdrawalDate {
                    date: w.date,
                    start: self.start,
                    end: self.end,
                });
            }
        }
        Ok(())
    }

    /// Projection config for the nominal or real run
    pub fn projection_config(&self, include_inflation: bool) -> ProjectionConfig {
        ProjectionConfig {
            amount: self.monthly_investment,
            frequency: self.frequency,
            start: self.start,
            end: self.end,
            include_inflation,
            include_taxes: self.include_taxes,
        }
    }

    pub fn treasury_bond_name(&self) -> &str {
        self.treasury_bond.as_deref().unwrap_or(DEFAULT_TREASURY_BOND)
    }
}
