//! External asset lookup and its fail-soft wrapper
//!
//! The lookup is the only slow or fallible call in a projection. Whatever the
//! provider does, [`lookup_with_fallback`] always hands back usable figures:
//! clamped estimates on success, class defaults with `success = false`
//! otherwise.

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::data::{clamp_annual_return, clamp_dividend_yield, AssetClass};
use crate::error::{ProjectionError, Result};

/// Exchange suffix appended to local tickers
pub const EXCHANGE_SUFFIX: &str = ".SA";

/// Label used when the provider has no sector/segment
pub const UNSPECIFIED: &str = "Não especificado";

/// Raw figures returned by a data provider; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    pub display_name: Option<String>,
    pub dividend_yield: Option<f64>,
    pub annual_return: Option<f64>,
    pub sector: Option<String>,
    pub segment: Option<String>,
    pub current_price: Option<f64>,
}

/// Normalized lookup result handed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupOutcome {
    pub ticker: String,
    pub display_name: String,
    pub dividend_yield: f64,
    pub annual_return: f64,
    pub sector: String,
    pub segment: String,
    pub current_price: f64,

    /// False when defaults were substituted for missing or failed data
    pub success: bool,
}

/// Capability to fetch yield/return estimates for a ticker
pub trait AssetLookup {
    /// Fetch figures for an exchange symbol (ticker plus [`EXCHANGE_SUFFIX`])
    fn lookup(&self, symbol: &str, class: AssetClass) -> Result<AssetQuote>;
}

impl<T: AssetLookup + ?Sized> AssetLookup for &T {
    fn lookup(&self, symbol: &str, class: AssetClass) -> Result<AssetQuote> {
        (**self).lookup(symbol, class)
    }
}

impl<T: AssetLookup + ?Sized> AssetLookup for Box<T> {
    fn lookup(&self, symbol: &str, class: AssetClass) -> Result<AssetQuote> {
        (**self).lookup(symbol, class)
    }
}

/// Dividend yield and annual return substituted when a lookup fails
pub fn fallback_estimates(class: AssetClass) -> (f64, f64) {
    match class {
        AssetClass::Stock => (0.065, 0.12),
        AssetClass::RealEstateFund | AssetClass::Treasury => (0.075, 0.10),
    }
}

/// Exchange symbol for a local ticker
pub fn exchange_symbol(ticker: &str) -> String {
    format!("{}{}", ticker.trim().to_ascii_uppercase(), EXCHANGE_SUFFIX)
}

/// Query `provider` and never fail
///
/// Incomplete quotes keep whatever the provider did return, fill the gaps
/// from the class defaults and are flagged `success = false`.
pub fn lookup_with_fallback<L: AssetLookup + ?Sized>(
    provider: &L,
    ticker: &str,
    class: AssetClass,
) -> LookupOutcome {
    let (default_yield, default_return) = fallback_estimates(class);
    let symbol = exchange_symbol(ticker);

    match provider.lookup(&symbol, class) {
        Ok(quote) => {
            let complete = quote.dividend_yield.is_some() && quote.annual_return.is_some();
            if !complete {
                warn!("Incomplete data for {} ({}), filling with defaults", symbol, class);
            } else {
                debug!("Lookup succeeded for {} ({})", symbol, class);
            }

            LookupOutcome {
                ticker: ticker.to_string(),
                display_name: quote.display_name.unwrap_or_else(|| ticker.to_string()),
                dividend_yield: clamp_dividend_yield(quote.dividend_yield.unwrap_or(default_yield)),
                annual_return: clamp_annual_return(quote.annual_return.unwrap_or(default_return)),
                sector: quote.sector.unwrap_or_else(|| UNSPECIFIED.to_string()),
                segment: quote.segment.unwrap_or_else(|| UNSPECIFIED.to_string()),
                current_price: quote.current_price.unwrap_or(0.0),
                success: complete,
            }
        }
        Err(e) => {
            warn!("Lookup failed for {} ({}): {}; using defaults", symbol, class, e);
            LookupOutcome {
                ticker: ticker.to_string(),
                display_name: ticker.to_string(),
                dividend_yield: default_yield,
                annual_return: default_return,
                sector: UNSPECIFIED.to_string(),
                segment: UNSPECIFIED.to_string(),
                current_price: 0.0,
                success: false,
            }
        }
    }
}

/// Provider with no data source; every lookup fails
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLookup;

impl AssetLookup for OfflineLookup {
    fn lookup(&self, symbol: &str, class: AssetClass) -> Result<AssetQuote> {
        Err(ProjectionError::Lookup {
            ticker: symbol.to_string(),
            class,
            reason: "no market data source configured".to_string(),
        })
    }
}

/// In-memory provider keyed by exchange symbol
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    quotes: HashMap<String, AssetQuote>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a quote for a local ticker
    pub fn with_quote(mut self, ticker: &str, quote: AssetQuote) -> Self {
        self.quotes.insert(exchange_symbol(ticker), quote);
        self
    }
}

impl AssetLookup for StaticLookup {
    fn lookup(&self, symbol: &str, class: AssetClass) -> Result<AssetQuote> {
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProjectionError::Lookup {
                ticker: symbol.to_string(),
                class,
                reason: "symbol not found".to_string(),
            })
    }
}
