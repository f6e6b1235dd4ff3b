//! Session-scoped asset catalog
//!
//! Static reference entries are seeded at construction. Successful lookups
//! are layered on top and kept for the lifetime of the catalog; a fetched
//! entry shadows a default with the same ticker. One catalog belongs to one
//! session and is never shared.

use std::collections::BTreeMap;

use log::debug;

use super::data::{
    default_real_estate_funds, default_stocks, default_treasury_bonds, AssetCatalogEntry, AssetClass,
    BondEntry,
};
use super::lookup::LookupOutcome;

/// Defaults plus fetched overlay, per asset class
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    real_estate_funds: BTreeMap<String, AssetCatalogEntry>,
    stocks: BTreeMap<String, AssetCatalogEntry>,
    treasury: BTreeMap<String, BondEntry>,

    fetched_funds: BTreeMap<String, AssetCatalogEntry>,
    fetched_stocks: BTreeMap<String, AssetCatalogEntry>,
    fetched_treasury: BTreeMap<String, BondEntry>,

    /// Statistics
    pub cache_hits: u64,
    pub cache_misses: u64,
}

/// Map key for a fund or stock ticker
fn ticker_key(ticker: &str) -> String {
    ticker.trim().to_ascii_uppercase()
}

impl AssetCatalog {
    /// Catalog seeded with the reference funds, stocks and bonds
    pub fn seeded() -> Self {
        Self::from_entries(
            default_real_estate_funds(),
            default_stocks(),
            default_treasury_bonds(),
        )
    }

    /// Catalog seeded with the given defaults
    pub fn from_entries(
        funds: Vec<AssetCatalogEntry>,
        stocks: Vec<AssetCatalogEntry>,
        bonds: Vec<BondEntry>,
    ) -> Self {
        Self {
            real_estate_funds: funds.into_iter().map(|e| (ticker_key(&e.ticker), e)).collect(),
            stocks: stocks.into_iter().map(|e| (ticker_key(&e.ticker), e)).collect(),
            treasury: bonds.into_iter().map(|b| (b.name.clone(), b)).collect(),
            ..Default::default()
        }
    }

    fn defaults(&self, class: AssetClass) -> Option<&BTreeMap<String, AssetCatalogEntry>> {
        match class {
            AssetClass::RealEstateFund => Some(&self.real_estate_funds),
            AssetClass::Stock => Some(&self.stocks),
            AssetClass::Treasury => None,
        }
    }

    fn fetched(&self, class: AssetClass) -> Option<&BTreeMap<String, AssetCatalogEntry>> {
        match class {
            AssetClass::RealEstateFund => Some(&self.fetched_funds),
            AssetClass::Stock => Some(&self.fetched_stocks),
            AssetClass::Treasury => None,
        }
    }

    /// Fund or stock entry by ticker (case-insensitive), fetched entries first
    pub fn entry(&self, class: AssetClass, ticker: &str) -> Option<&AssetCatalogEntry> {
        let key = ticker_key(ticker);
        self.fetched(class)
            .and_then(|m| m.get(&key))
            .or_else(|| self.defaults(class).and_then(|m| m.get(&key)))
    }

    /// All fund or stock entries (defaults overlaid with fetched), ordered by ticker
    pub fn entries(&self, class: AssetClass) -> Vec<&AssetCatalogEntry> {
        let mut merged: BTreeMap<&str, &AssetCatalogEntry> = BTreeMap::new();
        if let Some(defaults) = self.defaults(class) {
            merged.extend(defaults.iter().map(|(k, v)| (k.as_str(), v)));
        }
        if let Some(fetched) = self.fetched(class) {
            merged.extend(fetched.iter().map(|(k, v)| (k.as_str(), v)));
        }
        merged.into_values().collect()
    }

    /// Treasury bond by name, fetched entries first
    pub fn bond(&self, name: &str) -> Option<&BondEntry> {
        self.fetched_treasury
            .get(name)
            .or_else(|| self.treasury.get(name))
    }

    /// All treasury bonds, ordered by name
    pub fn bonds(&self) -> Vec<&BondEntry> {
        let mut merged: BTreeMap<&str, &BondEntry> =
            self.treasury.iter().map(|(k, v)| (k.as_str(), v)).collect();
        merged.extend(self.fetched_treasury.iter().map(|(k, v)| (k.as_str(), v)));
        merged.into_values().collect()
    }

    /// Previously fetched result for a ticker, as a lookup outcome
    ///
    /// Only the fetched overlay is consulted; static defaults never count as
    /// a cache hit.
    pub fn cached(&mut self, class: AssetClass, ticker: &str) -> Option<LookupOutcome> {
        let outcome = match class {
            AssetClass::Treasury => self.fetched_treasury.get(ticker).map(|b| LookupOutcome {
                ticker: ticker.to_string(),
                display_name: b.name.clone(),
                dividend_yield: 0.0,
                annual_return: b.annual_return,
                sector: super::lookup::UNSPECIFIED.to_string(),
                segment: super::lookup::UNSPECIFIED.to_string(),
                current_price: 0.0,
                success: true,
            }),
            _ => self
                .fetched(class)
                .and_then(|m| m.get(&ticker_key(ticker)))
                .map(|e| LookupOutcome {
                    ticker: e.ticker.clone(),
                    display_name: e.display_name.clone(),
                    dividend_yield: e.dividend_yield,
                    annual_return: e.annual_return,
                    sector: e.sector.clone().unwrap_or_else(|| super::lookup::UNSPECIFIED.to_string()),
                    segment: e.segment.clone().unwrap_or_else(|| super::lookup::UNSPECIFIED.to_string()),
                    current_price: 0.0,
                    success: true,
                }),
        };

        if outcome.is_some() {
            debug!("Catalog cache hit for {} ({})", ticker, class);
            self.cache_hits += 1;
        } else {
            debug!("Catalog cache miss for {} ({})", ticker, class);
            self.cache_misses += 1;
        }
        outcome
    }

    /// Store a successful lookup in the overlay
    ///
    /// Degraded outcomes are not cached so a later lookup can retry.
    /// Treasury lookups are recorded as inflation-linked bonds.
    pub fn insert_fetched(&mut self, class: AssetClass, outcome: &LookupOutcome) -> bool {
        if !outcome.success {
            return false;
        }

        match class {
            AssetClass::Treasury => {
                self.fetched_treasury.insert(
                    outcome.ticker.clone(),
                    BondEntry {
                        name: outcome.display_name.clone(),
                        annual_return: outcome.annual_return,
                        inflation_linked: true,
                    },
                );
            }
            AssetClass::RealEstateFund | AssetClass::Stock => {
                let key = ticker_key(&outcome.ticker);
                let entry = AssetCatalogEntry {
                    ticker: key.clone(),
                    display_name: outcome.display_name.clone(),
                    dividend_yield: outcome.dividend_yield,
                    annual_return: outcome.annual_return,
                    sector: (class == AssetClass::Stock).then(|| outcome.sector.clone()),
                    segment: (class == AssetClass::RealEstateFund).then(|| outcome.segment.clone()),
                };
                let target = if class == AssetClass::Stock {
                    &mut self.fetched_stocks
                } else {
                    &mut self.fetched_funds
                };
                target.insert(key, entry);
            }
        }
        true
    }

    /// Number of fetched entries across all classes
    pub fn fetched_len(&self) -> usize {
        self.fetched_funds.len() + self.fetched_stocks.len() + self.fetched_treasury.len()
    }

    /// Drop every fetched entry, keeping the defaults
    pub fn clear_fetched(&mut self) {
        self.fetched_funds.clear();
        self.fetched_stocks.clear();
        self.fetched_treasury.clear();
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(ticker: &str, success: bool) -> LookupOutcome {
        LookupOutcome {
            ticker: ticker.to_string(),
            display_name: format!("{ticker} Fund"),
            dividend_yield: 0.09,
            annual_return: 0.11,
            sector: "Financeiro".to_string(),
            segment: "Papel".to_string(),
            current_price: 10.0,
            success,
        }
    }

    #[test]
    fn test_seeded_catalog() {
        let catalog = AssetCatalog::seeded();
        assert_eq!(catalog.entries(AssetClass::RealEstateFund).len(), 5);
        assert_eq!(catalog.entries(AssetClass::Stock).len(), 5);
        assert_eq!(catalog.bonds().len(), 5);
        assert!(catalog.entries(AssetClass::Treasury).is_empty());
        assert!(catalog.bond("Tesouro IPCA+ 2035").unwrap().inflation_linked);
    }

    #[test]
    fn test_fetched_overlay_and_cache_hits() {
        let mut catalog = AssetCatalog::seeded();
        assert!(catalog.cached(AssetClass::RealEstateFund, "MXRF11").is_none());

        assert!(catalog.insert_fetched(AssetClass::RealEstateFund, &outcome("MXRF11", true)));
        assert_eq!(catalog.entries(AssetClass::RealEstateFund).len(), 6);

        let hit = catalog.cached(AssetClass::RealEstateFund, "MXRF11").unwrap();
        assert!(hit.success);
        assert_eq!(hit.segment, "Papel");
        assert_eq!(catalog.cache_hits, 1);
        assert_eq!(catalog.cache_misses, 1);
        assert!((catalog.hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fetched_entry_shadows_default() {
        let mut catalog = AssetCatalog::seeded();
        catalog.insert_fetched(AssetClass::Stock, &outcome("PETR4", true));
        let entry = catalog.entry(AssetClass::Stock, "PETR4").unwrap();
        assert_eq!(entry.dividend_yield, 0.09);
        assert_eq!(catalog.entries(AssetClass::Stock).len(), 5);
    }

    #[test]
    fn test_ticker_lookup_ignores_case() {
        let mut catalog = AssetCatalog::seeded();
        assert!(catalog.entry(AssetClass::RealEstateFund, " knri11 ").is_some());

        catalog.insert_fetched(AssetClass::RealEstateFund, &outcome("mxrf11", true));
        let entry = catalog.entry(AssetClass::RealEstateFund, "Mxrf11").unwrap();
        assert_eq!(entry.ticker, "MXRF11");
        assert!(catalog.cached(AssetClass::RealEstateFund, "mxrf11").is_some());
    }

    #[test]
    fn test_degraded_outcome_not_cached() {
        let mut catalog = AssetCatalog::seeded();
        assert!(!catalog.insert_fetched(AssetClass::Stock, &outcome("ZZZZ3", false)));
        assert_eq!(catalog.fetched_len(), 0);
    }

    #[test]
    fn test_treasury_fetch_is_inflation_linked() {
        let mut catalog = AssetCatalog::seeded();
        catalog.insert_fetched(AssetClass::Treasury, &outcome("IPCA2045", true));
        let bond = catalog.bond("IPCA2045").unwrap();
        assert!(bond.inflation_linked);
        assert_eq!(bond.annual_return, 0.11);

        catalog.clear_fetched();
        assert!(catalog.bond("IPCA2045").is_none());
        assert_eq!(catalog.bonds().len(), 5);
    }
}
