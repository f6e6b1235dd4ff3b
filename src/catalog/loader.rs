//! Load catalog defaults from CSV
//!
//! Asset files carry `ticker,name,dividend_yield,annual_return,sector,segment`;
//! bond files carry `name,annual_return,inflation_linked`.

use std::fs::File;
use std::path::Path;

use csv::Reader;
use serde::Deserialize;

use super::data::{AssetCatalogEntry, BondEntry, ANNUAL_RETURN_BOUNDS, DIVIDEND_YIELD_BOUNDS};
use super::store::AssetCatalog;
use crate::error::{ProjectionError, Result};

/// Default directory holding catalog CSV files
pub const DEFAULT_CATALOG_PATH: &str = "data/catalog";

/// Raw CSV row for a fund or stock
#[derive(Debug, Deserialize)]
struct AssetRow {
    ticker: String,
    name: String,
    dividend_yield: f64,
    annual_return: f64,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    segment: Option<String>,
}

impl AssetRow {
    fn into_entry(self) -> Result<AssetCatalogEntry> {
        let in_range = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;

        if !in_range(self.dividend_yield, DIVIDEND_YIELD_BOUNDS) {
            return Err(ProjectionError::InvalidCatalogEntry {
                ticker: self.ticker,
                reason: format!("dividend_yield {} outside {:?}", self.dividend_yield, DIVIDEND_YIELD_BOUNDS),
            });
        }
        if !in_range(self.annual_return, ANNUAL_RETURN_BOUNDS) {
            return Err(ProjectionError::InvalidCatalogEntry {
                ticker: self.ticker,
                reason: format!("annual_return {} outside {:?}", self.annual_return, ANNUAL_RETURN_BOUNDS),
            });
        }

        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Ok(AssetCatalogEntry {
            ticker: self.ticker,
            display_name: self.name,
            dividend_yield: self.dividend_yield,
            annual_return: self.annual_return,
            sector: non_empty(self.sector),
            segment: non_empty(self.segment),
        })
    }
}

/// Raw CSV row for a treasury bond
#[derive(Debug, Deserialize)]
struct BondRow {
    name: String,
    annual_return: f64,
    inflation_linked: bool,
}

/// Load fund/stock entries from any reader
pub fn load_assets_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<AssetCatalogEntry>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut entries = Vec::new();

    for row in csv_reader.deserialize() {
        let row: AssetRow = row?;
        entries.push(row.into_entry()?);
    }

    Ok(entries)
}

/// Load treasury bonds from any reader
pub fn load_bonds_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<BondEntry>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut bonds = Vec::new();

    for row in csv_reader.deserialize() {
        let row: BondRow = row?;
        bonds.push(BondEntry {
            name: row.name,
            annual_return: row.annual_return,
            inflation_linked: row.inflation_linked,
        });
    }

    Ok(bonds)
}

/// Load a full catalog from `fii.csv`, `stocks.csv` and `treasury.csv` in `dir`
pub fn load_catalog(dir: &Path) -> Result<AssetCatalog> {
    let funds = load_assets_from_reader(File::open(dir.join("fii.csv"))?)?;
    let stocks = load_assets_from_reader(File::open(dir.join("stocks.csv"))?)?;
    let bonds = load_bonds_from_reader(File::open(dir.join("treasury.csv"))?)?;

    Ok(AssetCatalog::from_entries(funds, stocks, bonds))
}
