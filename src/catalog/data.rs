//! Asset catalog records and the static reference data

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Lower/upper bound accepted for a dividend yield
pub const DIVIDEND_YIELD_BOUNDS: (f64, f64) = (0.01, 0.20);

/// Lower/upper bound accepted for a historical annual return
pub const ANNUAL_RETURN_BOUNDS: (f64, f64) = (0.05, 0.30);

/// Class of a catalogued asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// Real-estate investment fund (FII)
    #[serde(rename = "fii")]
    RealEstateFund,
    /// Listed equity
    #[serde(rename = "stocks")]
    Stock,
    /// Treasury Direct bond
    Treasury,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::RealEstateFund => "fii",
            AssetClass::Stock => "stocks",
            AssetClass::Treasury => "treasury",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fii" | "fiis" | "real_estate_fund" => Ok(AssetClass::RealEstateFund),
            "stocks" | "stock" | "acoes" | "equity" => Ok(AssetClass::Stock),
            "treasury" | "tesouro" => Ok(AssetClass::Treasury),
            other => Err(ProjectionError::UnknownAssetClass(other.to_string())),
        }
    }
}

/// A real-estate fund or equity with its yield/return estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCatalogEntry {
    pub ticker: String,
    pub display_name: String,

    /// Annual dividend yield, within [`DIVIDEND_YIELD_BOUNDS`]
    pub dividend_yield: f64,

    /// Annualized historical return, within [`ANNUAL_RETURN_BOUNDS`]
    pub annual_return: f64,

    /// Sector (equities)
    pub sector: Option<String>,

    /// Segment (real-estate funds)
    pub segment: Option<String>,
}

impl AssetCatalogEntry {
    fn new(
        ticker: &str,
        display_name: &str,
        dividend_yield: f64,
        annual_return: f64,
        sector: Option<&str>,
        segment: Option<&str>,
    ) -> Self {
        Self {
            ticker: ticker.to_string(),
            display_name: display_name.to_string(),
            dividend_yield,
            annual_return,
            sector: sector.map(str::to_string),
            segment: segment.map(str::to_string),
        }
    }
}

/// A Treasury Direct bond
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondEntry {
    pub name: String,
    pub annual_return: f64,

    /// Return already indexed to IPCA
    pub inflation_linked: bool,
}

impl BondEntry {
    pub fn new(name: &str, annual_return: f64, inflation_linked: bool) -> Self {
        Self {
            name: name.to_string(),
            annual_return,
            inflation_linked,
        }
    }
}

/// Clamp a dividend yield into the accepted range
pub fn clamp_dividend_yield(value: f64) -> f64 {
    value.clamp(DIVIDEND_YIELD_BOUNDS.0, DIVIDEND_YIELD_BOUNDS.1)
}

/// Clamp an annual return into the accepted range
pub fn clamp_annual_return(value: f64) -> f64 {
    value.clamp(ANNUAL_RETURN_BOUNDS.0, ANNUAL_RETURN_BOUNDS.1)
}

/// Reference real-estate funds (illustrative figures)
pub fn default_real_estate_funds() -> Vec<AssetCatalogEntry> {
    vec![
        AssetCatalogEntry::new("KNRI11", "Kinea Renda Imobiliária", 0.085, 0.12, None, Some("Títulos e Val. Mob.")),
        AssetCatalogEntry::new("HGLG11", "CSHG Logística", 0.068, 0.10, None, Some("Logística")),
        AssetCatalogEntry::new("XPLG11", "XP Log", 0.072, 0.11, None, Some("Logística")),
        AssetCatalogEntry::new("VRTA11", "Vectis Renda Residencial", 0.078, 0.13, None, Some("Residencial")),
        AssetCatalogEntry::new("BCFF11", "BTG Pactual Fundo de Fundos", 0.082, 0.14, None, Some("Fundo de Fundos")),
    ]
}

/// Reference equities (illustrative figures)
pub fn default_stocks() -> Vec<AssetCatalogEntry> {
    vec![
        AssetCatalogEntry::new("ITSA4", "Itaúsa", 0.065, 0.09, Some("Holdings"), None),
        AssetCatalogEntry::new("BBAS3", "Banco do Brasil", 0.058, 0.11, Some("Bancos"), None),
        AssetCatalogEntry::new("PETR4", "Petrobras", 0.072, 0.15, Some("Petróleo e Gás"), None),
        AssetCatalogEntry::new("VALE3", "Vale", 0.084, 0.13, Some("Mineração"), None),
        AssetCatalogEntry::new("WEGE3", "WEG", 0.032, 0.18, Some("Equipamentos Elétricos"), None),
    ]
}

/// Reference Treasury Direct bonds
pub fn default_treasury_bonds() -> Vec<BondEntry> {
    vec![
        BondEntry::new("Tesouro Selic", 0.1175, false),
        BondEntry::new("Tesouro IPCA+ 2026", 0.065, true),
        BondEntry::new("Tesouro IPCA+ 2035", 0.06, true),
        BondEntry::new("Tesouro Prefixado 2026", 0.12, false),
        BondEntry::new("Tesouro Prefixado 2029", 0.125, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_data_within_bounds() {
        for entry in default_real_estate_funds().iter().chain(default_stocks().iter()) {
            assert!(entry.dividend_yield >= DIVIDEND_YIELD_BOUNDS.0);
            assert!(entry.dividend_yield <= DIVIDEND_YIELD_BOUNDS.1);
            assert!(entry.annual_return >= ANNUAL_RETURN_BOUNDS.0);
            assert!(entry.annual_return <= ANNUAL_RETURN_BOUNDS.1);
        }
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_dividend_yield(0.5), 0.20);
        assert_eq!(clamp_dividend_yield(0.0), 0.01);
        assert_eq!(clamp_annual_return(-0.2), 0.05);
        assert_eq!(clamp_annual_return(0.17), 0.17);
    }

    #[test]
    fn test_asset_class_parse() {
        assert_eq!("FII".parse::<AssetClass>().unwrap(), AssetClass::RealEstateFund);
        assert_eq!("stocks".parse::<AssetClass>().unwrap(), AssetClass::Stock);
        assert_eq!("tesouro".parse::<AssetClass>().unwrap(), AssetClass::Treasury);
        assert!("crypto".parse::<AssetClass>().is_err());
    }
}
