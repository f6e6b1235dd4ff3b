//! Asset catalog: reference data, external lookup and the session cache

mod data;
pub mod loader;
mod lookup;
mod store;

pub use data::{
    clamp_annual_return, clamp_dividend_yield, default_real_estate_funds, default_stocks,
    default_treasury_bonds, AssetCatalogEntry, AssetClass, BondEntry, ANNUAL_RETURN_BOUNDS,
    DIVIDEND_YIELD_BOUNDS,
};
pub use loader::{load_catalog, DEFAULT_CATALOG_PATH};
pub use lookup::{
    exchange_symbol, fallback_estimates, lookup_with_fallback, AssetLookup, AssetQuote,
    LookupOutcome, OfflineLookup, StaticLookup, EXCHANGE_SUFFIX, UNSPECIFIED,
};
pub use store::AssetCatalog;
