//! Simulation session: assumptions, asset catalog, lookup and saved portfolios
//!
//! A [`Simulator`] belongs to one session. It owns the only mutable state in
//! the crate (the fetched-asset overlay and the portfolio book); projections
//! themselves are pure.

mod outcome;
mod params;
mod portfolio;

pub use outcome::{compare, ComparisonRow, ModalityReport, SimulationReport};
pub use params::{Modality, SimulationParams, DEFAULT_TREASURY_BOND};
pub use portfolio::PortfolioBook;

use log::{info, warn};

use crate::assumptions::{MarketAssumptions, TaxClass, NEUTRAL_SCENARIO};
use crate::catalog::{
    lookup_with_fallback, AssetCatalog, AssetCatalogEntry, AssetClass, AssetLookup, LookupOutcome,
    OfflineLookup,
};
use crate::error::Result;
use crate::goal::goal_scenario;
use crate::projection::{average_estimates, Instrument, ProjectionEngine, ProjectionResult};
use crate::risk;
use crate::scenario::ScenarioAdjuster;
use crate::schedule::horizon_months;

/// One simulation session
#[derive(Debug)]
pub struct Simulator<L: AssetLookup = OfflineLookup> {
    engine: ProjectionEngine,
    adjuster: ScenarioAdjuster,
    catalog: AssetCatalog,
    lookup: L,
    portfolios: PortfolioBook,
}

impl Simulator<OfflineLookup> {
    /// Reference assumptions, seeded catalog, no market data source
    pub fn offline() -> Self {
        Self::new(
            MarketAssumptions::default_reference(),
            AssetCatalog::seeded(),
            OfflineLookup,
        )
    }
}

impl Default for Simulator<OfflineLookup> {
    fn default() -> Self {
        Self::offline()
    }
}

impl<L: AssetLookup> Simulator<L> {
    pub fn new(assumptions: MarketAssumptions, catalog: AssetCatalog, lookup: L) -> Self {
        Self {
            adjuster: ScenarioAdjuster::from_assumptions(&assumptions),
            engine: ProjectionEngine::new(assumptions),
            catalog,
            lookup,
            portfolios: PortfolioBook::new(),
        }
    }

    pub fn assumptions(&self) -> &MarketAssumptions {
        self.engine.assumptions()
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut AssetCatalog {
        &mut self.catalog
    }

    /// Look up a ticker and add it to the session catalog
    ///
    /// Tickers fetched earlier in the session come from the catalog without
    /// calling the provider again. Failed lookups return class defaults with
    /// `success = false` and are not stored.
    pub fn search_and_add_asset(&mut self, ticker: &str, class: AssetClass) -> LookupOutcome {
        let ticker = ticker.trim().to_ascii_uppercase();
        if let Some(cached) = self.catalog.cached(class, &ticker) {
            return cached;
        }

        let outcome = lookup_with_fallback(&self.lookup, &ticker, class);
        if self.catalog.insert_fetched(class, &outcome) {
            info!("Added {} to the {} catalog", ticker, class);
        }
        outcome
    }

    /// Instrument projected for a modality
    pub fn instrument(&self, modality: Modality, params: &SimulationParams) -> Instrument {
        let assumptions = self.assumptions();
        match modality {
            Modality::Selic => Instrument::FixedIncome {
                rate: assumptions.selic(),
                tax_class: TaxClass::Exempt,
            },
            Modality::Cdb => Instrument::FixedIncome {
                rate: assumptions.cdb(),
                tax_class: TaxClass::Cdb,
            },
            Modality::Fii => Instrument::VariableIncome {
                class: AssetClass::RealEstateFund,
                estimates: average_estimates(
                    &self.selected(AssetClass::RealEstateFund, &params.selected_funds),
                    assumptions.fii_defaults,
                ),
            },
            Modality::Stocks => Instrument::VariableIncome {
                class: AssetClass::Stock,
                estimates: average_estimates(
                    &self.selected(AssetClass::Stock, &params.selected_stocks),
                    assumptions.stock_defaults,
                ),
            },
            Modality::Treasury => {
                let name = params.treasury_bond_name();
                let bond = self.catalog.bond(name).cloned();
                if bond.is_none() {
                    warn!("Unknown treasury bond '{}', using fallback rate", name);
                }
                Instrument::TreasuryBond { bond }
            }
        }
    }

    /// Catalog entries for the selected tickers, skipping unknown ones
    fn selected(&self, class: AssetClass, tickers: &[String]) -> Vec<&AssetCatalogEntry> {
        tickers
            .iter()
            .filter_map(|ticker| {
                let entry = self.catalog.entry(class, ticker);
                if entry.is_none() {
                    warn!("{} is not in the {} catalog, ignored", ticker, class);
                }
                entry
            })
            .collect()
    }

    /// Project one modality, with the optional withdrawal but no scenario
    pub fn project(
        &self,
        modality: Modality,
        params: &SimulationParams,
        include_inflation: bool,
    ) -> ProjectionResult {
        let config = params.projection_config(include_inflation);
        let instrument = self.instrument(modality, params);
        match params.withdrawal {
            Some(withdrawal) => self
                .engine
                .project_with_withdrawal(&config, &instrument, withdrawal),
            None => self.engine.project(&config, &instrument),
        }
    }

    /// Run every selected modality
    ///
    /// Each modality gets a nominal run and, when inflation is included, a
    /// real twin. The economic scenario is applied to both. Goal figures use
    /// the nominal monthly rate; risk metrics use the nominal history.
    pub fn run(&self, params: &SimulationParams) -> Result<SimulationReport> {
        params.validate()?;

        let inflation = self.assumptions().inflation_annual;
        let months = horizon_months(params.start, params.end);

        let scenario_description = match self.adjuster.table().get(&params.scenario) {
            Some(s) => s.description.clone(),
            None => {
                warn!(
                    "Unknown economic scenario '{}', results are not adjusted",
                    params.scenario
                );
                String::new()
            }
        };

        let mut modalities: Vec<Modality> = Vec::new();
        for m in &params.modalities {
            if !modalities.contains(m) {
                modalities.push(*m);
            }
        }

        let reports = modalities
            .into_iter()
            .map(|modality| {
                let nominal = self.project(modality, params, false);
                let goal = goal_scenario(
                    nominal.monthly_rate,
                    params.financial_goal,
                    params.monthly_investment,
                    months,
                );
                let risk = risk::analyze(&nominal.history, inflation);
                let estimated_fees = self.estimated_fees(modality, &nominal);

                let real = params
                    .include_inflation
                    .then(|| self.adjuster.apply(&params.scenario, &self.project(modality, params, true)));

                ModalityReport {
                    modality,
                    nominal: self.adjuster.apply(&params.scenario, &nominal),
                    real,
                    goal,
                    risk,
                    estimated_fees,
                }
            })
            .collect::<Vec<_>>();

        info!(
            "Simulated {} modalities over {} months ({} scenario)",
            reports.len(),
            months,
            params.scenario
        );

        Ok(SimulationReport {
            scenario: params.scenario.clone(),
            scenario_description,
            financial_goal: params.financial_goal,
            horizon_months: months,
            include_inflation: params.include_inflation,
            include_taxes: params.include_taxes,
            inflation_annual: inflation,
            modalities: reports,
        })
    }

    /// Fees a modality would incur over its horizon
    ///
    /// Administration accrues on contributed capital; exchange-traded
    /// modalities also pay brokerage on every contribution.
    pub fn estimated_fees(&self, modality: Modality, result: &ProjectionResult) -> f64 {
        let fees = &self.assumptions().fees;
        let administration = fees.administration_fee(result.total_contributed, result.horizon_months);
        match modality {
            Modality::Fii | Modality::Stocks => administration + fees.brokerage_fee(result.total_contributed),
            Modality::Selic | Modality::Cdb | Modality::Treasury => administration,
        }
    }

    /// Save the parameters under `name`
    pub fn save_portfolio(&mut self, name: &str, params: SimulationParams) -> bool {
        self.portfolios.save(name, params)
    }

    pub fn load_portfolio(&self, name: &str) -> Option<&SimulationParams> {
        self.portfolios.load(name)
    }

    pub fn portfolio_names(&self) -> Vec<&str> {
        self.portfolios.names()
    }

    /// Run a saved portfolio, falling back to the neutral scenario if it names none
    pub fn run_portfolio(&self, name: &str) -> Option<Result<SimulationReport>> {
        self.portfolios.load(name).map(|params| {
            if params.scenario.is_empty() {
                let mut params = params.clone();
                params.scenario = NEUTRAL_SCENARIO.to_string();
                self.run(&params)
            } else {
                self.run(params)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AssetQuote, StaticLookup};
    use crate::error::ProjectionError;
    use crate::projection::{InstrumentDetails, Withdrawal};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn params() -> SimulationParams {
        let mut p = SimulationParams::new(1000.0, date(2024, 1, 1), date(2029, 1, 1));
        p.financial_goal = 100_000.0;
        p
    }

    /// Counts provider calls
    struct CountingLookup {
        calls: Cell<u32>,
        inner: StaticLookup,
    }

    impl AssetLookup for CountingLookup {
        fn lookup(&self, symbol: &str, class: AssetClass) -> Result<AssetQuote> {
            self.calls.set(self.calls.get() + 1);
            self.inner.lookup(symbol, class)
        }
    }

    fn quote(dy: f64, ret: f64) -> AssetQuote {
        AssetQuote {
            display_name: Some("Maxi Renda".to_string()),
            dividend_yield: Some(dy),
            annual_return: Some(ret),
            segment: Some("Papel".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_all_modalities() {
        let report = Simulator::offline().run(&params()).unwrap();

        assert_eq!(report.modalities.len(), 5);
        assert_eq!(report.horizon_months, 60);
        assert_eq!(report.total_contributed(), 5.0 * 61_000.0);
        for m in &report.modalities {
            assert!(m.real.is_none());
            assert!(m.nominal.final_balance > m.nominal.total_contributed);
        }
    }

    #[test]
    fn test_selic_matches_engine() {
        let sim = Simulator::offline();
        let report = sim.run(&params()).unwrap();
        let selic = report.get(Modality::Selic).unwrap();

        let direct = sim.engine().project(
            &params().projection_config(false),
            &Instrument::FixedIncome {
                rate: sim.assumptions().selic(),
                tax_class: TaxClass::Exempt,
            },
        );
        assert_eq!(selic.nominal, direct);
        assert_eq!(
            selic.goal,
            goal_scenario(direct.monthly_rate, 100_000.0, 1000.0, 60)
        );
    }

    #[test]
    fn test_real_runs_and_scenario() {
        let mut p = params();
        p.include_inflation = true;
        p.scenario = "crise".to_string();
        p.modalities = vec![Modality::Cdb, Modality::Cdb, Modality::Fii];

        let sim = Simulator::offline();
        let report = sim.run(&p).unwrap();
        assert_eq!(report.modalities.len(), 2);
        assert_eq!(report.scenario_description, "Cenário de crise econômica");

        let cdb = report.get(Modality::Cdb).unwrap();
        let unadjusted = sim.project(Modality::Cdb, &p, false);
        assert_eq!(cdb.nominal.final_balance, unadjusted.final_balance * 0.6);

        let real = cdb.real.as_ref().unwrap();
        assert!(real.final_balance < cdb.nominal.final_balance);
        // Goal uses the unadjusted nominal rate
        assert_eq!(
            cdb.goal,
            goal_scenario(unadjusted.monthly_rate, p.financial_goal, 1000.0, 60)
        );
    }

    #[test]
    fn test_selected_assets_are_averaged() {
        let mut p = params();
        p.modalities = vec![Modality::Fii];
        p.selected_funds = vec!["KNRI11".into(), "HGLG11".into(), "NOPE11".into()];

        let sim = Simulator::offline();
        let knri = sim.catalog().entry(AssetClass::RealEstateFund, "KNRI11").unwrap();
        let hglg = sim.catalog().entry(AssetClass::RealEstateFund, "HGLG11").unwrap();

        match sim.instrument(Modality::Fii, &p) {
            Instrument::VariableIncome { estimates, .. } => {
                assert_relative_eq!(
                    estimates.dividend_yield,
                    (knri.dividend_yield + hglg.dividend_yield) / 2.0
                );
            }
            other => panic!("unexpected instrument {other:?}"),
        }
    }

    #[test]
    fn test_unselected_assets_use_class_defaults() {
        let sim = Simulator::offline();
        match sim.instrument(Modality::Stocks, &params()) {
            Instrument::VariableIncome { estimates, .. } => {
                assert_eq!(estimates, sim.assumptions().stock_defaults)
            }
            other => panic!("unexpected instrument {other:?}"),
        }
    }

    #[test]
    fn test_treasury_bond_selection() {
        let sim = Simulator::offline();
        let mut p = params();
        p.treasury_bond = Some("Tesouro IPCA+ 2035".to_string());

        let result = sim.project(Modality::Treasury, &p, true);
        assert!(result.is_inflation_linked());

        p.treasury_bond = Some("Tesouro Inexistente".to_string());
        let result = sim.project(Modality::Treasury, &p, false);
        assert!(matches!(
            result.details,
            InstrumentDetails::GovernmentBond { bond_name: None, .. }
        ));
    }

    #[test]
    fn test_withdrawal_is_applied() {
        let mut p = params();
        p.withdrawal = Some(Withdrawal {
            amount: 5_000.0,
            date: date(2026, 1, 1),
        });
        let sim = Simulator::offline();
        let with = sim.project(Modality::Selic, &p, false);
        let without = sim.project(Modality::Selic, &params(), false);

        assert_eq!(with.withdrawal.unwrap().amount, 5_000.0);
        assert!(with.final_balance < without.final_balance);
    }

    #[test]
    fn test_estimated_fees() {
        let report = Simulator::offline().run(&params()).unwrap();
        // 1% a year on 61k over 60 months
        let administration = 61_000.0 * (0.01 / 12.0) * 60.0;

        let selic = report.get(Modality::Selic).unwrap();
        assert_relative_eq!(selic.estimated_fees, administration, max_relative = 1e-12);

        let stocks = report.get(Modality::Stocks).unwrap();
        assert_relative_eq!(
            stocks.estimated_fees,
            administration + 61_000.0 * 0.005,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_invalid_dates_error() {
        let p = SimulationParams::new(1000.0, date(2029, 1, 1), date(2024, 1, 1));
        assert!(Simulator::offline().run(&p).is_err());
    }

    #[test]
    fn test_withdrawal_outside_horizon_error() {
        let mut p = params();
        let late = date(2030, 6, 1);
        p.withdrawal = Some(Withdrawal {
            amount: 1_000.0,
            date: late,
        });
        let err = Simulator::offline().run(&p).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidWithdrawalDate { date, .. } if date == late
        ));
        assert!(err.to_string().contains("2030-06-01"));
        assert!(err.to_string().contains("2024-01-01 to 2029-01-01"));
    }

    #[test]
    fn test_search_and_add_caches_success() {
        let lookup = CountingLookup {
            calls: Cell::new(0),
            inner: StaticLookup::new().with_quote("MXRF11", quote(0.12, 0.09)),
        };
        let mut sim = Simulator::new(MarketAssumptions::default(), AssetCatalog::seeded(), lookup);

        let first = sim.search_and_add_asset("mxrf11", AssetClass::RealEstateFund);
        assert!(first.success);
        assert_eq!(first.ticker, "MXRF11");

        let second = sim.search_and_add_asset("MXRF11", AssetClass::RealEstateFund);
        assert_eq!(second.dividend_yield, 0.12);
        assert_eq!(sim.lookup.calls.get(), 1);
        assert_eq!(sim.catalog().cache_hits, 1);

        assert!(sim
            .catalog()
            .entries(AssetClass::RealEstateFund)
            .iter()
            .any(|e| e.ticker == "MXRF11"));
    }

    #[test]
    fn test_searched_ticker_selected_in_lowercase() {
        let lookup = StaticLookup::new().with_quote("MXRF11", quote(0.15, 0.09));
        let mut sim = Simulator::new(MarketAssumptions::default(), AssetCatalog::seeded(), lookup);
        assert!(sim.search_and_add_asset("mxrf11", AssetClass::RealEstateFund).success);

        let mut p = params();
        p.selected_funds = vec!["mxrf11".into()];
        match sim.instrument(Modality::Fii, &p) {
            Instrument::VariableIncome { estimates, .. } => {
                assert_relative_eq!(estimates.dividend_yield, 0.15);
                assert_relative_eq!(estimates.annual_return, 0.09);
            }
            other => panic!("unexpected instrument {other:?}"),
        }

        p.selected_funds = vec!["knri11".into()];
        let knri = sim.catalog().entry(AssetClass::RealEstateFund, "KNRI11").unwrap();
        match sim.instrument(Modality::Fii, &p) {
            Instrument::VariableIncome { estimates, .. } => {
                assert_relative_eq!(estimates.dividend_yield, knri.dividend_yield);
            }
            other => panic!("unexpected instrument {other:?}"),
        }
    }

    #[test]
    fn test_failed_lookup_is_not_cached() {
        let mut sim = Simulator::offline();
        let outcome = sim.search_and_add_asset("XYZW3", AssetClass::Stock);
        assert!(!outcome.success);
        assert_eq!((outcome.dividend_yield, outcome.annual_return), (0.065, 0.12));
        assert_eq!(sim.catalog().fetched_len(), 0);
    }

    #[test]
    fn test_comparison_rows() {
        let mut p = params();
        p.include_inflation = true;
        p.include_taxes = true;
        p.financial_goal = 75_000.0;

        let report = Simulator::offline().run(&p).unwrap();
        let rows = compare(&report);
        assert_eq!(rows.len(), 5);

        for (row, m) in rows.iter().zip(&report.modalities) {
            assert_eq!(row.final_balance, m.nominal.final_balance);
            assert_eq!(row.meets_goal, m.nominal.final_balance >= 75_000.0);
            assert!(row.real_final_balance.is_some());
            assert!(row.taxes.is_some());
        }
        assert_eq!(rows[0].label, "Tesouro Selic");
        assert_eq!(rows[0].taxes, Some(0.0));
    }

    #[test]
    fn test_portfolio_book() {
        let mut sim = Simulator::offline();
        assert!(sim.save_portfolio("Longo prazo", params()));
        assert_eq!(sim.portfolio_names(), vec!["Longo prazo"]);
        assert_eq!(sim.load_portfolio("Longo prazo"), Some(&params()));

        let report = sim.run_portfolio("Longo prazo").unwrap().unwrap();
        assert_eq!(report.modalities.len(), 5);
        assert!(sim.run_portfolio("Curto prazo").is_none());
    }

    #[test]
    fn test_best_and_mean() {
        let report = Simulator::offline().run(&params()).unwrap();
        let best = report.best_modality().unwrap();
        for m in &report.modalities {
            assert!(best.nominal.final_balance >= m.nominal.final_balance);
        }
        let mean = report.modalities.iter().map(|m| m.nominal.final_balance).sum::<f64>() / 5.0;
        assert_relative_eq!(report.mean_final_balance(), mean);
    }
}
