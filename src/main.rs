//! Investment projection CLI
//!
//! Runs a simulation over the selected modalities, prints the comparison
//! table and goal analysis, and optionally writes CSV output.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::info;

use invest_projection::catalog::{load_catalog, AssetCatalog, OfflineLookup};
use invest_projection::projection::Withdrawal;
use invest_projection::report::{export_summary, format_currency, write_comparison_csv, write_history_csv};
use invest_projection::simulator::compare;
use invest_projection::{Frequency, MarketAssumptions, Modality, SimulationParams, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "invest_projection",
    about = "Project periodic contributions into fixed income, treasury bonds, FIIs and stocks"
)]
struct Cli {
    #[arg(long, default_value_t = 1000.0, help = "Amount deposited at each contribution")]
    amount: f64,

    #[arg(long, default_value_t = Frequency::Monthly, help = "monthly, quarterly or annually")]
    frequency: Frequency,

    #[arg(long, help = "First contribution date (YYYY-MM-DD)")]
    start: NaiveDate,

    #[arg(long, help = "End of the horizon (YYYY-MM-DD)")]
    end: NaiveDate,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "selic,cdb,fii,stocks,treasury",
        help = "Comma-separated modalities"
    )]
    modalities: Vec<Modality>,

    #[arg(long, help = "Also run inflation-adjusted projections")]
    inflation: bool,

    #[arg(long, help = "Withhold income tax on earnings")]
    taxes: bool,

    #[arg(long, default_value = "neutro", help = "Economic scenario (otimista, neutro, pessimista, crise)")]
    scenario: String,

    #[arg(long, default_value_t = 100_000.0, help = "Financial goal")]
    goal: f64,

    #[arg(long, value_delimiter = ',', help = "FII tickers to average")]
    funds: Vec<String>,

    #[arg(long, value_delimiter = ',', help = "Stock tickers to average")]
    stocks: Vec<String>,

    #[arg(long, help = "Treasury bond name, defaults to Tesouro Selic")]
    bond: Option<String>,

    #[arg(long, requires = "withdraw_date", help = "Partial withdrawal amount")]
    withdraw_amount: Option<f64>,

    #[arg(long, requires = "withdraw_amount", help = "Partial withdrawal date (YYYY-MM-DD)")]
    withdraw_date: Option<NaiveDate>,

    #[arg(long, help = "Market assumptions JSON file")]
    assumptions: Option<PathBuf>,

    #[arg(long, help = "Directory with fii.csv, stocks.csv and treasury.csv")]
    catalog: Option<PathBuf>,

    #[arg(long, help = "Write the nominal balance history to this CSV file")]
    history_csv: Option<PathBuf>,

    #[arg(long, help = "Write the comparison table to this CSV file")]
    comparison_csv: Option<PathBuf>,
}

impl Cli {
    fn params(&self) -> SimulationParams {
        SimulationParams {
            monthly_investment: self.amount,
            frequency: self.frequency,
            start: self.start,
            end: self.end,
            modalities: self.modalities.clone(),
            include_inflation: self.inflation,
            include_taxes: self.taxes,
            scenario: self.scenario.clone(),
            financial_goal: self.goal,
            selected_funds: self.funds.clone(),
            selected_stocks: self.stocks.clone(),
            treasury_bond: self.bond.clone(),
            withdrawal: self
                .withdraw_amount
                .zip(self.withdraw_date)
                .map(|(amount, date)| Withdrawal { amount, date }),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let assumptions = match &cli.assumptions {
        Some(path) => MarketAssumptions::from_json_path(path)
            .with_context(|| format!("Failed to load assumptions from {}", path.display()))?,
        None => MarketAssumptions::default_reference(),
    };

    let catalog = match &cli.catalog {
        Some(dir) => load_catalog(dir)
            .with_context(|| format!("Failed to load catalog from {}", dir.display()))?,
        None => AssetCatalog::seeded(),
    };

    let simulator = Simulator::new(assumptions, catalog, OfflineLookup);
    let params = cli.params();
    let report = simulator.run(&params).context("Simulation failed")?;

    println!("Investment Projection v0.1.0");
    println!("============================\n");
    println!(
        "{} modalities, {} contributions of {} from {} to {} ({} months)",
        params.modalities.len(),
        params.frequency,
        format_currency(params.monthly_investment),
        params.start,
        params.end,
        report.horizon_months
    );
    if report.include_inflation {
        println!("Real values deflated by IPCA of {:.2}% a year", report.inflation_annual * 100.0);
    }
    println!();

    println!(
        "{:<14} {:>16} {:>16} {:>16} {:>10} {:>6}",
        "Modality", "Contributed", "Final", "Earnings", "Return", "Goal"
    );
    println!("{}", "-".repeat(83));
    for row in compare(&report) {
        println!(
            "{:<14} {:>16.2} {:>16.2} {:>16.2} {:>9.2}% {:>6}",
            row.label,
            row.total_contributed,
            row.final_balance,
            row.earnings,
            row.return_pct,
            if row.meets_goal { "yes" } else { "no" }
        );
        if let (Some(real), Some(pct)) = (row.real_final_balance, row.real_return_pct) {
            println!("{:<14} {:>16} {:>16.2} {:>16} {:>9.2}%", "  real", "", real, "", pct);
        }
    }

    println!("\nGoal of {}:", format_currency(report.financial_goal));
    for m in &report.modalities {
        println!(
            "  {:<14} time with current: {:<18} required monthly: {:>14}  additional: {:>14}",
            m.modality.label(),
            m.goal.time_with_current.to_string(),
            format_currency(m.goal.required_monthly),
            format_currency(m.goal.additional_monthly),
        );
    }

    println!("\nRisk:");
    for m in &report.modalities {
        println!(
            "  {:<14} volatility {:>6.2}%  max drawdown {:>6.2}%  sharpe {:>6.2}",
            m.modality.label(),
            m.risk.volatility,
            m.risk.max_drawdown,
            m.risk.sharpe_ratio
        );
    }

    println!("\nSummary:");
    for (key, value) in export_summary(&report) {
        println!("  {}: {}", key, value);
    }

    if let Some(path) = &cli.history_csv {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        write_history_csv(&report, file)?;
        info!("History written to {}", path.display());
        println!("\nHistory written to: {}", path.display());
    }

    if let Some(path) = &cli.comparison_csv {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        write_comparison_csv(&report, file)?;
        info!("Comparison written to {}", path.display());
        println!("Comparison written to: {}", path.display());
    }

    Ok(())
}
