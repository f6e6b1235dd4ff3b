//! Sweep annual rates and contribution amounts for a fixed-income instrument
//!
//! Every grid point is an independent projection, run in parallel. Prints the
//! final balance under each economic scenario plus the goal figures, and
//! optionally writes the grid to CSV.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use invest_projection::assumptions::{RateSpec, TaxClass};
use invest_projection::{
    goal_scenario, Instrument, MarketAssumptions, ProjectionConfig, ProjectionEngine,
    ScenarioAdjuster,
};

#[derive(Parser, Debug)]
#[command(name = "scenario_sweep", about = "Grid of fixed-income projections over rates and amounts")]
struct Args {
    #[arg(long, default_value = "2024-01-01")]
    start: NaiveDate,

    #[arg(long, default_value = "2034-01-01")]
    end: NaiveDate,

    #[arg(long, default_value_t = 0.06, help = "Lowest annual rate")]
    rate_min: f64,

    #[arg(long, default_value_t = 0.15, help = "Highest annual rate")]
    rate_max: f64,

    #[arg(long, default_value_t = 0.01, help = "Rate step")]
    rate_step: f64,

    #[arg(long, value_delimiter = ',', default_value = "500,1000,2000,5000")]
    amounts: Vec<f64>,

    #[arg(long, default_value_t = 1_000_000.0)]
    goal: f64,

    #[arg(long, help = "Deflate by the reference inflation")]
    inflation: bool,

    #[arg(long, help = "Withhold treasury-direct income tax")]
    taxes: bool,

    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SweepRow {
    annual_rate: f64,
    amount: f64,
    total_contributed: f64,
    final_balance: f64,
    otimista: f64,
    pessimista: f64,
    crise: f64,
    months_to_goal: Option<f64>,
    required_monthly: f64,
}

fn rate_grid(min: f64, max: f64, step: f64) -> Result<Vec<f64>> {
    if step <= 0.0 || min > max {
        bail!("Invalid rate grid: {}..{} step {}", min, max, step);
    }
    let points = ((max - min) / step + 1e-9).floor() as usize + 1;
    Ok((0..points).map(|i| min + step * i as f64).collect())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rates = rate_grid(args.rate_min, args.rate_max, args.rate_step)?;
    let engine = ProjectionEngine::new(MarketAssumptions::default_reference());
    let adjuster = ScenarioAdjuster::from_assumptions(engine.assumptions());

    let grid: Vec<(f64, f64)> = rates
        .iter()
        .flat_map(|&r| args.amounts.iter().map(move |&a| (r, a)))
        .collect();

    println!("Running {} projections from {} to {}...", grid.len(), args.start, args.end);
    let start = Instant::now();

    let rows: Vec<SweepRow> = grid
        .par_iter()
        .map(|&(annual_rate, amount)| {
            let config = ProjectionConfig::monthly(amount, args.start, args.end)
                .with_inflation(args.inflation)
                .with_taxes(args.taxes);
            let instrument = Instrument::FixedIncome {
                rate: RateSpec::annual(annual_rate),
                tax_class: TaxClass::TreasuryDirect,
            };
            let result = engine.project(&config, &instrument);
            let goal = goal_scenario(result.monthly_rate, args.goal, amount, result.horizon_months);
            let scaled = |name: &str| adjuster.apply(name, &result).final_balance;

            SweepRow {
                annual_rate,
                amount,
                total_contributed: result.total_contributed,
                final_balance: result.final_balance,
                otimista: scaled("otimista"),
                pessimista: scaled("pessimista"),
                crise: scaled("crise"),
                months_to_goal: goal.time_with_current.months(),
                required_monthly: goal.required_monthly,
            }
        })
        .collect();

    println!("Completed in {:?}\n", start.elapsed());

    println!(
        "{:>6} {:>10} {:>16} {:>16} {:>16} {:>12} {:>14}",
        "Rate", "Amount", "Final", "Otimista", "Crise", "Goal (mo)", "Required"
    );
    println!("{}", "-".repeat(96));
    for row in &rows {
        let months = row
            .months_to_goal
            .map(|m| format!("{:.1}", m))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5.2}% {:>10.2} {:>16.2} {:>16.2} {:>16.2} {:>12} {:>14.2}",
            row.annual_rate * 100.0,
            row.amount,
            row.final_balance,
            row.otimista,
            row.crise,
            months,
            row.required_monthly
        );
    }

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        let mut wtr = csv::Writer::from_writer(file);
        for row in &rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        println!("\nResults written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_grid_includes_endpoints() {
        let grid = rate_grid(0.06, 0.15, 0.01).unwrap();
        assert_eq!(grid.len(), 10);
        assert!((grid[9] - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_rate_grid_rejects_bad_step() {
        assert!(rate_grid(0.06, 0.15, 0.0).is_err());
        assert!(rate_grid(0.15, 0.06, 0.01).is_err());
    }
}
