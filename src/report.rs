//! Export helpers: flat summary mapping and CSV writers
//!
//! Document renderers (PDF, spreadsheets) consume [`export_summary`]; the
//! CSV writers cover balance histories and the comparison table.

use std::io;

use serde::Serialize;

use crate::projection::HistoryFlow;
use crate::simulator::{compare, SimulationReport};

/// Currency amount as `R$ 1,234.56`
pub fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}R$ {}.{}", sign, grouped, frac_part)
}

/// Ordered key/value summary of a simulation
pub fn export_summary(report: &SimulationReport) -> Vec<(String, String)> {
    let scenario = if report.scenario_description.is_empty() {
        report.scenario.clone()
    } else {
        format!("{} ({})", report.scenario, report.scenario_description)
    };

    let mut summary = vec![
        ("Economic scenario".to_string(), scenario),
        (
            "Total contributed".to_string(),
            format_currency(report.total_contributed()),
        ),
        (
            "Mean final balance".to_string(),
            format_currency(report.mean_final_balance()),
        ),
    ];

    for m in &report.modalities {
        let label = m.modality.label();
        summary.push((
            format!("{} - Final balance", label),
            format_currency(m.nominal.final_balance),
        ));
        summary.push((
            format!("{} - Return", label),
            format!("{:.2}%", m.nominal.return_pct()),
        ));
    }

    summary
}

#[derive(Serialize)]
struct HistoryRecord<'a> {
    modality: &'a str,
    date: String,
    balance: f64,
    contribution: Option<f64>,
    accumulated_dividends: Option<f64>,
}

/// Nominal balance history of every modality, one row per contribution
pub fn write_history_csv<W: io::Write>(report: &SimulationReport, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for m in &report.modalities {
        for point in &m.nominal.history {
            let (contribution, accumulated_dividends) = match point.flow {
                HistoryFlow::Contribution(amount) => (Some(amount), None),
                HistoryFlow::Dividends(total) => (None, Some(total)),
            };
            wtr.serialize(HistoryRecord {
                modality: m.modality.key(),
                date: point.date.format("%Y-%m-%d").to_string(),
                balance: point.balance,
                contribution,
                accumulated_dividends,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ComparisonRecord<'a> {
    modality: &'a str,
    label: &'a str,
    total_contributed: f64,
    final_balance: f64,
    earnings: f64,
    return_pct: f64,
    meets_goal: bool,
    real_final_balance: Option<f64>,
    real_return_pct: Option<f64>,
    taxes: Option<f64>,
    estimated_fees: f64,
    volatility: f64,
    max_drawdown: f64,
    sharpe_ratio: f64,
}

/// Comparison table with risk metrics, one row per modality
pub fn write_comparison_csv<W: io::Write>(report: &SimulationReport, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (row, m) in compare(report).iter().zip(&report.modalities) {
        wtr.serialize(ComparisonRecord {
            modality: row.modality.key(),
            label: &row.label,
            total_contributed: row.total_contributed,
            final_balance: row.final_balance,
            earnings: row.earnings,
            return_pct: row.return_pct,
            meets_goal: row.meets_goal,
            real_final_balance: row.real_final_balance,
            real_return_pct: row.real_return_pct,
            taxes: row.taxes,
            estimated_fees: row.estimated_fees,
            volatility: m.risk.volatility,
            max_drawdown: m.risk.max_drawdown,
            sharpe_ratio: m.risk.sharpe_ratio,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
