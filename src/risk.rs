//! Risk metrics over a projected balance history

use serde::{Deserialize, Serialize};

use crate::projection::HistoryPoint;

/// Risk summary of one projection
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Annualized standard deviation of period returns, in percent
    pub volatility: f64,

    /// Largest peak-to-trough fall, in percent
    pub max_drawdown: f64,

    /// Annualized mean return over inflation, divided by annualized volatility
    pub sharpe_ratio: f64,
}

/// Metrics from a balance history
pub fn analyze(history: &[HistoryPoint], annual_inflation: f64) -> RiskMetrics {
    let balances: Vec<f64> = history.iter().map(|p| p.balance).collect();
    analyze_balances(&balances, annual_inflation)
}

/// Metrics from a plain balance series; fewer than two points yield all zeros
pub fn analyze_balances(balances: &[f64], annual_inflation: f64) -> RiskMetrics {
    if balances.len() < 2 {
        return RiskMetrics::default();
    }

    let returns = period_returns(balances);
    let std_dev = population_std_dev(&returns);
    let annualized_std = std_dev * 12f64.sqrt();

    let sharpe_ratio = if std_dev > 0.0 {
        (mean(&returns) * 12.0 - annual_inflation) / annualized_std
    } else {
        0.0
    };

    RiskMetrics {
        volatility: annualized_std * 100.0,
        max_drawdown: max_drawdown(balances),
        sharpe_ratio,
    }
}

/// Period-over-period returns, 0 after a zero balance
pub fn period_returns(balances: &[f64]) -> Vec<f64> {
    balances
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Maximum drawdown in percent
pub fn max_drawdown(balances: &[f64]) -> f64 {
    let Some(&first) = balances.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0;
    for &balance in balances {
        if balance > peak {
            peak = balance;
        }
        if peak > 0.0 {
            let dd = (peak - balance) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
