//! Simulation results and the per-modality comparison table

use serde::{Deserialize, Serialize};

use super::params::Modality;
use crate::goal::GoalScenario;
use crate::projection::ProjectionResult;
use crate::risk::RiskMetrics;

/// Results for one modality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityReport {
    pub modality: Modality,

    /// Nominal projection, scenario applied
    pub nominal: ProjectionResult,

    /// Inflation-deflated projection, scenario applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real: Option<ProjectionResult>,

    pub goal: GoalScenario,
    pub risk: RiskMetrics,

    /// Administration plus brokerage fees over the horizon; informational, not netted
    pub estimated_fees: f64,
}

/// Everything produced by one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub scenario_description: String,
    pub financial_goal: f64,
    pub horizon_months: i32,
    pub include_inflation: bool,
    pub include_taxes: bool,

    /// Annual inflation used for real runs and risk metrics
    pub inflation_annual: f64,

    pub modalities: Vec<ModalityReport>,
}

impl SimulationReport {
    pub fn get(&self, modality: Modality) -> Option<&ModalityReport> {
        self.modalities.iter().find(|m| m.modality == modality)
    }

    /// Sum of contributions across modalities
    pub fn total_contributed(&self) -> f64 {
        self.modalities.iter().map(|m| m.nominal.total_contributed).sum()
    }

    /// Mean nominal final balance, 0 when nothing was simulated
    pub fn mean_final_balance(&self) -> f64 {
        if self.modalities.is_empty() {
            return 0.0;
        }
        self.modalities.iter().map(|m| m.nominal.final_balance).sum::<f64>()
            / self.modalities.len() as f64
    }

    /// Modality with the highest nominal final balance
    pub fn best_modality(&self) -> Option<&ModalityReport> {
        self.modalities
            .iter()
            .max_by(|a, b| a.nominal.final_balance.total_cmp(&b.nominal.final_balance))
    }
}

/// One row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub modality: Modality,
    pub label: String,
    pub total_contributed: f64,
    pub final_balance: f64,
    pub earnings: f64,
    pub return_pct: f64,
    pub meets_goal: bool,

    pub real_final_balance: Option<f64>,
    pub real_earnings: Option<f64>,
    pub real_return_pct: Option<f64>,

    /// Withheld taxes, when taxes were included
    pub taxes: Option<f64>,

    pub estimated_fees: f64,
}

/// Comparison rows in report order
pub fn compare(report: &SimulationReport) -> Vec<ComparisonRow> {
    report
        .modalities
        .iter()
        .map(|m| {
            let nominal = &m.nominal;
            ComparisonRow {
                modality: m.modality,
                label: m.modality.label().to_string(),
                total_contributed: nominal.total_contributed,
                final_balance: nominal.final_balance,
                earnings: nominal.final_balance - nominal.total_contributed,
                return_pct: nominal.return_pct(),
                meets_goal: GoalScenario::meets_goal(nominal.final_balance, report.financial_goal),
                real_final_balance: m.real.as_ref().map(|r| r.final_balance),
                real_earnings: m.real.as_ref().map(|r| r.final_balance - r.total_contributed),
                real_return_pct: m.real.as_ref().map(ProjectionResult::return_pct),
                taxes: report.include_taxes.then_some(nominal.taxes),
                estimated_fees: m.estimated_fees,
            }
        })
        .collect()
}
