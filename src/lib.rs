//! Investment projection engine
//!
//! This library provides:
//! - Contribution schedules over a date range
//! - Fixed-income, treasury bond and variable-income projections
//! - Tax, inflation and economic-scenario adjustments
//! - Goal solving and risk metrics over projected balances
//! - A session simulator with an asset catalog and saved portfolios

pub mod assumptions;
pub mod catalog;
pub mod error;
pub mod goal;
pub mod projection;
pub mod report;
pub mod risk;
pub mod scenario;
pub mod schedule;
pub mod simulator;

// Re-export commonly used types
pub use assumptions::MarketAssumptions;
pub use catalog::{AssetCatalog, AssetClass, AssetLookup};
pub use error::{ProjectionError, Result};
pub use goal::{goal_scenario, GoalScenario, MonthsToGoal};
pub use projection::{Instrument, ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use risk::RiskMetrics;
pub use scenario::ScenarioAdjuster;
pub use schedule::Frequency;
pub use simulator::{Modality, SimulationParams, SimulationReport, Simulator};
