//! Projection engine for fixed-income, treasury and variable-income instruments

mod engine;
mod result;

pub use engine::{
    average_estimates, variable_income_tax_class, Instrument, ProjectionConfig, ProjectionEngine,
    Withdrawal,
};
pub use result::{HistoryFlow, HistoryPoint, InstrumentDetails, ProjectionResult, WithdrawalOutcome};
