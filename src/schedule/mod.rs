//! Contribution scheduling over a date range

mod contributions;

pub use contributions::{horizon_months, schedule, Contribution, Frequency, STEP_DAYS};
