//! Contribution events generated by walking a date range
//!
//! Two different notions of "month" live here and both are load-bearing:
//! - The scheduler walks in fixed 30-day steps and counts every step as one
//!   elapsed month, even when a quarterly/annual filter skips the deposit.
//! - The compounding horizon is the calendar-month difference between the
//!   start and end dates.
//!
//! Over long ranges the two drift apart. The projection engine depends on
//! both exactly as computed here.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Length of one scheduler step in days
pub const STEP_DAYS: u64 = 30;

/// How often a contribution is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every step
    Monthly,
    /// Steps landing in January, April, July or October
    Quarterly,
    /// Steps landing in January
    Annually,
}

impl Frequency {
    /// Whether a step landing on `date` produces a contribution
    pub fn contributes_on(&self, date: NaiveDate) -> bool {
        match self {
            Frequency::Monthly => true,
            Frequency::Quarterly => matches!(date.month(), 1 | 4 | 7 | 10),
            Frequency::Annually => date.month() == 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annually => "annually",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "annually" | "annual" | "yearly" => Ok(Frequency::Annually),
            other => Err(ProjectionError::UnknownFrequency(other.to_string())),
        }
    }
}

/// A single deposit into an instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Date the deposit is made
    pub date: NaiveDate,

    /// Deposited amount (never negative)
    pub amount: f64,

    /// Scheduler steps elapsed since the start date
    pub elapsed_months: u32,
}

/// Enumerate contributions from `start` to `end` (inclusive)
///
/// Negative amounts are treated as zero. An empty list is returned when
/// `start` is after `end`.
pub fn schedule(
    amount: f64,
    frequency: Frequency,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Contribution> {
    let amount = amount.max(0.0);
    let mut contributions = Vec::new();
    let mut current = start;
    let mut elapsed_months = 0u32;

    while current <= end {
        if frequency.contributes_on(current) {
            contributions.push(Contribution {
                date: current,
                amount,
                elapsed_months,
            });
        }

        elapsed_months += 1;
        match current.checked_add_days(Days::new(STEP_DAYS)) {
            Some(next) => current = next,
            None => break,
        }
    }

    let horizon = horizon_months(start, end);
    if i64::from(elapsed_months) != i64::from(horizon) {
        debug!(
            "schedule {} from {} to {}: {} steps vs {} calendar months",
            frequency, start, end, elapsed_months, horizon
        );
    }

    contributions
}

/// Calendar-month distance between two dates, ignoring the day of month
///
/// Negative when `end` precedes `start`.
pub fn horizon_months(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}
