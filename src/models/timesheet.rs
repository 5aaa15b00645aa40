//! Shift and timesheet models.
//!
//! This module defines the Shift and Timesheet structs for representing
//! worked time submitted for pay calculation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DayType;

use super::{Placement, Worker};

/// Represents a single worked shift.
///
/// Clock times are local `HH:MM` strings parsed strictly at calculation
/// time. Date and times are optional so that draft shifts can be carried
/// on a timesheet; shifts missing any of them are skipped during
/// aggregation, while shifts with present but malformed fields fail the
/// whole timesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// The date the shift was worked.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// The start time as a 24-hour "HH:MM" clock string.
    #[serde(default)]
    pub start_time: Option<String>,
    /// The end time as a 24-hour "HH:MM" clock string.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Unpaid break duration in hours.
    #[serde(default)]
    pub break_duration: Decimal,
    /// Explicit day-type override.
    ///
    /// When set, the public holiday calendar and day-of-week are ignored.
    /// This lets callers backfill historical shifts whose holiday status
    /// may have changed since.
    #[serde(default)]
    pub day_type: Option<DayType>,
}

impl Shift {
    /// Returns true if the shift has a date and both clock times present.
    ///
    /// Shifts failing this check are skipped (not failed) by timesheet
    /// aggregation.
    pub fn has_time_data(&self) -> bool {
        self.date.is_some() && self.start_time.is_some() && self.end_time.is_some()
    }
}

/// An ordered collection of shifts for one worker and placement.
///
/// Shift order carries no meaning for pay: aggregate totals are a
/// commutative sum over shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timesheet {
    /// Unique identifier for the timesheet.
    pub id: String,
    /// The worker the timesheet belongs to.
    pub worker: Worker,
    /// The placement the work was performed under.
    pub placement: Placement,
    /// The shifts submitted on this timesheet.
    #[serde(default)]
    pub shifts: Vec<Shift>,
}
