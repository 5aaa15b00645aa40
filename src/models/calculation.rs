//! Calculation result models.
//!
//! This module contains the per-shift [`ShiftCalculation`] and the
//! per-timesheet [`TimesheetCalculation`] that capture all outputs from a
//! pay calculation, including allowance lines, totals, and applied-rule
//! tags for audit.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::DayType;

use super::AllowanceType;

/// A single allowance applied to a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceLine {
    /// The name of the allowance (e.g., "Tool allowance").
    pub name: String,
    /// How the allowance amount was scaled.
    #[serde(rename = "type")]
    pub allowance_type: AllowanceType,
    /// The amount paid for this allowance on this shift.
    pub amount: Decimal,
}

/// The complete pay calculation for one shift.
///
/// Base pay and the penalty uplift are reported separately to keep the
/// aggregate interpretable: `penalty_amount` is strictly the uplift over
/// base pay, not the full penalty-rate pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCalculation {
    /// The shift this calculation is for.
    pub shift_id: String,
    /// The date of the shift.
    pub date: NaiveDate,
    /// The day type the shift was paid under.
    pub day_type: DayType,
    /// The base hourly rate applied.
    pub base_rate: Decimal,
    /// Hours worked after the break deduction.
    pub hours_worked: Decimal,
    /// `base_rate * hours_worked`.
    pub base_amount: Decimal,
    /// The penalty multiplier applied, if a penalty rule matched.
    pub penalty_multiplier: Option<Decimal>,
    /// The full penalty hourly rate (`base_rate * multiplier`), if any.
    pub penalty_rate: Option<Decimal>,
    /// The penalty uplift over base pay (zero when no rule matched).
    pub penalty_amount: Decimal,
    /// Allowances applied to this shift.
    pub allowances: Vec<AllowanceLine>,
    /// `base_amount + penalty_amount + sum of allowances`.
    pub total_amount: Decimal,
    /// Ordered tags of the rules applied, for audit and debugging only.
    pub applied_rules: Vec<String>,
}

/// Aggregated totals across all shifts in a timesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationTotals {
    /// Total hours worked.
    pub hours: Decimal,
    /// Total base pay.
    pub base_pay: Decimal,
    /// Total penalty uplift.
    pub penalty_pay: Decimal,
    /// Total allowances.
    pub allowances: Decimal,
    /// Gross pay: base + penalty + allowances.
    pub gross_pay: Decimal,
}

impl CalculationTotals {
    /// Returns all-zero totals.
    pub fn zero() -> Self {
        Self {
            hours: Decimal::ZERO,
            base_pay: Decimal::ZERO,
            penalty_pay: Decimal::ZERO,
            allowances: Decimal::ZERO,
            gross_pay: Decimal::ZERO,
        }
    }
}

/// The persisted pay calculation for one timesheet.
///
/// Exactly one current calculation exists per timesheet: recalculation
/// replaces the stored row in place, keeping `id` stable. The award and
/// classification names are denormalized at calculation time so the record
/// stays meaningful for audit even if the catalog later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetCalculation {
    /// Unique identifier for this calculation row.
    pub calculation_id: Uuid,
    /// The timesheet this calculation is for.
    pub timesheet_id: String,
    /// Snapshot of the award code used.
    pub award_code: String,
    /// Snapshot of the award name used.
    pub award_name: String,
    /// Snapshot of the classification name used.
    pub classification_name: String,
    /// The apprenticeship year the rates were resolved for.
    pub apprenticeship_year: u8,
    /// Per-shift calculation results.
    pub shifts: Vec<ShiftCalculation>,
    /// How many shifts were skipped for missing date or time data.
    pub skipped_shifts: u32,
    /// Aggregated totals.
    pub totals: CalculationTotals,
    /// When the calculation was performed.
    pub calculated_at: DateTime<Utc>,
}
