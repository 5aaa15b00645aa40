//! Core data models for the pay calculation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation;
mod catalog;
mod compliance;
mod timesheet;
mod worker;

pub use calculation::{AllowanceLine, CalculationTotals, ShiftCalculation, TimesheetCalculation};
pub use catalog::{
    AllowanceRule, AllowanceType, Award, Classification, PayRate, PenaltyRule, PenaltyType,
    PublicHoliday,
};
pub use compliance::{ComplianceCheckLog, ComplianceOutcome};
pub use timesheet::{Shift, Timesheet};
pub use worker::{Placement, Worker};
