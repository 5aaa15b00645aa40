//! Day-type classification.
//!
//! This module determines the day type (weekday, Saturday, Sunday, public
//! holiday) for a shift date, which drives penalty rate selection.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::catalog::RateCatalog;
use crate::models::PenaltyType;

/// The type of day a shift falls on, for penalty rate selection.
///
/// # Example
///
/// ```
/// use apprentice_pay_engine::calculation::DayType;
///
/// let day_type = DayType::Saturday;
/// assert_eq!(format!("{day_type}"), "Saturday");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday, no public holiday.
    Weekday,
    /// Saturday, no public holiday.
    Saturday,
    /// Sunday, no public holiday.
    Sunday,
    /// A public holiday in the relevant jurisdiction (overrides weekday/weekend).
    PublicHoliday,
}

impl DayType {
    /// Maps the day type to the penalty condition it attracts.
    ///
    /// Weekdays attract no day-type penalty.
    pub fn penalty_type(self) -> Option<PenaltyType> {
        match self {
            DayType::Weekday => None,
            DayType::Saturday => Some(PenaltyType::Saturday),
            DayType::Sunday => Some(PenaltyType::Sunday),
            DayType::PublicHoliday => Some(PenaltyType::PublicHoliday),
        }
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Saturday => write!(f, "Saturday"),
            DayType::Sunday => write!(f, "Sunday"),
            DayType::PublicHoliday => write!(f, "Public holiday"),
        }
    }
}

/// Classifies a date for a jurisdiction.
///
/// Public holiday membership is checked first (it overrides weekday and
/// weekend), then day-of-week. Callers holding a shift with an explicit
/// `day_type` override must use the override instead of calling this.
///
/// # Example
///
/// ```
/// use apprentice_pay_engine::calculation::{DayType, classify};
/// use apprentice_pay_engine::catalog::RateCatalog;
/// use chrono::NaiveDate;
///
/// let catalog = RateCatalog::new();
/// // 2026-01-17 is a Saturday
/// let date = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
/// assert_eq!(classify(date, "NSW", &catalog), DayType::Saturday);
/// ```
pub fn classify(date: NaiveDate, jurisdiction: &str, catalog: &RateCatalog) -> DayType {
    if catalog.is_public_holiday(jurisdiction, date) {
        return DayType::PublicHoliday;
    }

    match date.weekday() {
        Weekday::Sat => DayType::Saturday,
        Weekday::Sun => DayType::Sunday,
        _ => DayType::Weekday,
    }
}
