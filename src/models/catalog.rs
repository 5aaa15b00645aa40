//! Catalog entities: awards, classifications, rates, rules, and holidays.
//!
//! These entities are owned by the external catalog sync process; the
//! engine only reads them through [`crate::catalog::RateCatalog`].

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A jurisdiction's minimum-pay instrument covering an industry or occupation.
///
/// Immutable once referenced by a rate; superseded versions carry their own
/// effective date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    /// Unique identifier for the award.
    pub id: Uuid,
    /// The Fair Work award code (e.g., "MA000025").
    pub code: String,
    /// The human-readable name of the award.
    pub name: String,
    /// The industry the award covers, if recorded.
    #[serde(default)]
    pub industry: Option<String>,
    /// Reference to the official Fair Work documentation.
    #[serde(default)]
    pub fair_work_reference: Option<String>,
    /// The date this version of the award took effect.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    /// Whether this award version is currently active.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// A pay grade or level within an award (e.g., "Apprentice Year 2").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Unique identifier for the classification.
    pub id: Uuid,
    /// The award this classification belongs to.
    pub award_id: Uuid,
    /// The human-readable name of the classification.
    pub name: String,
    /// The level label (e.g., "Apprentice Year 1", "Tradesperson").
    pub level: String,
    /// Optional Australian Qualifications Framework level tag.
    #[serde(default)]
    pub aqf_level: Option<u8>,
    /// The Fair Work level code, if supplied by the sync gateway.
    #[serde(default)]
    pub fair_work_level_code: Option<String>,
}

/// A time-bounded hourly rate for one classification.
///
/// Invariant: for a given (classification, apprenticeship year,
/// apprentice-flag) tuple, effective windows must not overlap, so at most
/// one rate is active on any date. Windows are `[effective_from,
/// effective_to)`; a missing `effective_to` means open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRate {
    /// Unique identifier for the rate row.
    pub id: Uuid,
    /// The classification this rate belongs to.
    pub classification_id: Uuid,
    /// The hourly rate in dollars.
    pub hourly_rate: Decimal,
    /// First date (inclusive) the rate is in force.
    pub effective_from: NaiveDate,
    /// First date (exclusive) the rate is no longer in force; `None` = open.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Whether this is an apprentice percentage rate.
    pub is_apprentice_rate: bool,
    /// The apprenticeship year (1-4); `None` for non-apprentice rates.
    #[serde(default)]
    pub apprenticeship_year: Option<u8>,
}

impl PayRate {
    /// Returns true if the effective window contains the given date.
    pub fn in_force(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date < to)
    }
}

/// The condition a penalty multiplier compensates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyType {
    /// Overtime worked on an ordinary weekday.
    WeekdayOvertime,
    /// Work performed on a Saturday.
    Saturday,
    /// Work performed on a Sunday.
    Sunday,
    /// Work performed on a public holiday.
    PublicHoliday,
}

/// A multiplier applied to the base rate for work under specified conditions.
///
/// Optionally scoped to a classification; classification-scoped rules take
/// precedence over award-wide rules for the same penalty type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyRule {
    /// Unique identifier for the rule.
    pub id: Uuid,
    /// The award this rule belongs to.
    pub award_id: Uuid,
    /// The classification this rule is scoped to; `None` = award-wide.
    #[serde(default)]
    pub classification_id: Option<Uuid>,
    /// The condition this rule compensates for.
    pub penalty_type: PenaltyType,
    /// The multiplier applied to the base rate (> 1.0).
    pub multiplier: Decimal,
    /// Optional restriction to a single day of the week.
    #[serde(default)]
    pub day_of_week: Option<Weekday>,
    /// Optional earliest shift start time for the rule to apply.
    #[serde(default)]
    pub time_start: Option<NaiveTime>,
    /// Optional latest shift end time for the rule to apply.
    #[serde(default)]
    pub time_end: Option<NaiveTime>,
    /// First date (inclusive) the rule is in force.
    pub effective_from: NaiveDate,
    /// First date (exclusive) the rule is no longer in force; `None` = open.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl PenaltyRule {
    /// Returns true if the effective window contains the given date.
    pub fn in_force(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date < to)
    }
}

/// How an allowance amount scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceType {
    /// Multiplied by hours worked in the shift.
    PerHour,
    /// Paid once per shift.
    PerShift,
    /// A fixed amount, paid once per shift.
    Fixed,
}

/// A fixed or hours-proportional payment on top of ordinary and penalty pay.
///
/// Optionally scoped to a classification; a classification-scoped rule
/// shadows an award-wide rule with the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceRule {
    /// Unique identifier for the rule.
    pub id: Uuid,
    /// The award this rule belongs to.
    pub award_id: Uuid,
    /// The classification this rule is scoped to; `None` = award-wide.
    #[serde(default)]
    pub classification_id: Option<Uuid>,
    /// The name of the allowance (e.g., "Tool allowance").
    pub name: String,
    /// How the amount scales.
    pub allowance_type: AllowanceType,
    /// The nonnegative amount in dollars (per hour or per shift).
    pub amount: Decimal,
    /// First date (inclusive) the rule is in force.
    pub effective_from: NaiveDate,
    /// First date (exclusive) the rule is no longer in force; `None` = open.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl AllowanceRule {
    /// Returns true if the effective window contains the given date.
    pub fn in_force(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date < to)
    }
}

/// A public holiday, used only for membership testing on a given date.
///
/// A holiday with jurisdiction `"national"` applies in every jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The jurisdiction the holiday applies in (e.g., "NSW", "national").
    pub jurisdiction: String,
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday (e.g., "Australia Day").
    pub name: String,
}
