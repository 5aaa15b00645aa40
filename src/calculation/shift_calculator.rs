//! Per-shift pay calculation.
//!
//! Composes the base amount, the penalty uplift, and allowance lines into
//! a single [`ShiftCalculation`]. Penalty pay is reported as the uplift
//! over base pay so that base and penalty totals stay independently
//! meaningful in aggregates.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::RateCatalog;
use crate::error::{EngineError, EngineResult};
use crate::models::{AllowanceLine, AllowanceType, Shift, ShiftCalculation};

use super::day_classifier::classify;
use super::ResolvedPlacement;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Parses a strict 24-hour `"HH:MM"` clock string.
///
/// Accepts exactly five characters with a colon separator, hours 00-23
/// and minutes 00-59. Anything else (seconds, single digits, "24:00",
/// surrounding whitespace) is rejected.
///
/// # Example
///
/// ```
/// use apprentice_pay_engine::calculation::parse_clock_time;
///
/// assert!(parse_clock_time("09:30").is_some());
/// assert!(parse_clock_time("9:30").is_none());
/// assert!(parse_clock_time("24:00").is_none());
/// ```
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    if value.len() != 5 || value.as_bytes()[2] != b':' {
        return None;
    }
    let hours: u32 = value[..2].parse().ok()?;
    let minutes: u32 = value[3..].parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Calculates pay for individual shifts against a resolved placement.
///
/// Stateless; rates, penalty rules, and allowances are looked up per shift
/// date so that a timesheet spanning a rate change pays each shift under
/// the rate in force on its own date.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftCalculator;

impl ShiftCalculator {
    /// Creates a shift calculator.
    pub fn new() -> Self {
        Self
    }

    /// Calculates the complete pay for one shift.
    ///
    /// The shift must carry a date and both clock times; aggregation skips
    /// incomplete shifts before calling this.
    ///
    /// # Errors
    ///
    /// - `InvalidTimeRange` when a clock string is malformed, the end is
    ///   not after the start (overnight shifts are rejected), or the break
    ///   consumes the whole shift.
    /// - `RateNotFound`/`AmbiguousRate` from the rate lookup for the
    ///   shift's date.
    pub fn calculate(
        &self,
        shift: &Shift,
        resolved: &ResolvedPlacement,
        jurisdiction: &str,
        catalog: &RateCatalog,
    ) -> EngineResult<ShiftCalculation> {
        let (Some(date), Some(start_raw), Some(end_raw)) =
            (shift.date, shift.start_time.as_deref(), shift.end_time.as_deref())
        else {
            return Err(EngineError::InvalidTimeRange {
                shift_id: shift.id.clone(),
                message: "shift is missing its date or clock times".to_string(),
            });
        };

        let start = parse_clock_time(start_raw).ok_or_else(|| EngineError::InvalidTimeRange {
            shift_id: shift.id.clone(),
            message: format!("start time {start_raw:?} is not a valid HH:MM clock time"),
        })?;
        let end = parse_clock_time(end_raw).ok_or_else(|| EngineError::InvalidTimeRange {
            shift_id: shift.id.clone(),
            message: format!("end time {end_raw:?} is not a valid HH:MM clock time"),
        })?;

        if end <= start {
            return Err(EngineError::InvalidTimeRange {
                shift_id: shift.id.clone(),
                message: format!(
                    "end time {end_raw} must be after start time {start_raw} on the same day"
                ),
            });
        }

        let elapsed_minutes = Decimal::from((end - start).num_minutes());
        let hours_worked = elapsed_minutes / MINUTES_PER_HOUR - shift.break_duration;
        if hours_worked <= Decimal::ZERO {
            return Err(EngineError::InvalidTimeRange {
                shift_id: shift.id.clone(),
                message: format!(
                    "break of {} hours leaves no paid time between {start_raw} and {end_raw}",
                    shift.break_duration
                ),
            });
        }

        let rate = catalog.rate_as_of(
            resolved.classification_id,
            Some(resolved.apprenticeship_year),
            true,
            date,
        )?;
        let base_rate = rate.hourly_rate;
        let base_amount = base_rate * hours_worked;

        let day_type = shift
            .day_type
            .unwrap_or_else(|| classify(date, jurisdiction, catalog));

        let mut applied_rules = vec!["base_rate".to_string()];

        let penalty_rule = day_type.penalty_type().and_then(|penalty_type| {
            catalog.penalty_as_of(
                resolved.award_id,
                resolved.classification_id,
                penalty_type,
                date,
                start,
                end,
            )
        });
        let (penalty_multiplier, penalty_rate, penalty_amount) = match penalty_rule {
            Some(rule) => {
                applied_rules.push("penalty".to_string());
                (
                    Some(rule.multiplier),
                    Some(base_rate * rule.multiplier),
                    (rule.multiplier - Decimal::ONE) * base_rate * hours_worked,
                )
            }
            None => (None, None, Decimal::ZERO),
        };

        let allowances: Vec<AllowanceLine> = catalog
            .allowances_as_of(resolved.award_id, resolved.classification_id, date)
            .into_iter()
            .filter_map(|rule| {
                let amount = match rule.allowance_type {
                    AllowanceType::PerHour => rule.amount * hours_worked,
                    AllowanceType::PerShift | AllowanceType::Fixed => rule.amount,
                };
                (amount > Decimal::ZERO).then(|| AllowanceLine {
                    name: rule.name.clone(),
                    allowance_type: rule.allowance_type,
                    amount,
                })
            })
            .collect();
        if !allowances.is_empty() {
            applied_rules.push("allowances".to_string());
        }

        let allowance_total: Decimal = allowances.iter().map(|a| a.amount).sum();
        let total_amount = base_amount + penalty_amount + allowance_total;

        debug!(
            shift = %shift.id,
            %date,
            %day_type,
            %hours_worked,
            %total_amount,
            "calculated shift pay"
        );

        Ok(ShiftCalculation {
            shift_id: shift.id.clone(),
            date,
            day_type,
            base_rate,
            hours_worked,
            base_amount,
            penalty_multiplier,
            penalty_rate,
            penalty_amount,
            allowances,
            total_amount,
            applied_rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::DayType;
    use crate::catalog::{AwardUpsert, ClassificationUpsert, PayRateUpsert};
    use crate::models::{AllowanceRule, PenaltyRule, PenaltyType, PublicHoliday};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        catalog: RateCatalog,
        resolved: ResolvedPlacement,
    }

    fn fixture(hourly: &str) -> Fixture {
        let mut catalog = RateCatalog::new();
        let award_id = catalog.upsert_award(AwardUpsert {
            code: "MA000025".to_string(),
            name: "Electrical Award".to_string(),
            industry: None,
            fair_work_reference: None,
            effective_date: None,
        });
        let classification_id = catalog
            .upsert_classification(ClassificationUpsert {
                award_code: "MA000025".to_string(),
                name: "Apprentice Year 2".to_string(),
                level: "Apprentice Year 2".to_string(),
                aqf_level: None,
                fair_work_level_code: None,
            })
            .unwrap();
        catalog.upsert_pay_rate(PayRateUpsert {
            classification_id,
            hourly_rate: dec(hourly),
            effective_from: make_date("2025-07-01"),
            effective_to: None,
            is_apprentice_rate: true,
            apprenticeship_year: Some(2),
        });

        let resolved = ResolvedPlacement {
            award_id,
            award_code: "MA000025".to_string(),
            award_name: "Electrical Award".to_string(),
            classification_id,
            classification_name: "Apprentice Year 2".to_string(),
            apprenticeship_year: 2,
            hourly_rate: dec(hourly),
        };
        Fixture { catalog, resolved }
    }

    fn saturday_rule(award_id: Uuid, multiplier: &str) -> PenaltyRule {
        PenaltyRule {
            id: Uuid::new_v4(),
            award_id,
            classification_id: None,
            penalty_type: PenaltyType::Saturday,
            multiplier: dec(multiplier),
            day_of_week: None,
            time_start: None,
            time_end: None,
            effective_from: make_date("2025-07-01"),
            effective_to: None,
        }
    }

    fn shift(date: &str, start: &str, end: &str, break_hours: &str) -> Shift {
        Shift {
            id: "shift_001".to_string(),
            date: Some(make_date(date)),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            break_duration: dec(break_hours),
            day_type: None,
        }
    }

    /// SC-001: Saturday shift with 1.5x penalty pays base plus the uplift
    #[test]
    fn test_saturday_penalty_uplift() {
        let mut fx = fixture("25.00");
        fx.catalog
            .insert_penalty_rule(saturday_rule(fx.resolved.award_id, "1.5"));

        // 2026-01-17 is a Saturday
        let calc = ShiftCalculator::new()
            .calculate(
                &shift("2026-01-17", "08:00", "16:00", "0.5"),
                &fx.resolved,
                "NSW",
                &fx.catalog,
            )
            .unwrap();

        assert_eq!(calc.day_type, DayType::Saturday);
        assert_eq!(calc.hours_worked, dec("7.5"));
        assert_eq!(calc.base_amount, dec("187.50"));
        assert_eq!(calc.penalty_multiplier, Some(dec("1.5")));
        assert_eq!(calc.penalty_rate, Some(dec("37.500")));
        assert_eq!(calc.penalty_amount, dec("93.750"));
        assert_eq!(calc.total_amount, dec("281.250"));
        assert_eq!(calc.applied_rules, vec!["base_rate", "penalty"]);
    }

    /// SC-002: plain weekday shift pays base only
    #[test]
    fn test_weekday_base_only() {
        let fx = fixture("25.00");

        // 2026-01-15 is a Thursday
        let calc = ShiftCalculator::new()
            .calculate(
                &shift("2026-01-15", "09:00", "17:00", "1"),
                &fx.resolved,
                "NSW",
                &fx.catalog,
            )
            .unwrap();

        assert_eq!(calc.day_type, DayType::Weekday);
        assert_eq!(calc.hours_worked, dec("7"));
        assert_eq!(calc.base_amount, dec("175.00"));
        assert_eq!(calc.penalty_amount, Decimal::ZERO);
        assert!(calc.penalty_multiplier.is_none());
        assert_eq!(calc.total_amount, dec("175.00"));
        assert_eq!(calc.applied_rules, vec!["base_rate"]);
    }

    /// SC-003: per-hour allowance scales by hours worked
    #[test]
    fn test_per_hour_allowance() {
        let mut fx = fixture("25.00");
        fx.catalog.insert_allowance_rule(AllowanceRule {
            id: Uuid::new_v4(),
            award_id: fx.resolved.award_id,
            classification_id: None,
            name: "Tool allowance".to_string(),
            allowance_type: AllowanceType::PerHour,
            amount: dec("2.00"),
            effective_from: make_date("2025-07-01"),
            effective_to: None,
        });

        let calc = ShiftCalculator::new()
            .calculate(
                &shift("2026-01-15", "09:00", "17:00", "1"),
                &fx.resolved,
                "NSW",
                &fx.catalog,
            )
            .unwrap();

        assert_eq!(calc.allowances.len(), 1);
        assert_eq!(calc.allowances[0].amount, dec("14.00"));
        assert_eq!(calc.total_amount, dec("189.00"));
        assert_eq!(calc.applied_rules, vec!["base_rate", "allowances"]);
    }

    /// SC-004: per-shift allowance is paid once regardless of hours
    #[test]
    fn test_per_shift_allowance() {
        let mut fx = fixture("25.00");
        fx.catalog.insert_allowance_rule(AllowanceRule {
            id: Uuid::new_v4(),
            award_id: fx.resolved.award_id,
            classification_id: None,
            name: "Travel allowance".to_string(),
            allowance_type: AllowanceType::PerShift,
            amount: dec("17.43"),
            effective_from: make_date("2025-07-01"),
            effective_to: None,
        });

        let calc = ShiftCalculator::new()
            .calculate(
                &shift("2026-01-15", "09:00", "17:00", "1"),
                &fx.resolved,
                "NSW",
                &fx.catalog,
            )
            .unwrap();

        assert_eq!(calc.allowances[0].amount, dec("17.43"));
        assert_eq!(calc.total_amount, dec("192.43"));
    }

    /// SC-005: end before start is rejected, not wrapped overnight
    #[test]
    fn test_reversed_times_rejected() {
        let fx = fixture("25.00");

        let result = ShiftCalculator::new().calculate(
            &shift("2026-01-15", "16:00", "08:00", "0"),
            &fx.resolved,
            "NSW",
            &fx.catalog,
        );

        match result {
            Err(EngineError::InvalidTimeRange { shift_id, .. }) => {
                assert_eq!(shift_id, "shift_001");
            }
            other => panic!("Expected InvalidTimeRange, got {other:?}"),
        }
    }

    /// SC-006: malformed clock string fails the shift
    #[test]
    fn test_malformed_clock_rejected() {
        let fx = fixture("25.00");

        let result = ShiftCalculator::new().calculate(
            &shift("2026-01-15", "9am", "17:00", "0"),
            &fx.resolved,
            "NSW",
            &fx.catalog,
        );
        assert!(matches!(result, Err(EngineError::InvalidTimeRange { .. })));
    }

    /// SC-007: break consuming the whole shift is rejected
    #[test]
    fn test_break_consuming_shift_rejected() {
        let fx = fixture("25.00");

        let result = ShiftCalculator::new().calculate(
            &shift("2026-01-15", "09:00", "10:00", "1.5"),
            &fx.resolved,
            "NSW",
            &fx.catalog,
        );
        assert!(matches!(result, Err(EngineError::InvalidTimeRange { .. })));
    }

    /// SC-008: explicit day-type override wins over the calendar
    #[test]
    fn test_day_type_override_wins() {
        let mut fx = fixture("25.00");
        fx.catalog.insert_penalty_rule(PenaltyRule {
            penalty_type: PenaltyType::PublicHoliday,
            multiplier: dec("2.5"),
            ..saturday_rule(fx.resolved.award_id, "1.0")
        });

        // 2026-01-15 is an ordinary Thursday, but the override says holiday
        let mut s = shift("2026-01-15", "09:00", "17:00", "1");
        s.day_type = Some(DayType::PublicHoliday);

        let calc = ShiftCalculator::new()
            .calculate(&s, &fx.resolved, "NSW", &fx.catalog)
            .unwrap();

        assert_eq!(calc.day_type, DayType::PublicHoliday);
        assert_eq!(calc.penalty_multiplier, Some(dec("2.5")));
    }

    /// SC-009: holiday calendar drives the penalty without an override
    #[test]
    fn test_holiday_from_calendar() {
        let mut fx = fixture("25.00");
        fx.catalog.insert_public_holiday(PublicHoliday {
            jurisdiction: "NSW".to_string(),
            date: make_date("2026-01-26"),
            name: "Australia Day".to_string(),
        });
        fx.catalog.insert_penalty_rule(PenaltyRule {
            penalty_type: PenaltyType::PublicHoliday,
            multiplier: dec("2.5"),
            ..saturday_rule(fx.resolved.award_id, "1.0")
        });

        let calc = ShiftCalculator::new()
            .calculate(
                &shift("2026-01-26", "09:00", "17:00", "1"),
                &fx.resolved,
                "NSW",
                &fx.catalog,
            )
            .unwrap();

        assert_eq!(calc.day_type, DayType::PublicHoliday);
        assert_eq!(calc.penalty_amount, dec("262.500"));
    }

    /// SC-010: rate is looked up on the shift's own date
    #[test]
    fn test_rate_resolved_per_shift_date() {
        let mut fx = fixture("25.00");
        // Close the current window and open a new one at a higher rate
        fx.catalog.upsert_pay_rate(PayRateUpsert {
            classification_id: fx.resolved.classification_id,
            hourly_rate: dec("25.00"),
            effective_from: make_date("2025-07-01"),
            effective_to: Some(make_date("2026-07-01")),
            is_apprentice_rate: true,
            apprenticeship_year: Some(2),
        });
        fx.catalog.upsert_pay_rate(PayRateUpsert {
            classification_id: fx.resolved.classification_id,
            hourly_rate: dec("26.00"),
            effective_from: make_date("2026-07-01"),
            effective_to: None,
            is_apprentice_rate: true,
            apprenticeship_year: Some(2),
        });

        let calc = ShiftCalculator::new()
            .calculate(
                &shift("2026-07-02", "09:00", "17:00", "1"),
                &fx.resolved,
                "NSW",
                &fx.catalog,
            )
            .unwrap();
        assert_eq!(calc.base_rate, dec("26.00"));
    }

    /// SC-011: zero-amount allowance lines are discarded
    #[test]
    fn test_zero_allowance_discarded() {
        let mut fx = fixture("25.00");
        fx.catalog.insert_allowance_rule(AllowanceRule {
            id: Uuid::new_v4(),
            award_id: fx.resolved.award_id,
            classification_id: None,
            name: "Suspended allowance".to_string(),
            allowance_type: AllowanceType::PerShift,
            amount: Decimal::ZERO,
            effective_from: make_date("2025-07-01"),
            effective_to: None,
        });

        let calc = ShiftCalculator::new()
            .calculate(
                &shift("2026-01-15", "09:00", "17:00", "1"),
                &fx.resolved,
                "NSW",
                &fx.catalog,
            )
            .unwrap();
        assert!(calc.allowances.is_empty());
        assert_eq!(calc.applied_rules, vec!["base_rate"]);
    }

    #[test]
    fn test_parse_clock_time_strictness() {
        assert_eq!(
            parse_clock_time("09:30"),
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(
            parse_clock_time("00:00"),
            NaiveTime::from_hms_opt(0, 0, 0)
        );
        assert_eq!(
            parse_clock_time("23:59"),
            NaiveTime::from_hms_opt(23, 59, 0)
        );
        assert!(parse_clock_time("24:00").is_none());
        assert!(parse_clock_time("12:60").is_none());
        assert!(parse_clock_time("9:30").is_none());
        assert!(parse_clock_time("09:30:00").is_none());
        assert!(parse_clock_time("0930").is_none());
        assert!(parse_clock_time(" 9:30").is_none());
        assert!(parse_clock_time("ab:cd").is_none());
        assert!(parse_clock_time("").is_none());
    }

    proptest! {
        /// The penalty uplift identity: for any rate, multiplier, and
        /// duration, penalty_amount == (m - 1) * rate * hours and the
        /// total equals base + uplift.
        #[test]
        fn prop_penalty_amount_is_uplift(
            rate_cents in 100u32..10_000,
            multiplier_hundredths in 100u32..400,
            whole_hours in 1u32..12,
        ) {
            let rate = Decimal::new(i64::from(rate_cents), 2);
            let multiplier = Decimal::new(i64::from(multiplier_hundredths), 2);

            let mut fx = fixture("25.00");
            fx.catalog.upsert_pay_rate(PayRateUpsert {
                classification_id: fx.resolved.classification_id,
                hourly_rate: rate,
                effective_from: make_date("2025-07-01"),
                effective_to: None,
                is_apprentice_rate: true,
                apprenticeship_year: Some(2),
            });
            fx.catalog.insert_penalty_rule(PenaltyRule {
                multiplier,
                ..saturday_rule(fx.resolved.award_id, "1.0")
            });

            let end = format!("{:02}:00", 6 + whole_hours);
            let calc = ShiftCalculator::new()
                .calculate(
                    // 2026-01-17 is a Saturday
                    &shift("2026-01-17", "06:00", &end, "0"),
                    &fx.resolved,
                    "NSW",
                    &fx.catalog,
                )
                .unwrap();

            let hours = Decimal::from(whole_hours);
            prop_assert_eq!(calc.penalty_amount, (multiplier - Decimal::ONE) * rate * hours);
            prop_assert_eq!(calc.total_amount, calc.base_amount + calc.penalty_amount);
        }
    }
}
