//! Timesheet-level orchestration.
//!
//! [`PayEngine`] wires the catalog, resolver, and shift calculator
//! together, aggregates per-shift results into a timesheet calculation,
//! and persists exactly one current calculation per timesheet through a
//! [`CalculationStore`].

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{AwardResolver, ShiftCalculator};
use crate::catalog::RateCatalog;
use crate::compliance::ComplianceValidator;
use crate::error::EngineResult;
use crate::models::{CalculationTotals, ShiftCalculation, Timesheet, TimesheetCalculation};

/// Persistence seam for timesheet calculations.
///
/// Implementations must guarantee at most one stored calculation per
/// timesheet and keep the calculation id stable across replacements, so
/// that recalculating is idempotent from the caller's point of view.
pub trait CalculationStore: Send + Sync {
    /// Stores a calculation, replacing any existing row for the same
    /// timesheet in place. Returns the stored row; when a row already
    /// existed its `calculation_id` is retained.
    fn upsert(&self, calculation: TimesheetCalculation) -> TimesheetCalculation;

    /// Returns the current calculation for a timesheet, if any.
    fn get(&self, timesheet_id: &str) -> Option<TimesheetCalculation>;

    /// Returns the number of stored calculations.
    fn count(&self) -> usize;
}

/// In-memory calculation store.
///
/// The mutex serializes concurrent recalculation of the same timesheet:
/// the last writer wins wholesale and no interleaved state is observable.
#[derive(Debug, Default)]
pub struct InMemoryCalculationStore {
    rows: Mutex<HashMap<String, TimesheetCalculation>>,
}

impl InMemoryCalculationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CalculationStore for InMemoryCalculationStore {
    fn upsert(&self, mut calculation: TimesheetCalculation) -> TimesheetCalculation {
        let mut rows = self.rows.lock().expect("calculation store lock poisoned");
        if let Some(existing) = rows.get(&calculation.timesheet_id) {
            calculation.calculation_id = existing.calculation_id;
        }
        rows.insert(calculation.timesheet_id.clone(), calculation.clone());
        calculation
    }

    fn get(&self, timesheet_id: &str) -> Option<TimesheetCalculation> {
        self.rows
            .lock()
            .expect("calculation store lock poisoned")
            .get(timesheet_id)
            .cloned()
    }

    fn count(&self) -> usize {
        self.rows
            .lock()
            .expect("calculation store lock poisoned")
            .len()
    }
}

/// The pay calculation engine.
///
/// All collaborators are injected at construction; the engine holds no
/// global state and is cheap to share behind a reference.
///
/// # Example
///
/// ```no_run
/// use apprentice_pay_engine::calculation::AwardResolver;
/// use apprentice_pay_engine::catalog::CatalogLoader;
/// use apprentice_pay_engine::engine::{InMemoryCalculationStore, PayEngine};
///
/// let catalog = CatalogLoader::load("./catalog/awards.yaml").unwrap();
/// let engine = PayEngine::new(
///     catalog,
///     AwardResolver::new(),
///     Box::new(InMemoryCalculationStore::new()),
/// );
/// ```
pub struct PayEngine {
    catalog: RateCatalog,
    resolver: AwardResolver,
    shift_calculator: ShiftCalculator,
    store: Box<dyn CalculationStore>,
    validator: Option<ComplianceValidator>,
}

impl PayEngine {
    /// Creates an engine over a catalog, resolver, and calculation store.
    pub fn new(
        catalog: RateCatalog,
        resolver: AwardResolver,
        store: Box<dyn CalculationStore>,
    ) -> Self {
        Self {
            catalog,
            resolver,
            shift_calculator: ShiftCalculator::new(),
            store,
            validator: None,
        }
    }

    /// Attaches a compliance validator.
    ///
    /// The validator is advisory: pay calculation never waits on it or
    /// fails because of it.
    pub fn with_validator(mut self, validator: ComplianceValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Returns the rate catalog.
    pub fn catalog(&self) -> &RateCatalog {
        &self.catalog
    }

    /// Returns the attached compliance validator, if any.
    pub fn validator(&self) -> Option<&ComplianceValidator> {
        self.validator.as_ref()
    }

    /// Returns the current stored calculation for a timesheet, if any.
    pub fn calculation_for(&self, timesheet_id: &str) -> Option<TimesheetCalculation> {
        self.store.get(timesheet_id)
    }

    /// Calculates pay for a whole timesheet and stores the result.
    ///
    /// The award and classification are resolved once per timesheet, as of
    /// the earliest shift date. Shifts missing their date or either clock
    /// time are skipped and counted; a shift whose fields are present but
    /// invalid fails the whole timesheet. Totals are a commutative sum, so
    /// shift order never changes the outcome. A timesheet with no
    /// calculable shifts produces a zero-totals result.
    ///
    /// Recalculating replaces the stored row in place with a stable
    /// calculation id, so repeated calls are idempotent.
    ///
    /// # Errors
    ///
    /// Resolution errors (`AwardNotFound`, `ClassificationNotFound`,
    /// `RateNotFound`, `AmbiguousRate`) and per-shift `InvalidTimeRange`
    /// are propagated; nothing is stored on failure.
    pub fn calculate_timesheet(
        &self,
        timesheet: &Timesheet,
    ) -> EngineResult<TimesheetCalculation> {
        let as_of = timesheet
            .shifts
            .iter()
            .filter_map(|s| s.date)
            .min()
            .unwrap_or_else(|| Utc::now().date_naive());

        let resolved =
            self.resolver
                .resolve(&timesheet.worker, &timesheet.placement, &self.catalog, as_of)?;

        let mut shifts: Vec<ShiftCalculation> = Vec::with_capacity(timesheet.shifts.len());
        let mut skipped = 0u32;
        for shift in &timesheet.shifts {
            if !shift.has_time_data() {
                warn!(
                    timesheet = %timesheet.id,
                    shift = %shift.id,
                    "skipping shift with missing date or clock times"
                );
                skipped += 1;
                continue;
            }
            shifts.push(self.shift_calculator.calculate(
                shift,
                &resolved,
                &timesheet.placement.jurisdiction,
                &self.catalog,
            )?);
        }

        let totals = shifts
            .iter()
            .fold(CalculationTotals::zero(), |acc, s| CalculationTotals {
                hours: acc.hours + s.hours_worked,
                base_pay: acc.base_pay + s.base_amount,
                penalty_pay: acc.penalty_pay + s.penalty_amount,
                allowances: acc.allowances
                    + s.allowances.iter().map(|a| a.amount).sum::<Decimal>(),
                gross_pay: acc.gross_pay + s.total_amount,
            });

        let stored = self.store.upsert(TimesheetCalculation {
            calculation_id: Uuid::new_v4(),
            timesheet_id: timesheet.id.clone(),
            award_code: resolved.award_code,
            award_name: resolved.award_name,
            classification_name: resolved.classification_name,
            apprenticeship_year: resolved.apprenticeship_year,
            shifts,
            skipped_shifts: skipped,
            totals,
            calculated_at: Utc::now(),
        });

        info!(
            timesheet = %timesheet.id,
            calculation = %stored.calculation_id,
            shifts = stored.shifts.len(),
            skipped = stored.skipped_shifts,
            gross = %stored.totals.gross_pay,
            "stored timesheet calculation"
        );

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogLoader;
    use crate::models::{Placement, Shift, Worker};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const CATALOG_YAML: &str = r#"
awards:
  - code: MA000025
    name: Electrical Award
    classifications:
      - name: Apprentice Year 2
        level: Apprentice Year 2
        rates:
          - hourly_rate: "25.00"
            effective_from: 2025-07-01
            is_apprentice_rate: true
            apprenticeship_year: 2
    penalties:
      - penalty_type: saturday
        multiplier: "1.5"
        effective_from: 2025-07-01
"#;

    fn engine() -> PayEngine {
        let catalog = CatalogLoader::from_yaml_str(CATALOG_YAML).unwrap();
        PayEngine::new(
            catalog,
            AwardResolver::new(),
            Box::new(InMemoryCalculationStore::new()),
        )
    }

    fn shift(id: &str, date: &str, start: &str, end: &str, break_hours: &str) -> Shift {
        Shift {
            id: id.to_string(),
            date: Some(make_date(date)),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            break_duration: dec(break_hours),
            day_type: None,
        }
    }

    fn timesheet(shifts: Vec<Shift>) -> Timesheet {
        Timesheet {
            id: "ts_042".to_string(),
            worker: Worker {
                id: "wrk_001".to_string(),
                trade: "Electrical Apprentice".to_string(),
                apprenticeship_year: Some(2),
            },
            placement: Placement {
                id: "plc_001".to_string(),
                host_employer_id: "host_001".to_string(),
                jurisdiction: "NSW".to_string(),
            },
            shifts,
        }
    }

    /// EN-001: shifts missing time data are skipped and counted, not failed
    #[test]
    fn test_incomplete_shifts_skipped() {
        let engine = engine();
        let draft = Shift {
            id: "shift_draft".to_string(),
            date: Some(make_date("2026-01-16")),
            start_time: None,
            end_time: None,
            break_duration: Decimal::ZERO,
            day_type: None,
        };
        let ts = timesheet(vec![
            shift("shift_001", "2026-01-15", "09:00", "17:00", "1"),
            draft,
        ]);

        let calc = engine.calculate_timesheet(&ts).unwrap();
        assert_eq!(calc.shifts.len(), 1);
        assert_eq!(calc.skipped_shifts, 1);
        assert_eq!(calc.totals.gross_pay, dec("175.00"));
    }

    /// EN-002: a present-but-invalid shift fails the whole timesheet
    #[test]
    fn test_invalid_shift_fails_timesheet() {
        let engine = engine();
        let ts = timesheet(vec![
            shift("shift_001", "2026-01-15", "09:00", "17:00", "1"),
            shift("shift_002", "2026-01-16", "16:00", "08:00", "0"),
        ]);

        let result = engine.calculate_timesheet(&ts);
        assert!(result.is_err());
        // Nothing stored on failure
        assert!(engine.calculation_for("ts_042").is_none());
    }

    /// EN-003: no calculable shifts produce a zero-totals result
    #[test]
    fn test_empty_timesheet_zero_totals() {
        let engine = engine();
        let ts = timesheet(vec![]);

        let calc = engine.calculate_timesheet(&ts).unwrap();
        assert_eq!(calc.totals, CalculationTotals::zero());
        assert_eq!(calc.shifts.len(), 0);
        assert_eq!(calc.award_code, "MA000025");
    }

    /// EN-004: recalculation is idempotent with a stable calculation id
    #[test]
    fn test_recalculation_replaces_in_place() {
        let engine = engine();
        let ts = timesheet(vec![shift("shift_001", "2026-01-15", "09:00", "17:00", "1")]);

        let first = engine.calculate_timesheet(&ts).unwrap();
        let second = engine.calculate_timesheet(&ts).unwrap();

        assert_eq!(first.calculation_id, second.calculation_id);
        assert_eq!(first.totals, second.totals);
        assert_eq!(engine.calculation_for("ts_042").unwrap().totals, second.totals);
    }

    /// EN-005: totals sum base, penalty, and allowances across shifts
    #[test]
    fn test_totals_across_mixed_shifts() {
        let engine = engine();
        let ts = timesheet(vec![
            // Thursday, base only: 7h * 25 = 175.00
            shift("shift_001", "2026-01-15", "09:00", "17:00", "1"),
            // Saturday, 1.5x: base 187.50 + uplift 93.75
            shift("shift_002", "2026-01-17", "08:00", "16:00", "0.5"),
        ]);

        let calc = engine.calculate_timesheet(&ts).unwrap();
        assert_eq!(calc.totals.hours, dec("14.5"));
        assert_eq!(calc.totals.base_pay, dec("362.50"));
        assert_eq!(calc.totals.penalty_pay, dec("93.750"));
        assert_eq!(calc.totals.allowances, Decimal::ZERO);
        assert_eq!(calc.totals.gross_pay, dec("456.250"));
    }

    /// EN-006: resolution happens as of the earliest shift date
    #[test]
    fn test_resolution_uses_earliest_shift_date() {
        // Rate only in force from 2026-07-01; an earlier shift must fail
        let catalog = CatalogLoader::from_yaml_str(
            r#"
awards:
  - code: MA000025
    name: Electrical Award
    classifications:
      - name: Apprentice Year 2
        level: Apprentice Year 2
        rates:
          - hourly_rate: "25.00"
            effective_from: 2026-07-01
            is_apprentice_rate: true
            apprenticeship_year: 2
"#,
        )
        .unwrap();
        let engine = PayEngine::new(
            catalog,
            AwardResolver::new(),
            Box::new(InMemoryCalculationStore::new()),
        );
        let ts = timesheet(vec![
            shift("shift_001", "2026-01-15", "09:00", "17:00", "1"),
            shift("shift_002", "2026-07-02", "09:00", "17:00", "1"),
        ]);

        let result = engine.calculate_timesheet(&ts);
        assert!(matches!(
            result,
            Err(crate::error::EngineError::RateNotFound { .. })
        ));
    }

    #[test]
    fn test_store_keeps_one_row_per_timesheet() {
        let store = InMemoryCalculationStore::new();
        let engine = engine();
        let ts = timesheet(vec![shift("shift_001", "2026-01-15", "09:00", "17:00", "1")]);

        let calc = engine.calculate_timesheet(&ts).unwrap();
        let first = store.upsert(calc.clone());
        let second = store.upsert(calc);

        assert_eq!(store.count(), 1);
        assert_eq!(first.calculation_id, second.calculation_id);
    }

    proptest! {
        /// Shift order never changes the aggregate totals.
        #[test]
        fn prop_totals_commute_over_shift_order(
            durations in proptest::collection::vec(1u32..10, 1..6),
        ) {
            let engine = engine();
            let shifts: Vec<Shift> = durations
                .iter()
                .enumerate()
                .map(|(i, hours)| {
                    // Spread over consecutive weekdays starting Mon 2026-01-12
                    let date = make_date("2026-01-12") + chrono::Days::new(i as u64 % 5);
                    Shift {
                        id: format!("shift_{i:03}"),
                        date: Some(date),
                        start_time: Some("06:00".to_string()),
                        end_time: Some(format!("{:02}:00", 6 + hours)),
                        break_duration: Decimal::ZERO,
                        day_type: None,
                    }
                })
                .collect();

            let forward = engine.calculate_timesheet(&timesheet(shifts.clone())).unwrap();
            let mut reversed_shifts = shifts;
            reversed_shifts.reverse();
            let reversed = engine.calculate_timesheet(&timesheet(reversed_shifts)).unwrap();

            prop_assert_eq!(forward.totals, reversed.totals);
        }
    }
}
