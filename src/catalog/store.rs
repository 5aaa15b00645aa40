//! In-memory rate catalog with "as-of" lookup semantics.

use chrono::{Datelike, NaiveDate, NaiveTime};
use tracing::error;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllowanceRule, Award, Classification, PayRate, PenaltyRule, PenaltyType, PublicHoliday,
};

use super::sync::{AwardUpsert, ClassificationUpsert, PayRateUpsert};

/// Time-bounded storage and lookup of award pay data.
///
/// All lookups are "as-of" a given date: a row applies when its effective
/// window `[effective_from, effective_to)` contains the date. Rate lookup
/// has exactly-one semantics; ambiguity is a catalog-integrity error and
/// is never resolved by tie-breaking.
///
/// # Example
///
/// ```no_run
/// use apprentice_pay_engine::catalog::CatalogLoader;
/// use chrono::NaiveDate;
///
/// let catalog = CatalogLoader::load("./catalog/awards.yaml").unwrap();
/// let award = catalog.award_by_code("MA000025").unwrap();
/// println!("Award: {}", award.name);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateCatalog {
    awards: Vec<Award>,
    classifications: Vec<Classification>,
    pay_rates: Vec<PayRate>,
    penalty_rules: Vec<PenaltyRule>,
    allowance_rules: Vec<AllowanceRule>,
    public_holidays: Vec<PublicHoliday>,
}

impl RateCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds an active award by its code.
    pub fn award_by_code(&self, code: &str) -> Option<&Award> {
        self.awards.iter().find(|a| a.code == code && a.is_active)
    }

    /// Finds a classification by its id.
    pub fn classification(&self, id: Uuid) -> Option<&Classification> {
        self.classifications.iter().find(|c| c.id == id)
    }

    /// Returns all classifications belonging to an award.
    pub fn classifications_of(&self, award_id: Uuid) -> Vec<&Classification> {
        self.classifications
            .iter()
            .filter(|c| c.award_id == award_id)
            .collect()
    }

    /// Looks up the unique pay rate in force on `date`.
    ///
    /// # Errors
    ///
    /// - `RateNotFound` when no rate's effective window contains `date`.
    /// - `AmbiguousRate` when more than one does. This signals overlapping
    ///   effective windows in the catalog and is logged at error severity;
    ///   it must be fixed in the data, not tie-broken here.
    pub fn rate_as_of(
        &self,
        classification_id: Uuid,
        apprenticeship_year: Option<u8>,
        is_apprentice_rate: bool,
        date: NaiveDate,
    ) -> EngineResult<&PayRate> {
        let matches: Vec<&PayRate> = self
            .pay_rates
            .iter()
            .filter(|r| {
                r.classification_id == classification_id
                    && r.apprenticeship_year == apprenticeship_year
                    && r.is_apprentice_rate == is_apprentice_rate
                    && r.in_force(date)
            })
            .collect();

        let classification_name = self
            .classification(classification_id)
            .map_or_else(|| classification_id.to_string(), |c| c.name.clone());

        match matches.len() {
            0 => Err(EngineError::RateNotFound {
                classification: classification_name,
                apprenticeship_year,
                date,
            }),
            1 => Ok(matches[0]),
            n => {
                error!(
                    classification = %classification_name,
                    %date,
                    matches = n,
                    "overlapping pay rate effective windows in catalog"
                );
                Err(EngineError::AmbiguousRate {
                    classification: classification_name,
                    date,
                    matches: n,
                })
            }
        }
    }

    /// Looks up the penalty rule in force for a shift, if any.
    ///
    /// Classification-scoped rules take precedence over award-wide rules.
    /// A rule's optional day-of-week and time-window restrictions must all
    /// hold for the rule to apply.
    pub fn penalty_as_of(
        &self,
        award_id: Uuid,
        classification_id: Uuid,
        penalty_type: PenaltyType,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Option<&PenaltyRule> {
        let applies = |r: &&PenaltyRule| {
            r.award_id == award_id
                && r.penalty_type == penalty_type
                && r.in_force(date)
                && r.day_of_week.is_none_or(|d| d == date.weekday())
                && r.time_start.is_none_or(|t| start >= t)
                && r.time_end.is_none_or(|t| end <= t)
        };

        self.penalty_rules
            .iter()
            .filter(applies)
            .find(|r| r.classification_id == Some(classification_id))
            .or_else(|| {
                self.penalty_rules
                    .iter()
                    .filter(applies)
                    .find(|r| r.classification_id.is_none())
            })
    }

    /// Returns all allowance rules in force on `date` for the award.
    ///
    /// A classification-scoped rule shadows an award-wide rule with the
    /// same name.
    pub fn allowances_as_of(
        &self,
        award_id: Uuid,
        classification_id: Uuid,
        date: NaiveDate,
    ) -> Vec<&AllowanceRule> {
        let in_scope: Vec<&AllowanceRule> = self
            .allowance_rules
            .iter()
            .filter(|r| {
                r.award_id == award_id
                    && r.in_force(date)
                    && (r.classification_id.is_none()
                        || r.classification_id == Some(classification_id))
            })
            .collect();

        in_scope
            .iter()
            .filter(|r| {
                r.classification_id.is_some()
                    || !in_scope.iter().any(|other| {
                        other.classification_id.is_some() && other.name == r.name
                    })
            })
            .copied()
            .collect()
    }

    /// Returns true if `date` is a public holiday in `jurisdiction`.
    ///
    /// Holidays tagged `"national"` apply in every jurisdiction.
    pub fn is_public_holiday(&self, jurisdiction: &str, date: NaiveDate) -> bool {
        self.public_holidays.iter().any(|h| {
            h.date == date
                && (h.jurisdiction.eq_ignore_ascii_case(jurisdiction)
                    || h.jurisdiction.eq_ignore_ascii_case("national"))
        })
    }

    // ------------------------------------------------------------------
    // Sync upsert contract. Keys are natural identifiers; conflicting
    // upserts update mutable fields and leave effective-window history
    // intact (historical rates are never deleted).
    // ------------------------------------------------------------------

    /// Upserts an award, keyed on its code.
    pub fn upsert_award(&mut self, upsert: AwardUpsert) -> Uuid {
        if let Some(existing) = self.awards.iter_mut().find(|a| a.code == upsert.code) {
            existing.name = upsert.name;
            existing.industry = upsert.industry.or(existing.industry.take());
            existing.fair_work_reference = upsert.fair_work_reference;
            existing.effective_date = upsert.effective_date;
            existing.id
        } else {
            let id = Uuid::new_v4();
            self.awards.push(Award {
                id,
                code: upsert.code,
                name: upsert.name,
                industry: upsert.industry,
                fair_work_reference: upsert.fair_work_reference,
                effective_date: upsert.effective_date,
                is_active: true,
            });
            id
        }
    }

    /// Upserts a classification, keyed on (award, name, level).
    ///
    /// # Errors
    ///
    /// Returns `AwardNotFound` when the referenced award code is unknown.
    pub fn upsert_classification(&mut self, upsert: ClassificationUpsert) -> EngineResult<Uuid> {
        let award_id = self
            .award_by_code(&upsert.award_code)
            .map(|a| a.id)
            .ok_or_else(|| EngineError::AwardNotFound {
                code: upsert.award_code.clone(),
            })?;

        if let Some(existing) = self.classifications.iter_mut().find(|c| {
            c.award_id == award_id && c.name == upsert.name && c.level == upsert.level
        }) {
            existing.aqf_level = upsert.aqf_level;
            existing.fair_work_level_code = upsert.fair_work_level_code;
            Ok(existing.id)
        } else {
            let id = Uuid::new_v4();
            self.classifications.push(Classification {
                id,
                award_id,
                name: upsert.name,
                level: upsert.level,
                aqf_level: upsert.aqf_level,
                fair_work_level_code: upsert.fair_work_level_code,
            });
            Ok(id)
        }
    }

    /// Upserts a pay rate, keyed on (classification, year, apprentice-flag,
    /// effective_from). Updates the hourly rate and window end of an
    /// existing row; never removes historical rows.
    pub fn upsert_pay_rate(&mut self, upsert: PayRateUpsert) -> Uuid {
        if let Some(existing) = self.pay_rates.iter_mut().find(|r| {
            r.classification_id == upsert.classification_id
                && r.apprenticeship_year == upsert.apprenticeship_year
                && r.is_apprentice_rate == upsert.is_apprentice_rate
                && r.effective_from == upsert.effective_from
        }) {
            existing.hourly_rate = upsert.hourly_rate;
            existing.effective_to = upsert.effective_to;
            existing.id
        } else {
            let id = Uuid::new_v4();
            self.pay_rates.push(PayRate {
                id,
                classification_id: upsert.classification_id,
                hourly_rate: upsert.hourly_rate,
                effective_from: upsert.effective_from,
                effective_to: upsert.effective_to,
                is_apprentice_rate: upsert.is_apprentice_rate,
                apprenticeship_year: upsert.apprenticeship_year,
            });
            id
        }
    }

    /// Adds a penalty rule.
    pub fn insert_penalty_rule(&mut self, rule: PenaltyRule) {
        self.penalty_rules.push(rule);
    }

    /// Adds an allowance rule.
    pub fn insert_allowance_rule(&mut self, rule: AllowanceRule) {
        self.allowance_rules.push(rule);
    }

    /// Adds a public holiday if not already present.
    pub fn insert_public_holiday(&mut self, holiday: PublicHoliday) {
        if !self.public_holidays.contains(&holiday) {
            self.public_holidays.push(holiday);
        }
    }
}
