//! Catalog loading from YAML files.
//!
//! This module provides the [`CatalogLoader`] type for building a
//! [`RateCatalog`] from a YAML catalog document.

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AllowanceRule, AllowanceType, PenaltyRule, PenaltyType, PublicHoliday};

use super::store::RateCatalog;
use super::sync::{AwardUpsert, ClassificationUpsert, PayRateUpsert};

/// Builds a [`RateCatalog`] from a YAML catalog document.
///
/// # Document structure
///
/// ```text
/// awards:
///   - code: MA000025
///     name: Electrical, Electronic and Communications Contracting Award
///     classifications:
///       - name: Apprentice Year 1
///         level: Apprentice Year 1
///         rates:
///           - hourly_rate: "16.20"
///             effective_from: 2025-07-01
///             is_apprentice_rate: true
///             apprenticeship_year: 1
///     penalties:
///       - penalty_type: saturday
///         multiplier: "1.5"
///         effective_from: 2025-07-01
///     allowances:
///       - name: Tool allowance
///         allowance_type: per_hour
///         amount: "2.00"
///         effective_from: 2025-07-01
/// public_holidays:
///   - jurisdiction: NSW
///     date: 2026-01-26
///     name: Australia Day
/// ```
#[derive(Debug)]
pub struct CatalogLoader;

/// Top-level YAML catalog document.
#[derive(Debug, Clone, Deserialize)]
struct CatalogDoc {
    awards: Vec<AwardDoc>,
    #[serde(default)]
    public_holidays: Vec<PublicHoliday>,
}

#[derive(Debug, Clone, Deserialize)]
struct AwardDoc {
    code: String,
    name: String,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    fair_work_reference: Option<String>,
    #[serde(default)]
    effective_date: Option<NaiveDate>,
    #[serde(default)]
    classifications: Vec<ClassificationDoc>,
    #[serde(default)]
    penalties: Vec<PenaltyDoc>,
    #[serde(default)]
    allowances: Vec<AllowanceDoc>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClassificationDoc {
    name: String,
    level: String,
    #[serde(default)]
    aqf_level: Option<u8>,
    #[serde(default)]
    fair_work_level_code: Option<String>,
    #[serde(default)]
    rates: Vec<RateDoc>,
}

#[derive(Debug, Clone, Deserialize)]
struct RateDoc {
    hourly_rate: Decimal,
    effective_from: NaiveDate,
    #[serde(default)]
    effective_to: Option<NaiveDate>,
    #[serde(default)]
    is_apprentice_rate: bool,
    #[serde(default)]
    apprenticeship_year: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
struct PenaltyDoc {
    penalty_type: PenaltyType,
    multiplier: Decimal,
    /// Level label of the classification this rule is scoped to.
    #[serde(default)]
    classification: Option<String>,
    #[serde(default)]
    day_of_week: Option<Weekday>,
    #[serde(default)]
    time_start: Option<NaiveTime>,
    #[serde(default)]
    time_end: Option<NaiveTime>,
    effective_from: NaiveDate,
    #[serde(default)]
    effective_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
struct AllowanceDoc {
    name: String,
    allowance_type: AllowanceType,
    amount: Decimal,
    /// Level label of the classification this rule is scoped to.
    #[serde(default)]
    classification: Option<String>,
    effective_from: NaiveDate,
    #[serde(default)]
    effective_to: Option<NaiveDate>,
}

impl CatalogLoader {
    /// Loads a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogNotFound` if the file is missing and
    /// `CatalogParseError` if it contains invalid YAML or references an
    /// unknown classification level.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<RateCatalog> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::CatalogNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            EngineError::CatalogParseError { message, .. } => EngineError::CatalogParseError {
                path: path_str.clone(),
                message,
            },
            other => other,
        })
    }

    /// Builds a catalog from YAML text.
    pub fn from_yaml_str(content: &str) -> EngineResult<RateCatalog> {
        let doc: CatalogDoc =
            serde_yaml::from_str(content).map_err(|e| EngineError::CatalogParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;

        let mut catalog = RateCatalog::new();

        for award_doc in doc.awards {
            let award_id = catalog.upsert_award(AwardUpsert {
                code: award_doc.code.clone(),
                name: award_doc.name,
                industry: award_doc.industry,
                fair_work_reference: award_doc.fair_work_reference,
                effective_date: award_doc.effective_date,
            });

            // Classifications and their rates, remembering level -> id for
            // scoped penalty/allowance references below.
            let mut level_ids: Vec<(String, Uuid)> = Vec::new();
            for class_doc in award_doc.classifications {
                let classification_id = catalog.upsert_classification(ClassificationUpsert {
                    award_code: award_doc.code.clone(),
                    name: class_doc.name,
                    level: class_doc.level.clone(),
                    aqf_level: class_doc.aqf_level,
                    fair_work_level_code: class_doc.fair_work_level_code,
                })?;
                level_ids.push((class_doc.level, classification_id));

                for rate_doc in class_doc.rates {
                    catalog.upsert_pay_rate(PayRateUpsert {
                        classification_id,
                        hourly_rate: rate_doc.hourly_rate,
                        effective_from: rate_doc.effective_from,
                        effective_to: rate_doc.effective_to,
                        is_apprentice_rate: rate_doc.is_apprentice_rate,
                        apprenticeship_year: rate_doc.apprenticeship_year,
                    });
                }
            }

            let scope_id = |label: &Option<String>| -> EngineResult<Option<Uuid>> {
                match label {
                    None => Ok(None),
                    Some(level) => level_ids
                        .iter()
                        .find(|(l, _)| l == level)
                        .map(|(_, id)| Some(*id))
                        .ok_or_else(|| EngineError::CatalogParseError {
                            path: "<inline>".to_string(),
                            message: format!(
                                "rule references unknown classification level '{level}'"
                            ),
                        }),
                }
            };

            for penalty_doc in award_doc.penalties {
                let classification_id = scope_id(&penalty_doc.classification)?;
                catalog.insert_penalty_rule(PenaltyRule {
                    id: Uuid::new_v4(),
                    award_id,
                    classification_id,
                    penalty_type: penalty_doc.penalty_type,
                    multiplier: penalty_doc.multiplier,
                    day_of_week: penalty_doc.day_of_week,
                    time_start: penalty_doc.time_start,
                    time_end: penalty_doc.time_end,
                    effective_from: penalty_doc.effective_from,
                    effective_to: penalty_doc.effective_to,
                });
            }

            for allowance_doc in award_doc.allowances {
                let classification_id = scope_id(&allowance_doc.classification)?;
                catalog.insert_allowance_rule(AllowanceRule {
                    id: Uuid::new_v4(),
                    award_id,
                    classification_id,
                    name: allowance_doc.name,
                    allowance_type: allowance_doc.allowance_type,
                    amount: allowance_doc.amount,
                    effective_from: allowance_doc.effective_from,
                    effective_to: allowance_doc.effective_to,
                });
            }
        }

        for holiday in doc.public_holidays {
            catalog.insert_public_holiday(holiday);
        }

        Ok(catalog)
    }
}
