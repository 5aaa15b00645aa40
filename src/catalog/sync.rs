//! Upsert contract consumed from the catalog sync gateway.
//!
//! The external sync process periodically pulls fresh award data from the
//! regulatory authority and feeds it through these payloads. The engine
//! consumes the contract; it does not own scheduling or retry policy.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Award payload, keyed on `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardUpsert {
    /// The Fair Work award code.
    pub code: String,
    /// The human-readable name of the award.
    pub name: String,
    /// The industry the award covers.
    #[serde(default)]
    pub industry: Option<String>,
    /// Reference to the official Fair Work documentation.
    #[serde(default)]
    pub fair_work_reference: Option<String>,
    /// The date this version of the award took effect.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

/// Classification payload, keyed on (award code, name, level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationUpsert {
    /// The code of the award the classification belongs to.
    pub award_code: String,
    /// The human-readable name of the classification.
    pub name: String,
    /// The level label (e.g., "Apprentice Year 1").
    pub level: String,
    /// Optional Australian Qualifications Framework level tag.
    #[serde(default)]
    pub aqf_level: Option<u8>,
    /// The Fair Work level code.
    #[serde(default)]
    pub fair_work_level_code: Option<String>,
}

/// Pay rate payload, keyed on (classification, year, apprentice-flag,
/// effective_from). Re-synced windows update mutable fields; historical
/// windows are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRateUpsert {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_upsert_deserialization() {
        let json = r#"{
            "code": "MA000025",
            "name": "Electrical, Electronic and Communications Contracting Award",
            "fair_work_reference": "https://library.fairwork.gov.au/award/?krn=MA000025",
            "effective_date": "2025-07-01"
        }"#;

        let upsert: AwardUpsert = serde_json::from_str(json).unwrap();
        assert_eq!(upsert.code, "MA000025");
        assert!(upsert.industry.is_none());
        assert!(upsert.fair_work_reference.is_some());
    }

    #[test]
    fn test_pay_rate_upsert_deserialization() {
        let json = r#"{
            "classification_id": "12345678-1234-1234-1234-123456789012",
            "hourly_rate": "16.20",
            "effective_from": "2025-07-01",
            "is_apprentice_rate": true,
            "apprenticeship_year": 1
        }"#;

        let upsert: PayRateUpsert = serde_json::from_str(json).unwrap();
        assert_eq!(upsert.apprenticeship_year, Some(1));
        assert!(upsert.effective_to.is_none());
    }
}
