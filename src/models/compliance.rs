//! Compliance check models.
//!
//! This module contains the [`ComplianceOutcome`] returned to callers and
//! the immutable [`ComplianceCheckLog`] audit record of each external
//! validation attempt.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The outcome of one rate validation against the external authority.
///
/// `is_valid` is `None` when no authority endpoint is configured or the
/// authority did not answer: compliance checking is advisory, never
/// blocking, for pay calculation itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceOutcome {
    /// Whether the proposed rate meets the authority's minimum; `None` = unknown.
    pub is_valid: Option<bool>,
    /// The authority's minimum rate, when it answered.
    pub minimum_rate: Option<Decimal>,
    /// A human-readable message describing the outcome.
    pub message: String,
}

/// An immutable record of one external validation attempt.
///
/// The raw request and response payloads are archived verbatim so the
/// check can be audited later exactly as it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCheckLog {
    /// Unique identifier for this log entry.
    pub id: Uuid,
    /// When the check was attempted.
    pub checked_at: DateTime<Utc>,
    /// The award code the check was for.
    pub award_code: String,
    /// The classification code the check was for.
    pub classification_code: String,
    /// The hourly rate submitted for validation.
    pub requested_rate: Decimal,
    /// The authority's minimum rate, when it answered.
    pub minimum_rate: Option<Decimal>,
    /// The validity verdict; `None` when the authority did not answer.
    pub is_valid: Option<bool>,
    /// A human-readable message describing the outcome.
    pub message: String,
    /// The request payload archived verbatim.
    pub request_payload: serde_json::Value,
    /// The response payload (or error description) archived verbatim.
    pub response_payload: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_unknown_outcome_has_no_verdict() {
        let outcome = ComplianceOutcome {
            is_valid: None,
            minimum_rate: None,
            message: "No authority endpoint configured".to_string(),
        };

        assert!(outcome.is_valid.is_none());
        assert!(outcome.minimum_rate.is_none());
    }

    #[test]
    fn test_check_log_serialization_preserves_payloads() {
        let log = ComplianceCheckLog {
            id: Uuid::nil(),
            checked_at: DateTime::parse_from_rfc3339("2026-01-20T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            award_code: "MA000025".to_string(),
            classification_code: "apprentice_year_2".to_string(),
            requested_rate: dec("18.50"),
            minimum_rate: Some(dec("17.80")),
            is_valid: Some(true),
            message: "Rate meets minimum".to_string(),
            request_payload: serde_json::json!({"hourlyRate": "18.50"}),
            response_payload: serde_json::json!({"isValid": true}),
        };

        let json = serde_json::to_string(&log).unwrap();
        let back: ComplianceCheckLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
        assert_eq!(back.request_payload["hourlyRate"], "18.50");
    }
}
