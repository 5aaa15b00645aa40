//! Advisory rate validation with an append-only audit trail.

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{ComplianceCheckLog, ComplianceOutcome};

use super::authority::{AuthorityClient, RateValidationRequest};

/// Append-only audit trail of validation attempts.
///
/// Entries are immutable once written; the log supports appending and
/// filtered reads only.
#[derive(Debug, Default)]
pub struct ComplianceLog {
    entries: Mutex<Vec<ComplianceCheckLog>>,
}

impl ComplianceLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&self, entry: ComplianceCheckLog) {
        self.entries
            .lock()
            .expect("compliance log lock poisoned")
            .push(entry);
    }

    /// Returns the number of recorded attempts.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("compliance log lock poisoned")
            .len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns entries matching all the given filters.
    ///
    /// `None` filters match everything; the time bounds are inclusive.
    pub fn query(
        &self,
        award_code: Option<&str>,
        classification_code: Option<&str>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<ComplianceCheckLog> {
        self.entries
            .lock()
            .expect("compliance log lock poisoned")
            .iter()
            .filter(|e| {
                award_code.is_none_or(|code| e.award_code == code)
                    && classification_code.is_none_or(|code| e.classification_code == code)
                    && from.is_none_or(|t| e.checked_at >= t)
                    && to.is_none_or(|t| e.checked_at <= t)
            })
            .cloned()
            .collect()
    }
}

/// Validates proposed rates against the external authority.
///
/// Every attempt is recorded in the audit log, including attempts made
/// with no endpoint configured and attempts the authority never answered.
///
/// # Example
///
/// ```
/// use apprentice_pay_engine::compliance::ComplianceValidator;
///
/// let validator = ComplianceValidator::offline();
/// assert!(validator.log().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ComplianceValidator {
    client: Option<AuthorityClient>,
    log: ComplianceLog,
}

impl ComplianceValidator {
    /// Creates a validator backed by an authority client.
    pub fn new(client: AuthorityClient) -> Self {
        Self {
            client: Some(client),
            log: ComplianceLog::new(),
        }
    }

    /// Creates a validator with no authority endpoint.
    ///
    /// Every check returns the unknown verdict and is still logged.
    pub fn offline() -> Self {
        Self::default()
    }

    /// Returns the audit log.
    pub fn log(&self) -> &ComplianceLog {
        &self.log
    }

    /// Validates a proposed hourly rate for an award classification.
    ///
    /// With no endpoint configured this returns an unknown verdict
    /// (`is_valid = None`) rather than an error. With an endpoint, the
    /// authority's verdict is returned; transport failure surfaces as
    /// `AuthorityUnavailable` after the attempt is logged.
    pub async fn validate(
        &self,
        award_code: &str,
        classification_code: &str,
        proposed_rate: Decimal,
        as_of: NaiveDate,
    ) -> EngineResult<ComplianceOutcome> {
        let request = RateValidationRequest {
            award_code: award_code.to_string(),
            classification_code: classification_code.to_string(),
            hourly_rate: proposed_rate,
            date: as_of,
        };
        let request_payload = serde_json::to_value(&request).unwrap_or(Value::Null);

        let Some(client) = &self.client else {
            let outcome = ComplianceOutcome {
                is_valid: None,
                minimum_rate: None,
                message: "no compliance authority endpoint configured".to_string(),
            };
            warn!(
                award = %award_code,
                classification = %classification_code,
                "rate validation skipped, no authority endpoint configured"
            );
            self.record(&request, request_payload, &outcome, Value::Null);
            return Ok(outcome);
        };

        match client.validate_rate(&request).await {
            Ok(response) => {
                let response_payload =
                    serde_json::to_value(&response).unwrap_or(Value::Null);
                let outcome = ComplianceOutcome {
                    is_valid: Some(response.is_valid),
                    minimum_rate: response.minimum_rate,
                    message: response.message.unwrap_or_else(|| {
                        if response.is_valid {
                            "rate meets the published minimum".to_string()
                        } else {
                            "rate is below the published minimum".to_string()
                        }
                    }),
                };
                if response.is_valid {
                    info!(
                        award = %award_code,
                        classification = %classification_code,
                        rate = %proposed_rate,
                        "rate validated against authority"
                    );
                } else {
                    warn!(
                        award = %award_code,
                        classification = %classification_code,
                        rate = %proposed_rate,
                        minimum = ?response.minimum_rate,
                        "rate below the authority minimum"
                    );
                }
                self.record(&request, request_payload, &outcome, response_payload);
                Ok(outcome)
            }
            Err(e) => {
                let outcome = ComplianceOutcome {
                    is_valid: None,
                    minimum_rate: None,
                    message: e.to_string(),
                };
                error!(
                    award = %award_code,
                    classification = %classification_code,
                    error = %e,
                    "rate validation attempt failed"
                );
                self.record(&request, request_payload, &outcome, Value::Null);
                Err(e)
            }
        }
    }

    fn record(
        &self,
        request: &RateValidationRequest,
        request_payload: Value,
        outcome: &ComplianceOutcome,
        response_payload: Value,
    ) {
        self.log.append(ComplianceCheckLog {
            id: Uuid::new_v4(),
            checked_at: Utc::now(),
            award_code: request.award_code.clone(),
            classification_code: request.classification_code.clone(),
            requested_rate: request.hourly_rate,
            minimum_rate: outcome.minimum_rate,
            is_valid: outcome.is_valid,
            message: outcome.message.clone(),
            request_payload,
            response_payload,
        });
    }
}
