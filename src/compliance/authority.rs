//! HTTP client for the external rate authority.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The payload posted to the authority's validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateValidationRequest {
    /// The Fair Work award code.
    pub award_code: String,
    /// The classification code within the award.
    pub classification_code: String,
    /// The hourly rate being validated.
    pub hourly_rate: Decimal,
    /// The date the rate would apply on.
    pub date: NaiveDate,
}

/// The authority's verdict on a proposed rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateValidationResponse {
    /// Whether the proposed rate meets the published minimum.
    pub is_valid: bool,
    /// The published minimum hourly rate.
    #[serde(default)]
    pub minimum_rate: Option<Decimal>,
    /// An optional explanation from the authority.
    #[serde(default)]
    pub message: Option<String>,
}

/// Client for the rate authority's validation endpoint.
///
/// Requests carry a bounded timeout so a stalled authority cannot hold a
/// caller indefinitely. All transport and decode failures surface as
/// [`EngineError::AuthorityUnavailable`].
#[derive(Debug, Clone)]
pub struct AuthorityClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AuthorityClient {
    /// Creates a client for the given validation endpoint URL with the
    /// default 10-second timeout.
    ///
    /// # Errors
    ///
    /// Returns `AuthorityUnavailable` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(endpoint: impl Into<String>) -> EngineResult<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::AuthorityUnavailable {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Returns the endpoint URL this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts a validation request and decodes the authority's verdict.
    ///
    /// # Errors
    ///
    /// Returns `AuthorityUnavailable` on connection failure, timeout, a
    /// non-success HTTP status, or an undecodable response body.
    pub async fn validate_rate(
        &self,
        request: &RateValidationRequest,
    ) -> EngineResult<RateValidationResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| EngineError::AuthorityUnavailable {
                message: format!("request to {} failed: {e}", self.endpoint),
            })?
            .error_for_status()
            .map_err(|e| EngineError::AuthorityUnavailable {
                message: format!("authority returned an error status: {e}"),
            })?;

        response
            .json::<RateValidationResponse>()
            .await
            .map_err(|e| EngineError::AuthorityUnavailable {
                message: format!("could not decode authority response: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_request_serialization() {
        let request = RateValidationRequest {
            award_code: "MA000025".to_string(),
            classification_code: "apprentice_year_2".to_string(),
            hourly_rate: dec("19.10"),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"award_code\":\"MA000025\""));
        assert!(json.contains("\"hourly_rate\":\"19.10\""));
        assert!(json.contains("\"date\":\"2026-01-15\""));
    }

    #[test]
    fn test_response_optional_fields_default() {
        let response: RateValidationResponse =
            serde_json::from_str(r#"{ "is_valid": true }"#).unwrap();
        assert!(response.is_valid);
        assert!(response.minimum_rate.is_none());
        assert!(response.message.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        // Reserved TEST-NET-1 address, nothing listens there
        let client =
            AuthorityClient::with_timeout("http://192.0.2.1:1/validate", Duration::from_millis(50))
                .unwrap();
        let request = RateValidationRequest {
            award_code: "MA000025".to_string(),
            classification_code: "apprentice_year_2".to_string(),
            hourly_rate: dec("19.10"),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        };

        let result = client.validate_rate(&request).await;
        assert!(matches!(
            result,
            Err(EngineError::AuthorityUnavailable { .. })
        ));
    }
}
