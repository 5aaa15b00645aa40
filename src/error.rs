//! Error types for the pay calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during pay calculation.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the pay calculation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application. Variants
/// carry enough context for the calling layer to display an actionable
/// message rather than a generic failure.
///
/// # Example
///
/// ```
/// use apprentice_pay_engine::error::EngineError;
///
/// let error = EngineError::AwardNotFound {
///     code: "MA000099".to_string(),
/// };
/// assert_eq!(error.to_string(), "Award not found: MA000099");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Catalog file was not found at the specified path.
    #[error("Catalog file not found: {path}")]
    CatalogNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Catalog file could not be parsed.
    #[error("Failed to parse catalog file '{path}': {message}")]
    CatalogParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No award exists for the derived award code.
    #[error("Award not found: {code}")]
    AwardNotFound {
        /// The award code that was not found.
        code: String,
    },

    /// No classification matched the worker's apprenticeship year.
    #[error("Classification not found on award '{award_code}': {detail}")]
    ClassificationNotFound {
        /// The award code that was searched.
        award_code: String,
        /// What was searched for (e.g., the level label).
        detail: String,
    },

    /// No pay rate covers the requested date.
    #[error(
        "No pay rate for classification '{classification}'{year_suffix} as of {date}",
        year_suffix = .apprenticeship_year
            .map_or_else(String::new, |y| format!(" in apprenticeship year {y}"))
    )]
    RateNotFound {
        /// The classification name or id that was searched.
        classification: String,
        /// The apprenticeship year, if the lookup was for an apprentice rate.
        apprenticeship_year: Option<u8>,
        /// The date for which the rate was requested.
        date: NaiveDate,
    },

    /// More than one pay rate covers the requested date.
    ///
    /// This signals overlapping effective windows in the catalog. It is a
    /// data-quality defect, never resolved by tie-breaking.
    #[error(
        "Ambiguous pay rate for classification '{classification}' as of {date}: \
         {matches} overlapping effective windows"
    )]
    AmbiguousRate {
        /// The classification name or id that was searched.
        classification: String,
        /// The date for which the rate was requested.
        date: NaiveDate,
        /// How many rates matched.
        matches: usize,
    },

    /// A shift's time fields were malformed or produced a non-positive duration.
    #[error("Invalid time range for shift '{shift_id}': {message}")]
    InvalidTimeRange {
        /// The ID of the invalid shift.
        shift_id: String,
        /// A description of what made the shift invalid.
        message: String,
    },

    /// The external rate-validation authority could not be reached.
    ///
    /// Advisory only: this never blocks the pay calculation path.
    #[error("Rate validation authority unavailable: {message}")]
    AuthorityUnavailable {
        /// A description of the transport or availability failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
