//! Compliance checking against the external rate authority.
//!
//! This module holds the HTTP client for the authority's rate validation
//! endpoint and the advisory [`ComplianceValidator`] that wraps it with an
//! append-only audit log. Compliance checking runs beside pay calculation,
//! never inside it: an unreachable authority produces an unknown verdict
//! and an audit entry, not a failed pay run.

mod authority;
mod validator;

pub use authority::{AuthorityClient, RateValidationRequest, RateValidationResponse};
pub use validator::{ComplianceLog, ComplianceValidator};
