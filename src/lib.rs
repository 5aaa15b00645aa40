//! Award-based pay calculation engine for apprentice placements.
//!
//! This crate computes legally compliant gross pay for worked shifts by
//! composing a time-bounded base rate, a day-type-dependent penalty
//! multiplier, and classification-scoped allowances, with an optional
//! cross-check against an external regulatory minimum-rate authority.

#![warn(missing_docs)]

pub mod calculation;
pub mod catalog;
pub mod compliance;
pub mod engine;
pub mod error;
pub mod models;
