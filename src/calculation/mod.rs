//! Calculation logic for the pay engine.
//!
//! This module contains day-type classification, award and classification
//! resolution from worker attributes, and the per-shift pay calculation
//! that composes base rate, penalty uplift, and allowances.

mod award_resolver;
mod day_classifier;
mod shift_calculator;

pub use award_resolver::{AwardResolver, ResolvedPlacement, TradeAwardEntry, TradeAwardMap};
pub use day_classifier::{DayType, classify};
pub use shift_calculator::{ShiftCalculator, parse_clock_time};
