//! Award and classification resolution from worker attributes.
//!
//! This module maps a worker's free-text trade and apprenticeship year to
//! a concrete (award, classification) pair and verifies a pay rate exists
//! for the resolution date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::RateCatalog;
use crate::error::{EngineError, EngineResult};
use crate::models::{Placement, Worker};

/// One keyword-to-award-code entry in the trade mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAwardEntry {
    /// Substring matched against the lowercased trade text.
    pub keyword: String,
    /// The award code the keyword maps to.
    pub award_code: String,
}

/// A versioned lookup table mapping trade keywords to award codes.
///
/// This is data, not code: the table can be audited and extended without
/// redeployment, and loaded from configuration alongside the catalog.
/// Entries are matched in order; the first keyword contained in the
/// worker's lowercased trade text wins, else the default code applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAwardMap {
    /// The version of this mapping table.
    pub version: u32,
    /// Ordered keyword entries.
    pub entries: Vec<TradeAwardEntry>,
    /// The award code applied when no keyword matches.
    pub default_award_code: String,
}

impl TradeAwardMap {
    /// Returns the award code for a free-text trade.
    pub fn award_code_for(&self, trade: &str) -> &str {
        let trade = trade.to_lowercase();
        self.entries
            .iter()
            .find(|e| trade.contains(&e.keyword))
            .map_or(self.default_award_code.as_str(), |e| e.award_code.as_str())
    }
}

impl Default for TradeAwardMap {
    fn default() -> Self {
        let entry = |keyword: &str, code: &str| TradeAwardEntry {
            keyword: keyword.to_string(),
            award_code: code.to_string(),
        };
        Self {
            version: 1,
            entries: vec![
                entry("electrical", "MA000025"),
                entry("building", "MA000020"),
                entry("construction", "MA000020"),
                entry("hospitality", "MA000009"),
                entry("food", "MA000009"),
            ],
            default_award_code: "MA000010".to_string(),
        }
    }
}

/// The outcome of resolving a worker to an award and classification.
///
/// Carries denormalized names so downstream results can snapshot them for
/// audit even if the catalog later changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlacement {
    /// The resolved award id.
    pub award_id: Uuid,
    /// The resolved award code.
    pub award_code: String,
    /// The resolved award name.
    pub award_name: String,
    /// The resolved classification id.
    pub classification_id: Uuid,
    /// The resolved classification name.
    pub classification_name: String,
    /// The apprenticeship year the rate was resolved for (defaults to 1).
    pub apprenticeship_year: u8,
    /// The hourly rate in force on the resolution date.
    pub hourly_rate: Decimal,
}

/// Resolves workers to (award, classification, rate) via the trade map.
///
/// Read-only and side-effect free; safe to call repeatedly and
/// concurrently for different workers.
#[derive(Debug, Clone, Default)]
pub struct AwardResolver {
    trade_map: TradeAwardMap,
}

impl AwardResolver {
    /// Creates a resolver with the built-in default trade mapping table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with a custom trade mapping table.
    pub fn with_trade_map(trade_map: TradeAwardMap) -> Self {
        Self { trade_map }
    }

    /// Returns the trade mapping table in use.
    pub fn trade_map(&self) -> &TradeAwardMap {
        &self.trade_map
    }

    /// Resolves a worker and placement to an award, classification, and rate.
    ///
    /// # Algorithm
    ///
    /// 1. Derive a candidate award code from the worker's trade text.
    /// 2. Look up the award by code.
    /// 3. Find the classification whose level matches
    ///    `"Apprentice Year {n}"` for the worker's apprenticeship year
    ///    (default 1); fall back to any classification whose name contains
    ///    "Apprentice".
    /// 4. Verify a pay rate is in force on `as_of`.
    ///
    /// # Errors
    ///
    /// `AwardNotFound`, `ClassificationNotFound`, or the rate lookup's
    /// `RateNotFound`/`AmbiguousRate`, propagated unwrapped.
    pub fn resolve(
        &self,
        worker: &Worker,
        placement: &Placement,
        catalog: &RateCatalog,
        as_of: NaiveDate,
    ) -> EngineResult<ResolvedPlacement> {
        let code = self.trade_map.award_code_for(&worker.trade);
        debug!(
            worker = %worker.id,
            placement = %placement.id,
            trade = %worker.trade,
            award_code = %code,
            "resolved trade to award code"
        );

        let award = catalog
            .award_by_code(code)
            .ok_or_else(|| EngineError::AwardNotFound {
                code: code.to_string(),
            })?;

        let year = worker.apprenticeship_year.unwrap_or(1);
        let level_label = format!("Apprentice Year {year}");

        let classifications = catalog.classifications_of(award.id);
        let classification = classifications
            .iter()
            .find(|c| c.level == level_label)
            .or_else(|| {
                classifications
                    .iter()
                    .find(|c| c.name.contains("Apprentice"))
            })
            .ok_or_else(|| EngineError::ClassificationNotFound {
                award_code: award.code.clone(),
                detail: level_label.clone(),
            })?;

        let rate = catalog.rate_as_of(classification.id, Some(year), true, as_of)?;

        Ok(ResolvedPlacement {
            award_id: award.id,
            award_code: award.code.clone(),
            award_name: award.name.clone(),
            classification_id: classification.id,
            classification_name: classification.name.clone(),
            apprenticeship_year: year,
            hourly_rate: rate.hourly_rate,
        })
    }
}
