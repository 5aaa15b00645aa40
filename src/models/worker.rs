//! Worker and placement models.
//!
//! These are read-only inputs supplied by the surrounding administrative
//! system; the engine never mutates them.

use serde::{Deserialize, Serialize};

/// A worker (apprentice) whose shifts are being paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// Free-text trade or occupation (e.g., "Electrical Apprentice").
    pub trade: String,
    /// The worker's current apprenticeship year (1-4), if known.
    ///
    /// Defaults to year 1 during award resolution when absent.
    #[serde(default)]
    pub apprenticeship_year: Option<u8>,
}

/// A work assignment linking a worker to a host employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Unique identifier for the placement.
    pub id: String,
    /// The host employer the worker is placed with.
    pub host_employer_id: String,
    /// The jurisdiction the work is performed in (e.g., "NSW").
    ///
    /// Drives public holiday membership for day classification.
    pub jurisdiction: String,
}
