//! Rate catalog: time-bounded storage and lookup of pay rates, penalty
//! rules, allowance rules, and public holiday calendars.
//!
//! The catalog is a pure read model from the engine's perspective; its
//! contents are owned by the external sync process, which feeds it through
//! the upsert contract in [`sync`].

mod loader;
mod store;
mod sync;

pub use loader::CatalogLoader;
pub use store::RateCatalog;
pub use sync::{AwardUpsert, ClassificationUpsert, PayRateUpsert};
