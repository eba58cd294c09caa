//! `ledgersift-engine` — record normalization and composite-key deduplication.
//!
//! Pure engine crate: receives a pre-loaded record table, returns tiered
//! results. No CLI or file IO dependencies.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod key;
pub mod model;
pub mod normalize;
pub mod summary;

pub use config::TriageConfig;
pub use engine::run;
pub use error::TriageError;
pub use model::{Table, Tier, TierSet, TriageResult};
