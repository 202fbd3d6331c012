//! `partsync-core` — Pure product-data reconciliation engine.
//!
//! Pure engine crate: normalizes raw cell/record text into canonical
//! forms and compares fields into tri-state verdicts. No CLI, IO, or
//! network dependencies.

pub mod compare;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;

pub use compare::{FieldComparison, Verdict};
pub use config::ReconcileConfig;
pub use error::ConfigError;
pub use model::{Dimensions, ProductKey, ProductRecord, RetrievalOutcome};
