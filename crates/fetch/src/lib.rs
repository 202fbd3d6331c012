//! `partsync-fetch` — retrieval orchestration for product records.
//!
//! Two layers: [`pool::fetch_all`] bounds parallelism and isolates
//! per-key failures over any injected [`Fetch`] capability, and
//! [`http::HttpFetcher`] is the concrete capability talking to the
//! product data service.

pub mod error;
pub mod http;
pub mod pool;

pub use error::FetchError;
pub use http::HttpFetcher;
pub use pool::{fetch_all, Fetch};
