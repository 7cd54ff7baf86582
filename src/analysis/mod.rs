//! Analysis modules.
//!
//! The community rollup aggregator lives here; loading and caching are
//! handled by `ingest` and `store`.

pub mod aggregator;

pub use aggregator::*;
