//! Aggregation engine.
//!
//! Normalization, year-range tables, totals and rankings, and time series,
//! all parametrized by a [`CategorySchema`](crate::schema::CategorySchema).

pub mod aggregator;
pub mod dataset;
pub mod normalizer;
pub mod overview;
pub mod series;
pub mod table;

pub use aggregator::*;
pub use dataset::{Dataset, Query};
pub use overview::overview;
