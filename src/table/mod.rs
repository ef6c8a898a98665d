//! Benchmark results table: schema, loading and derived metrics.

mod derive;
mod loader;
mod record;

pub use derive::derive_metrics;
pub use loader::load_table;
pub use record::{BenchmarkRecord, BenchmarkTable, Column, ContentionKind, TableSchema};
