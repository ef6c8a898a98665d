//! Pure reshaping and aggregation of the results table.

mod aggregate;
mod melt;

pub use aggregate::{distinct_sorted, mean_by, BoxStats};
pub use melt::{melt_contention, ContentionObservation};
