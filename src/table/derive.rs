//! Derived columns computed from the loaded results.

use crate::table::{BenchmarkTable, Column};

/// Add `TotalThreads = ConsumerCount + ReaderCount` to every row.
///
/// Recomputes from the source columns each time, so applying it twice yields
/// the same table. The loader rejects rows whose sum overflows; tables built
/// by hand saturate at `u64::MAX`.
pub fn derive_metrics(mut table: BenchmarkTable) -> BenchmarkTable {
    for record in table.records_mut() {
        record.total_threads = Some(record.consumer_count.saturating_add(record.reader_count));
    }
    table.schema_mut().insert(Column::TotalThreads);
    table
}
