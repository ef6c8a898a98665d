//! Long-form reshape of the wide contention columns.

use crate::table::{BenchmarkTable, ContentionKind};

/// One (row, contention kind) pair from the wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentionObservation<'a> {
    /// Index of the source row
    pub row: usize,
    pub lock_type: &'a str,
    pub total_threads: Option<u64>,
    pub kind: ContentionKind,
    pub count: f64,
}

/// Melt the given contention kinds into one observation per row and kind.
///
/// Output is kind-major: every row for the first kind, then every row for the
/// next. Kinds whose column is absent from the schema produce nothing, and
/// empty cells are dropped rather than filled.
pub fn melt_contention<'a>(
    table: &'a BenchmarkTable,
    kinds: &[ContentionKind],
) -> Vec<ContentionObservation<'a>> {
    let schema = table.schema();
    kinds
        .iter()
        .filter(|kind| schema.has(kind.column()))
        .flat_map(move |&kind| {
            table
                .records()
                .iter()
                .enumerate()
                .filter_map(move |(row, record)| {
                    record.contention(kind).map(|count| ContentionObservation {
                        row,
                        lock_type: record.lock_type.as_str(),
                        total_threads: record.total_threads,
                        kind,
                        count,
                    })
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{derive_metrics, BenchmarkRecord, Column, TableSchema};

    fn record(lock: &str, consumers: u64, contention: [Option<f64>; 3]) -> BenchmarkRecord {
        BenchmarkRecord {
            lock_type: lock.to_string(),
            consumer_count: consumers,
            reader_count: 1,
            operation_count: 1000,
            total_time_us: 1.0,
            total_read_time_us: 1.0,
            total_write_time_us: 1.0,
            mutex_contention: contention[0],
            read_contention: contention[1],
            write_contention: contention[2],
            total_threads: None,
        }
    }

    fn table_with(columns: &[Column], records: Vec<BenchmarkRecord>) -> BenchmarkTable {
        let schema = TableSchema::new(Column::REQUIRED.into_iter().chain(columns.iter().copied()));
        derive_metrics(BenchmarkTable::new(schema, records))
    }

    #[test]
    fn test_melt_is_kind_major() {
        let table = table_with(
            &[Column::MutexContention, Column::ReadContention, Column::WriteContention],
            vec![
                record("Mutex", 1, [Some(1.0), Some(2.0), Some(3.0)]),
                record("RWLock", 2, [Some(4.0), Some(5.0), Some(6.0)]),
            ],
        );

        let melted = melt_contention(&table, &ContentionKind::ALL);
        assert_eq!(melted.len(), 6);

        let order: Vec<(ContentionKind, usize, f64)> =
            melted.iter().map(|o| (o.kind, o.row, o.count)).collect();
        assert_eq!(
            order,
            vec![
                (ContentionKind::Mutex, 0, 1.0),
                (ContentionKind::Mutex, 1, 4.0),
                (ContentionKind::Read, 0, 2.0),
                (ContentionKind::Read, 1, 5.0),
                (ContentionKind::Write, 0, 3.0),
                (ContentionKind::Write, 1, 6.0),
            ]
        );
        assert_eq!(melted[1].lock_type, "RWLock");
        assert_eq!(melted[1].total_threads, Some(3));
    }

    #[test]
    fn test_melt_skips_absent_columns_and_empty_cells() {
        let table = table_with(
            &[Column::WriteContention],
            vec![
                record("Mutex", 1, [Some(9.0), None, Some(3.0)]),
                record("Mutex", 2, [None, None, None]),
            ],
        );

        let melted = melt_contention(&table, &ContentionKind::ALL);
        assert_eq!(melted.len(), 1);
        assert_eq!(melted[0].kind, ContentionKind::Write);
        assert_eq!(melted[0].count, 3.0);
    }

    #[test]
    fn test_melt_empty_table() {
        let table = table_with(&[Column::MutexContention], Vec::new());
        assert!(melt_contention(&table, &ContentionKind::ALL).is_empty());
    }
}
