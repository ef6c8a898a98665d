//! Typed rows and column schema for benchmark results.

use std::collections::BTreeSet;

/// A column the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    LockType,
    ConsumerCount,
    ReaderCount,
    OperationCount,
    TotalTime,
    TotalReadTime,
    TotalWriteTime,
    MutexContention,
    ReadContention,
    WriteContention,
    /// Derived: `ConsumerCount + ReaderCount`
    TotalThreads,
}

impl Column {
    /// Columns every input file must carry.
    pub const REQUIRED: [Column; 7] = [
        Column::LockType,
        Column::ConsumerCount,
        Column::ReaderCount,
        Column::OperationCount,
        Column::TotalTime,
        Column::TotalReadTime,
        Column::TotalWriteTime,
    ];

    /// Header name as written by the benchmark harness.
    pub fn header(self) -> &'static str {
        match self {
            Column::LockType => "LockType",
            Column::ConsumerCount => "ConsumerCount",
            Column::ReaderCount => "ReaderCount",
            Column::OperationCount => "OperationCount",
            Column::TotalTime => "TotalTime(us)",
            Column::TotalReadTime => "TotalReadTime(us)",
            Column::TotalWriteTime => "TotalWriteTime(us)",
            Column::MutexContention => "MutexContention",
            Column::ReadContention => "ReadContention",
            Column::WriteContention => "WriteContention",
            Column::TotalThreads => "TotalThreads",
        }
    }
}

/// Kind of lock acquisition a contention count refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentionKind {
    Mutex,
    Read,
    Write,
}

impl ContentionKind {
    pub const ALL: [ContentionKind; 3] =
        [ContentionKind::Mutex, ContentionKind::Read, ContentionKind::Write];

    /// Source column holding counts of this kind.
    pub fn column(self) -> Column {
        match self {
            ContentionKind::Mutex => Column::MutexContention,
            ContentionKind::Read => Column::ReadContention,
            ContentionKind::Write => Column::WriteContention,
        }
    }

    /// Short label used in legends.
    pub fn label(self) -> &'static str {
        match self {
            ContentionKind::Mutex => "Mutex",
            ContentionKind::Read => "Read",
            ContentionKind::Write => "Write",
        }
    }
}

/// Set of columns present in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    columns: BTreeSet<Column>,
}

impl TableSchema {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub(crate) fn insert(&mut self, column: Column) {
        self.columns.insert(column);
    }

    /// Contention kinds whose column is present, in `ContentionKind::ALL` order.
    pub fn contention_kinds(&self) -> Vec<ContentionKind> {
        ContentionKind::ALL
            .into_iter()
            .filter(|kind| self.has(kind.column()))
            .collect()
    }
}

/// One benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    pub lock_type: String,
    pub consumer_count: u64,
    pub reader_count: u64,
    pub operation_count: u64,
    pub total_time_us: f64,
    pub total_read_time_us: f64,
    pub total_write_time_us: f64,
    pub mutex_contention: Option<f64>,
    pub read_contention: Option<f64>,
    pub write_contention: Option<f64>,
    /// Set by [`derive_metrics`](crate::table::derive_metrics)
    pub total_threads: Option<u64>,
}

impl BenchmarkRecord {
    /// Contention count of the given kind, if the row carries one.
    pub fn contention(&self, kind: ContentionKind) -> Option<f64> {
        match kind {
            ContentionKind::Mutex => self.mutex_contention,
            ContentionKind::Read => self.read_contention,
            ContentionKind::Write => self.write_contention,
        }
    }
}

/// Benchmark results in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkTable {
    schema: TableSchema,
    records: Vec<BenchmarkRecord>,
}

impl BenchmarkTable {
    pub fn new(schema: TableSchema, records: Vec<BenchmarkRecord>) -> Self {
        Self { schema, records }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub(crate) fn schema_mut(&mut self) -> &mut TableSchema {
        &mut self.schema
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [BenchmarkRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct lock types in order of first appearance.
    pub fn lock_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.lock_type.as_str()) {
                seen.push(record.lock_type.as_str());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lock: &str) -> BenchmarkRecord {
        BenchmarkRecord {
            lock_type: lock.to_string(),
            consumer_count: 1,
            reader_count: 0,
            operation_count: 1000,
            total_time_us: 10.0,
            total_read_time_us: 4.0,
            total_write_time_us: 6.0,
            mutex_contention: Some(3.0),
            read_contention: None,
            write_contention: Some(1.0),
            total_threads: None,
        }
    }

    #[test]
    fn test_lock_types_first_appearance_order() {
        let table = BenchmarkTable::new(
            TableSchema::new(Column::REQUIRED),
            vec![record("RWLock"), record("Mutex"), record("RWLock"), record("Spin")],
        );
        assert_eq!(table.lock_types(), vec!["RWLock", "Mutex", "Spin"]);
    }

    #[test]
    fn test_contention_kinds_follow_schema() {
        let mut schema = TableSchema::new(Column::REQUIRED);
        assert!(schema.contention_kinds().is_empty());

        schema.insert(Column::WriteContention);
        schema.insert(Column::MutexContention);
        assert_eq!(
            schema.contention_kinds(),
            vec![ContentionKind::Mutex, ContentionKind::Write]
        );
    }

    #[test]
    fn test_record_contention_lookup() {
        let r = record("Mutex");
        assert_eq!(r.contention(ContentionKind::Mutex), Some(3.0));
        assert_eq!(r.contention(ContentionKind::Read), None);
        assert_eq!(ContentionKind::Write.column().header(), "WriteContention");
    }
}
