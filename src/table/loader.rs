//! Load benchmark results from CSV into a typed table.
//!
//! Column types are inferred from content by arrow's CSV reader, then every
//! known column is cast to the representation the views expect. Unknown
//! columns are ignored.

use crate::error::{Error, Result};
use crate::table::{BenchmarkRecord, BenchmarkTable, Column, TableSchema};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

/// Load a results table from a CSV file with a header row.
pub fn load_table(path: &Path) -> Result<BenchmarkTable> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let mut file = File::open(path).map_err(|e| {
        Error::MalformedInput(format!("failed to open {}: {}", path.display(), e))
    })?;

    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, None).map_err(malformed)?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| Error::MalformedInput(format!("failed to rewind {}: {}", path.display(), e)))?;

    let table_schema = resolve_schema(&schema)?;

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .build(file)
        .map_err(malformed)?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(malformed)?;
        extract_records(&batch, &table_schema, &mut records)?;
    }

    tracing::info!(
        "Loaded {} benchmark rows from {}",
        records.len(),
        path.display()
    );

    Ok(BenchmarkTable::new(table_schema, records))
}

fn malformed(e: ArrowError) -> Error {
    Error::MalformedInput(e.to_string())
}

/// Map the CSV header onto known columns, checking that required ones exist.
fn resolve_schema(schema: &Schema) -> Result<TableSchema> {
    let missing: Vec<&str> = Column::REQUIRED
        .iter()
        .filter(|c| schema.column_with_name(c.header()).is_none())
        .map(|c| c.header())
        .collect();

    if !missing.is_empty() {
        return Err(Error::MalformedInput(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let optional = [
        Column::MutexContention,
        Column::ReadContention,
        Column::WriteContention,
    ];
    let present = optional
        .into_iter()
        .filter(|c| schema.column_with_name(c.header()).is_some());

    Ok(TableSchema::new(Column::REQUIRED.into_iter().chain(present)))
}

/// Append the rows of a record batch.
fn extract_records(
    batch: &RecordBatch,
    schema: &TableSchema,
    records: &mut Vec<BenchmarkRecord>,
) -> Result<()> {
    let lock_types = get_string_array(batch, Column::LockType)?;
    let consumers = get_f64_array(batch, Column::ConsumerCount)?;
    let readers = get_f64_array(batch, Column::ReaderCount)?;
    let operations = get_f64_array(batch, Column::OperationCount)?;
    let total_time = get_f64_array(batch, Column::TotalTime)?;
    let read_time = get_f64_array(batch, Column::TotalReadTime)?;
    let write_time = get_f64_array(batch, Column::TotalWriteTime)?;

    let optional = |column: Column| -> Result<Option<Float64Array>> {
        if schema.has(column) {
            get_f64_array(batch, column).map(Some)
        } else {
            Ok(None)
        }
    };
    let mutex = optional(Column::MutexContention)?;
    let read = optional(Column::ReadContention)?;
    let write = optional(Column::WriteContention)?;

    let first_row = records.len();
    for i in 0..batch.num_rows() {
        let row = first_row + i;
        if lock_types.is_null(i) {
            return Err(Error::MalformedInput(format!(
                "row {}: LockType is empty",
                row + 1
            )));
        }

        let record = BenchmarkRecord {
            lock_type: lock_types.value(i).to_string(),
            consumer_count: required_count(&consumers, i, row, Column::ConsumerCount)?,
            reader_count: required_count(&readers, i, row, Column::ReaderCount)?,
            operation_count: required_count(&operations, i, row, Column::OperationCount)?,
            total_time_us: required_value(&total_time, i, row, Column::TotalTime)?,
            total_read_time_us: required_value(&read_time, i, row, Column::TotalReadTime)?,
            total_write_time_us: required_value(&write_time, i, row, Column::TotalWriteTime)?,
            mutex_contention: optional_value(mutex.as_ref(), i, row, Column::MutexContention)?,
            read_contention: optional_value(read.as_ref(), i, row, Column::ReadContention)?,
            write_contention: optional_value(write.as_ref(), i, row, Column::WriteContention)?,
            total_threads: None,
        };

        if record.consumer_count.checked_add(record.reader_count).is_none() {
            return Err(Error::MalformedInput(format!(
                "row {}: ConsumerCount + ReaderCount exceeds {}",
                row + 1,
                u64::MAX
            )));
        }

        if record.operation_count == 0 {
            return Err(Error::MalformedInput(format!(
                "row {}: OperationCount must be positive",
                row + 1
            )));
        }

        records.push(record);
    }

    Ok(())
}

fn column(batch: &RecordBatch, column: Column) -> Result<&ArrayRef> {
    let (idx, _) = batch
        .schema_ref()
        .column_with_name(column.header())
        .ok_or_else(|| {
            Error::MalformedInput(format!("missing column {}", column.header()))
        })?;
    Ok(batch.column(idx))
}

fn get_string_array(batch: &RecordBatch, col: Column) -> Result<StringArray> {
    let arr = cast(column(batch, col)?, &DataType::Utf8).map_err(malformed)?;
    arr.as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| Error::MalformedInput(format!("{} must be text", col.header())))
}

/// Cast a numeric column to f64. Values that are not numbers become nulls,
/// which the row extractors then reject or skip.
fn get_f64_array(batch: &RecordBatch, col: Column) -> Result<Float64Array> {
    let source = column(batch, col)?;
    let arr = cast(source, &DataType::Float64).map_err(malformed)?;
    let values = arr
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| Error::MalformedInput(format!("{} must be numeric", col.header())))?;

    // A null introduced by the cast means the cell held text
    if values.null_count() > source.null_count() {
        return Err(Error::MalformedInput(format!(
            "{} contains non-numeric values",
            col.header()
        )));
    }
    Ok(values)
}

fn required_value(arr: &Float64Array, i: usize, row: usize, col: Column) -> Result<f64> {
    if arr.is_null(i) {
        return Err(Error::MalformedInput(format!(
            "row {}: {} is empty",
            row + 1,
            col.header()
        )));
    }
    check_non_negative(arr.value(i), row, col)
}

fn required_count(arr: &Float64Array, i: usize, row: usize, col: Column) -> Result<u64> {
    let value = required_value(arr, i, row, col)?;
    if value.fract() != 0.0 {
        return Err(Error::MalformedInput(format!(
            "row {}: {} must be an integer, got {}",
            row + 1,
            col.header(),
            value
        )));
    }
    // 2^64 is the first f64 that does not fit
    if value >= u64::MAX as f64 {
        return Err(Error::MalformedInput(format!(
            "row {}: {} is too large, got {}",
            row + 1,
            col.header(),
            value
        )));
    }
    Ok(value as u64)
}

fn optional_value(
    arr: Option<&Float64Array>,
    i: usize,
    row: usize,
    col: Column,
) -> Result<Option<f64>> {
    match arr {
        Some(arr) if !arr.is_null(i) => check_non_negative(arr.value(i), row, col).map(Some),
        _ => Ok(None),
    }
}

fn check_non_negative(value: f64, row: usize, col: Column) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::MalformedInput(format!(
            "row {}: {} must be a non-negative number, got {}",
            row + 1,
            col.header(),
            value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str =
        "LockType,ConsumerCount,ReaderCount,OperationCount,TotalTime(us),TotalReadTime(us),TotalWriteTime(us)";

    fn write_csv(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("ResultIO.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_basic_table() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!(
                "{}\nMutex,1,0,1000,120.5,10,100\nRWLock,2,4,10000,300,150,140.25\n",
                HEADER
            ),
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.schema().contention_kinds().is_empty());

        let first = &table.records()[0];
        assert_eq!(first.lock_type, "Mutex");
        assert_eq!(first.consumer_count, 1);
        assert_eq!(first.reader_count, 0);
        assert_eq!(first.operation_count, 1000);
        assert_eq!(first.total_time_us, 120.5);
        assert_eq!(first.mutex_contention, None);
        assert_eq!(first.total_threads, None);

        let second = &table.records()[1];
        assert_eq!(second.lock_type, "RWLock");
        assert_eq!(second.total_write_time_us, 140.25);
    }

    #[test]
    fn test_load_contention_columns_and_empty_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!(
                "{},MutexContention,WriteContention,Extra\nMutex,1,0,1000,1,1,1,5,,x\nMutex,2,0,1000,1,1,1,7,2,y\n",
                HEADER
            ),
        );

        let table = load_table(&path).unwrap();
        assert!(table.schema().has(Column::MutexContention));
        assert!(!table.schema().has(Column::ReadContention));
        assert!(table.schema().has(Column::WriteContention));

        assert_eq!(table.records()[0].mutex_contention, Some(5.0));
        assert_eq!(table.records()[0].write_contention, None);
        assert_eq!(table.records()[1].write_contention, Some(2.0));
    }

    #[test]
    fn test_header_only_table() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, &format!("{},ReadContention\n", HEADER));

        let table = load_table(&path).unwrap();
        assert!(table.is_empty());
        assert!(table.schema().has(Column::ReadContention));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_table(&dir.path().join("ResultIO.csv")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_arity_mismatch_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, &format!("{}\nMutex,1,0,1000,1\n", HEADER));
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_required_column_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "LockType,ConsumerCount\nMutex,1\n");
        match load_table(&path).unwrap_err() {
            Error::MalformedInput(msg) => assert!(msg.contains("ReaderCount")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_count_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!("{}\nMutex,one,0,1000,1,1,1\n", HEADER),
        );
        assert!(matches!(
            load_table(&path).unwrap_err(),
            Error::MalformedInput(_)
        ));
    }

    #[test]
    fn test_fractional_count_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!("{}\nMutex,1.5,0,1000,1,1,1\n", HEADER),
        );
        assert!(matches!(
            load_table(&path).unwrap_err(),
            Error::MalformedInput(_)
        ));
    }

    #[test]
    fn test_thread_total_overflow_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            &format!(
                "{}\nMutex,10000000000000000000,10000000000000000000,1000,1,1,1\n",
                HEADER
            ),
        );
        assert!(matches!(
            load_table(&path).unwrap_err(),
            Error::MalformedInput(_)
        ));
    }

    #[test]
    fn test_count_beyond_u64_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, &format!("{}\nMutex,1,0,1e20,1,1,1\n", HEADER));
        assert!(matches!(
            load_table(&path).unwrap_err(),
            Error::MalformedInput(_)
        ));
    }
}
