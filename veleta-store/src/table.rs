//! In-memory tabular result sets.
//!
//! A [`Table`] is the hand-off format between a job and the staging
//! writer: ordered, named columns of uniform length with nullable values.
//! Jobs build one per unit of work and discard it after the write.

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::error::StoreError;

/// Hive convention for a null partition value.
const NULL_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

// ============================================================================
// Column Values
// ============================================================================

/// Typed, nullable column contents.
#[derive(Debug, Clone)]
pub enum ColumnValues {
    /// UTF-8 strings.
    Utf8(Vec<Option<String>>),
    /// 64-bit floats.
    Float64(Vec<Option<f64>>),
    /// 64-bit integers.
    Int64(Vec<Option<i64>>),
    /// Naive local timestamps (microsecond precision on disk).
    Timestamp(Vec<Option<NaiveDateTime>>),
}

impl ColumnValues {
    /// Number of values (including nulls).
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Utf8(v) => v.len(),
            ColumnValues::Float64(v) => v.len(),
            ColumnValues::Int64(v) => v.len(),
            ColumnValues::Timestamp(v) => v.len(),
        }
    }

    /// Returns true if the column has no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn data_type(&self) -> DataType {
        match self {
            ColumnValues::Utf8(_) => DataType::Utf8,
            ColumnValues::Float64(_) => DataType::Float64,
            ColumnValues::Int64(_) => DataType::Int64,
            ColumnValues::Timestamp(_) => DataType::Timestamp(TimeUnit::Microsecond, None),
        }
    }

    fn to_arrow(&self) -> ArrayRef {
        match self {
            ColumnValues::Utf8(v) => Arc::new(StringArray::from(v.clone())),
            ColumnValues::Float64(v) => Arc::new(Float64Array::from(v.clone())),
            ColumnValues::Int64(v) => Arc::new(Int64Array::from(v.clone())),
            ColumnValues::Timestamp(v) => {
                let micros: Vec<Option<i64>> = v
                    .iter()
                    .map(|t| t.map(|t| t.and_utc().timestamp_micros()))
                    .collect();
                Arc::new(TimestampMicrosecondArray::from(micros))
            }
        }
    }

    /// String rendering of one value for a Hive partition path segment.
    fn partition_value(&self, row: usize) -> String {
        let rendered = match self {
            ColumnValues::Utf8(v) => v[row].clone(),
            ColumnValues::Float64(v) => v[row].map(|x| x.to_string()),
            ColumnValues::Int64(v) => v[row].map(|x| x.to_string()),
            ColumnValues::Timestamp(v) => v[row].map(|t| t.format("%Y-%m-%dT%H-%M-%S").to_string()),
        };
        rendered.unwrap_or_else(|| NULL_PARTITION.to_string())
    }

    fn take(&self, rows: &[usize]) -> ColumnValues {
        match self {
            ColumnValues::Utf8(v) => {
                ColumnValues::Utf8(rows.iter().map(|&i| v[i].clone()).collect())
            }
            ColumnValues::Float64(v) => {
                ColumnValues::Float64(rows.iter().map(|&i| v[i]).collect())
            }
            ColumnValues::Int64(v) => ColumnValues::Int64(rows.iter().map(|&i| v[i]).collect()),
            ColumnValues::Timestamp(v) => {
                ColumnValues::Timestamp(rows.iter().map(|&i| v[i]).collect())
            }
        }
    }
}

// ============================================================================
// Table
// ============================================================================

/// An ordered set of named, uniform-length columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<(String, ColumnValues)>,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, enforcing the uniform row count.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: ColumnValues,
    ) -> Result<Self, StoreError> {
        let name = name.into();
        if self.columns.iter().any(|(n, _)| *n == name) {
            return Err(StoreError::DuplicateColumn(name));
        }
        if let Some((_, first)) = self.columns.first() {
            if first.len() != values.len() {
                return Err(StoreError::ColumnLength {
                    column: name,
                    expected: first.len(),
                    actual: values.len(),
                });
            }
        }
        self.columns.push((name, values));
        Ok(self)
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, v)| v.len())
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Converts the table into an Arrow record batch. All fields nullable.
    pub fn to_record_batch(&self) -> Result<RecordBatch, StoreError> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|(name, values)| Field::new(name, values.data_type(), true))
            .collect();
        let arrays: Vec<ArrayRef> = self.columns.iter().map(|(_, v)| v.to_arrow()).collect();
        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }

    /// Renders one row's partition path segments for the given columns.
    pub(crate) fn partition_segments(
        &self,
        row: usize,
        partition_cols: &[String],
    ) -> Result<Vec<String>, StoreError> {
        partition_cols
            .iter()
            .map(|col| {
                let values = self
                    .column(col)
                    .ok_or_else(|| StoreError::UnknownPartitionColumn(col.clone()))?;
                Ok(format!("{col}={}", values.partition_value(row)))
            })
            .collect()
    }

    /// Projects a subset of rows, dropping the named columns.
    pub(crate) fn take_rows_without(&self, rows: &[usize], drop: &[String]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .filter(|(name, _)| !drop.contains(name))
                .map(|(name, values)| (name.clone(), values.take(rows)))
                .collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
