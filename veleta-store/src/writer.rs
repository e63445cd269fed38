//! Staging writer: Parquet encoding plus OpenDAL writes.
//!
//! Encoding settings follow the staging conventions of the datasets this
//! feeds (snappy, dictionary encoding). Partitioned writes never touch
//! partitions absent from the table, so per-unit invocations can append
//! into a shared dataset concurrently.

use opendal::Operator;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::table::Table;

// ============================================================================
// Write Options
// ============================================================================

/// How a write interacts with data already in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Add new files, never remove anything.
    #[default]
    Append,
    /// Clear the whole dataset path first.
    Overwrite,
    /// Clear only the partitions present in this table first. Sibling
    /// partitions are never touched.
    OverwritePartitions,
}

/// Options for one staging write.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Write mode.
    pub mode: WriteMode,
    /// Hive-style partition columns; empty means a single unpartitioned
    /// object at the given path.
    pub partition_cols: Vec<String>,
    /// Optional prefix for generated file names in partitioned datasets.
    pub file_prefix: Option<String>,
}

impl WriteOptions {
    /// Options for a single unpartitioned object.
    pub fn single_object() -> Self {
        Self::default()
    }

    /// Options for a partitioned dataset write.
    pub fn partitioned(mode: WriteMode, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            mode,
            partition_cols: cols.into_iter().map(Into::into).collect(),
            file_prefix: None,
        }
    }

    /// Sets the file prefix.
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = Some(prefix.into());
        self
    }
}

/// Result of a staging write.
#[derive(Debug, Clone)]
pub struct WriteReport {
    /// Paths of the objects written.
    pub objects: Vec<String>,
    /// Rows written across all objects.
    pub rows: usize,
}

// ============================================================================
// Parquet Encoding
// ============================================================================

fn writer_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_dictionary_enabled(true)
        .build()
}

fn encode_parquet(table: &Table) -> Result<Vec<u8>, StoreError> {
    let batch = table.to_record_batch()?;
    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(writer_properties()))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(buffer)
}

// ============================================================================
// Staging Writer
// ============================================================================

/// Persists tables as Parquet objects through an OpenDAL operator.
#[derive(Debug, Clone)]
pub struct StagingWriter {
    operator: Operator,
}

impl StagingWriter {
    /// Creates a writer over an existing operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Creates a writer over an S3 bucket.
    #[cfg(feature = "services-s3")]
    pub fn s3(bucket: &str, region: &str) -> Result<Self, StoreError> {
        let builder = opendal::services::S3::default().bucket(bucket).region(region);
        Ok(Self::new(Operator::new(builder)?.finish()))
    }

    /// Creates a writer over a local directory.
    #[cfg(feature = "services-fs")]
    pub fn fs(root: &str) -> Result<Self, StoreError> {
        let builder = opendal::services::Fs::default().root(root);
        Ok(Self::new(Operator::new(builder)?.finish()))
    }

    /// Returns the underlying operator.
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Writes a table to `path` per the options.
    ///
    /// Unpartitioned: one Parquet object at exactly `path`. Partitioned:
    /// Hive-style `col=value` directories under `path`, one uniquely named
    /// file per partition present in the table; partition columns are
    /// encoded in the path, not repeated inside the files.
    pub async fn write(
        &self,
        path: &str,
        table: &Table,
        options: &WriteOptions,
    ) -> Result<WriteReport, StoreError> {
        if table.is_empty() {
            return Err(StoreError::EmptyTable);
        }

        let report = if options.partition_cols.is_empty() {
            self.write_single(path, table).await?
        } else {
            self.write_partitioned(path, table, options).await?
        };

        info!(
            path,
            objects = report.objects.len(),
            rows = report.rows,
            "staged table"
        );
        Ok(report)
    }

    async fn write_single(&self, path: &str, table: &Table) -> Result<WriteReport, StoreError> {
        let bytes = encode_parquet(table)?;
        self.operator.write(path, bytes).await?;
        Ok(WriteReport {
            objects: vec![path.to_string()],
            rows: table.num_rows(),
        })
    }

    async fn write_partitioned(
        &self,
        path: &str,
        table: &Table,
        options: &WriteOptions,
    ) -> Result<WriteReport, StoreError> {
        // Group row indices by rendered partition path. BTreeMap keeps the
        // write order deterministic.
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for row in 0..table.num_rows() {
            let segments = table.partition_segments(row, &options.partition_cols)?;
            let dir = format!("{}/{}", path.trim_end_matches('/'), segments.join("/"));
            groups.entry(dir).or_default().push(row);
        }

        if options.mode == WriteMode::Overwrite {
            self.operator
                .remove_all(&format!("{}/", path.trim_end_matches('/')))
                .await?;
        }

        let prefix = options.file_prefix.as_deref().unwrap_or("");
        let mut objects = Vec::with_capacity(groups.len());
        let mut rows_written = 0;

        for (dir, rows) in &groups {
            if options.mode == WriteMode::OverwritePartitions {
                self.operator.remove_all(&format!("{dir}/")).await?;
            }

            let chunk = table.take_rows_without(rows, &options.partition_cols);
            let bytes = encode_parquet(&chunk)?;
            let object = format!("{dir}/{prefix}{}.parquet", Uuid::new_v4());

            debug!(object = %object, rows = rows.len(), "writing partition file");
            self.operator.write(&object, bytes).await?;

            rows_written += rows.len();
            objects.push(object);
        }

        Ok(WriteReport {
            objects,
            rows: rows_written,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnValues;
    use opendal::services;

    fn memory_writer() -> StagingWriter {
        StagingWriter::new(Operator::new(services::Memory::default()).unwrap().finish())
    }

    fn measurements() -> Table {
        Table::new()
            .with_column(
                "sensor_id",
                ColumnValues::Utf8(vec![
                    Some("100".into()),
                    Some("100".into()),
                    Some("200".into()),
                ]),
            )
            .unwrap()
            .with_column(
                "value",
                ColumnValues::Float64(vec![Some(12.5), Some(13.0), Some(7.25)]),
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_object_write_is_parquet() {
        let writer = memory_writer();
        let report = writer
            .write(
                "staging/OpenAQ/parameters/parameters.parquet",
                &measurements(),
                &WriteOptions::single_object(),
            )
            .await
            .unwrap();

        assert_eq!(report.rows, 3);
        let bytes = writer
            .operator()
            .read("staging/OpenAQ/parameters/parameters.parquet")
            .await
            .unwrap()
            .to_vec();
        assert_eq!(&bytes[0..4], b"PAR1");
    }

    #[tokio::test]
    async fn test_empty_table_rejected() {
        let writer = memory_writer();
        let err = writer
            .write("staging/x.parquet", &Table::new(), &WriteOptions::single_object())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyTable));
    }

    #[tokio::test]
    async fn test_partitioned_write_creates_hive_directories() {
        let writer = memory_writer();
        let report = writer
            .write(
                "staging/OpenAQ/measurements",
                &measurements(),
                &WriteOptions::partitioned(WriteMode::Append, ["sensor_id"])
                    .with_file_prefix("measure_"),
            )
            .await
            .unwrap();

        assert_eq!(report.objects.len(), 2);
        assert_eq!(report.rows, 3);
        assert!(report
            .objects
            .iter()
            .any(|o| o.starts_with("staging/OpenAQ/measurements/sensor_id=100/measure_")));
        assert!(report
            .objects
            .iter()
            .any(|o| o.starts_with("staging/OpenAQ/measurements/sensor_id=200/measure_")));
    }

    #[tokio::test]
    async fn test_append_keeps_existing_files() {
        let writer = memory_writer();
        let options = WriteOptions::partitioned(WriteMode::Append, ["sensor_id"]);

        let first = writer
            .write("staging/m", &measurements(), &options)
            .await
            .unwrap();
        let second = writer
            .write("staging/m", &measurements(), &options)
            .await
            .unwrap();

        for object in first.objects.iter().chain(&second.objects) {
            assert!(writer.operator().exists(object).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_overwrite_partitions_spares_siblings() {
        let writer = memory_writer();

        // Seed a sibling partition written by another invocation.
        writer
            .operator()
            .write("staging/m/sensor_id=999/old.parquet", vec![1u8])
            .await
            .unwrap();
        // And stale data in a partition this write will replace.
        writer
            .operator()
            .write("staging/m/sensor_id=100/stale.parquet", vec![1u8])
            .await
            .unwrap();

        writer
            .write(
                "staging/m",
                &measurements(),
                &WriteOptions::partitioned(WriteMode::OverwritePartitions, ["sensor_id"]),
            )
            .await
            .unwrap();

        assert!(writer
            .operator()
            .exists("staging/m/sensor_id=999/old.parquet")
            .await
            .unwrap());
        assert!(!writer
            .operator()
            .exists("staging/m/sensor_id=100/stale.parquet")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unknown_partition_column_rejected() {
        let writer = memory_writer();
        let err = writer
            .write(
                "staging/m",
                &measurements(),
                &WriteOptions::partitioned(WriteMode::Append, ["city"]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownPartitionColumn(_)));
    }
}
