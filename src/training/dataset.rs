//! Tabular dataset loading
//!
//! CSV and Parquet files are read into Arrow record batches, every column is
//! cast to text, and cells are normalized (trimmed, missing markers mapped to
//! `None`). Column types are decided afterwards from the cell contents, so
//! placeholder values such as `?` do not turn a numeric column into text.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Array, StringArray};
use arrow::compute::cast;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{Result, RiskError};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Rows per record batch when reading datasets
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Cell contents treated as missing after trimming
pub const MISSING_MARKERS: &[&str] = &["", "?", "NA", "nan", "NaN"];

/// A named column of normalized text cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Numeric view of the column, `None` if any present cell is not a number
    #[must_use]
    pub fn as_numeric(&self) -> Option<Vec<Option<f64>>> {
        self.cells
            .iter()
            .map(|cell| match cell {
                Some(s) => s.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some),
                None => Some(None),
            })
            .collect()
    }
}

/// Columns of equal length read from one dataset file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularDataset {
    pub columns: Vec<Column>,
}

impl TabularDataset {
    /// Build from columns, which must all have the same length
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.cells.len() != first.cells.len()) {
                return Err(RiskError::dataset(format!(
                    "column {} has {} rows, expected {}",
                    bad.name,
                    bad.cells.len(),
                    first.cells.len()
                )));
            }
        }
        Ok(Self { columns })
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Remove and return a column
    pub fn take_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx))
    }

    /// Keep only the rows whose index is selected by `keep`
    #[must_use]
    pub fn filter_rows(&self, keep: &[bool]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let cells = c
                    .cells
                    .iter()
                    .zip(keep)
                    .filter(|(_, k)| **k)
                    .map(|(cell, _)| cell.clone())
                    .collect();
                Column::new(c.name.clone(), cells)
            })
            .collect();
        Self { columns }
    }

    /// Convert Arrow record batches, casting every column to text
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let Some(first) = batches.first() else {
            return Ok(Self::default());
        };
        let schema = first.schema();
        let mut columns: Vec<Column> = schema
            .fields()
            .iter()
            .map(|f| Column::new(f.name().trim(), Vec::new()))
            .collect();

        for batch in batches {
            if batch.num_columns() != columns.len() {
                return Err(RiskError::dataset("record batches have differing column counts"));
            }
            for (column, array) in columns.iter_mut().zip(batch.columns()) {
                let text = cast(array, &DataType::Utf8)?;
                let strings = text
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .ok_or_else(|| {
                        RiskError::dataset(format!("column {} is not text", column.name))
                    })?;
                column.cells.extend((0..strings.len()).map(|i| {
                    if strings.is_null(i) {
                        None
                    } else {
                        normalize_cell(strings.value(i))
                    }
                }));
            }
        }

        Self::new(columns)
    }
}

/// Trim a cell and map missing markers to `None`
#[must_use]
pub fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Load a CSV or Parquet dataset, chosen by file extension
pub fn load_dataset(path: &Path) -> Result<TabularDataset> {
    log_operation_start("Loading dataset", path);
    let start = Instant::now();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    let batches = match extension.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("parquet") | Some("pq") => read_parquet(path)?,
        _ => {
            return Err(RiskError::dataset(format!(
                "unsupported dataset format: {}",
                path.display()
            )));
        }
    };

    let dataset = TabularDataset::from_batches(&batches)?;
    log_operation_complete("loaded", path, dataset.num_rows(), Some(start.elapsed()));
    Ok(dataset)
}

/// Read a CSV file with every column typed as text
fn read_csv(path: &Path) -> Result<Vec<RecordBatch>> {
    let mut file = File::open(path)?;
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(100))?;
    file.rewind()?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let reader = ReaderBuilder::new(Arc::new(Schema::new(fields)))
        .with_header(true)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(file)?;

    reader.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build()?;

    reader.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}
