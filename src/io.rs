//! Table loading and writing at the edge of the transform.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDateTime;
use polars::prelude::*;

use crate::error::ShiftError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// Format from the file extension, case-insensitive.
    pub fn from_path(path: &Path) -> Result<Self, ShiftError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            _ => Err(ShiftError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// Load an event log from CSV or Parquet.
///
/// CSV columns are all read as strings; the validator does the typing.
pub fn read_table(path: &Path) -> Result<DataFrame, ShiftError> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => read_csv_as_strings(path),
        TableFormat::Parquet => Ok(ParquetReader::new(File::open(path)?).finish()?),
    }
}

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
fn read_csv_as_strings(path: &Path) -> Result<DataFrame, ShiftError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

/// Write a table as CSV or Parquet, chosen by the path's extension.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<(), ShiftError> {
    let format = TableFormat::from_path(path)?;
    let mut file = File::create(path)?;
    match format {
        TableFormat::Csv => CsvWriter::new(&mut file).include_header(true).finish(df)?,
        TableFormat::Parquet => {
            ParquetWriter::new(file).finish(df)?;
        }
    }
    Ok(())
}

/// `new_shift_data_<YYYYmmdd_HHMMSS>.<ext>`
pub fn default_output_name(now: NaiveDateTime, format: TableFormat) -> String {
    format!(
        "new_shift_data_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}
