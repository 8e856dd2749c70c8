use log::{error, info, warn};
use polars::prelude::*;

use crate::assemble;
use crate::config::ShiftConfig;
use crate::correction;
use crate::error::ShiftError;
use crate::model::{DroppedRow, InputRecord, ResultRecord};
use crate::remap;
use crate::validate;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct TransformReport {
    /// Ordered by `(loom, date, shift)`
    pub results: Vec<ResultRecord>,
    pub dropped: Vec<DroppedRow>,
    /// `results` rendered with the output schema
    pub table: DataFrame,
}

/// Validated and warm-up corrected records, before remapping.
pub fn corrected_records(
    df: &DataFrame,
    config: &ShiftConfig,
) -> Result<(Vec<InputRecord>, Vec<DroppedRow>), ShiftError> {
    let validated = validate::validate(df)?;
    if !validated.dropped.is_empty() {
        warn!(
            "dropped {} unusable rows out of {}",
            validated.dropped.len(),
            df.height()
        );
    }
    let records = correction::zero_warmup_counters(validated.records, config.warmup_readings);
    Ok((records, validated.dropped))
}

/// Run the whole transform over a loom event log.
///
/// Fails only on a structural problem (missing columns, unreadable column
/// types); bad rows are dropped and reported in the result.
pub fn transform(df: &DataFrame, config: &ShiftConfig) -> Result<TransformReport, ShiftError> {
    let (records, dropped) = corrected_records(df, config)?;
    let results = assemble::assemble(remap::remap(&records, config));
    let table = assemble::to_frame(&results)?;

    info!(
        "converted {} records into {} shift rows ({} rows dropped)",
        records.len(),
        results.len(),
        dropped.len()
    );
    Ok(TransformReport {
        results,
        dropped,
        table,
    })
}

/// Boundary form of [`transform`]: always a table, plus a message on failure.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub table: DataFrame,
    pub dropped: Vec<DroppedRow>,
    pub message: Option<String>,
}

impl Conversion {
    fn failed(message: String) -> Self {
        let table = assemble::to_frame(&[]).unwrap_or_else(|_| DataFrame::empty());
        Self {
            table,
            dropped: Vec::new(),
            message: Some(message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.height() == 0
    }
}

/// Run [`transform`], turning any failure into an empty table and a
/// human-readable message.
pub fn convert(df: &DataFrame, config: &ShiftConfig) -> Conversion {
    match transform(df, config) {
        Ok(report) => Conversion {
            table: report.table,
            dropped: report.dropped,
            message: None,
        },
        Err(err @ ShiftError::MissingColumns(_)) => {
            error!("{err}");
            Conversion::failed(err.to_string())
        }
        Err(err) => {
            error!("transform failed: {err}");
            Conversion::failed(format!("Unexpected error: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::input;

    #[test]
    fn missing_column_gives_empty_table_and_message() {
        let df = df!(
            input::WEAVING_DATE => &["2024-03-01"],
            input::LOOM => &["1"],
            input::SHIFT => &["A"],
            input::TIMESTAMP => &["2024-03-01 07:00:00"],
            input::RUNNING_STATUS => &["RUNNING"]
        )
        .unwrap();

        let conversion = convert(&df, &ShiftConfig::default());
        assert!(conversion.is_empty());
        let message = conversion.message.unwrap();
        assert!(message.contains(input::PICK_COUNTER), "{message}");
    }

    #[test]
    fn all_rows_dropped_is_not_an_error() {
        let df = df!(
            input::WEAVING_DATE => &["2024-03-01"],
            input::LOOM => &["1"],
            input::SHIFT => &["A"],
            input::TIMESTAMP => &["garbage"],
            input::PICK_COUNTER => &["1"],
            input::RUNNING_STATUS => &["RUNNING"]
        )
        .unwrap();

        let report = transform(&df, &ShiftConfig::default()).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.table.height(), 0);
    }
}
