//! Schema check, type coercion and ordering of the raw loom event log.
//!
//! Polars does the column-level work (selection and non-strict casts); rows
//! are then lifted into [`InputRecord`]s so that every later stage works on
//! typed values. Rows that cannot be used are reported, never fatal.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use polars::datatypes::TimeUnit;
use polars::prelude::*;

use crate::error::ShiftError;
use crate::model::{DropReason, DroppedRow, InputRecord, Label, OriginalShift, RunningStatus};
use crate::schema::input;

/// Text layouts accepted for `Base Date and Time` when the column is a string.
const TIMESTAMP_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Validator output: usable records in processing order plus what was lost.
#[derive(Debug, Clone, Default)]
pub struct Validated {
    pub records: Vec<InputRecord>,
    pub dropped: Vec<DroppedRow>,
}

/// Fail with every missing required column, in schema order.
pub fn require_columns(df: &DataFrame) -> Result<(), ShiftError> {
    let schema = df.schema();
    let missing: Vec<String> = input::REQUIRED
        .iter()
        .copied()
        .filter(|name| !schema.contains(name))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ShiftError::MissingColumns(missing))
    }
}

/// Validate and order the event log.
///
/// Extra columns are ignored. Records are sorted stably by
/// `(weaving_date, loom, timestamp)`, absent labels last.
pub fn validate(df: &DataFrame) -> Result<Validated, ShiftError> {
    require_columns(df)?;

    let timestamp_is_temporal = matches!(
        df.column(input::TIMESTAMP)?.dtype(),
        DataType::Datetime(_, _) | DataType::Date
    );
    let coerced = df
        .clone()
        .lazy()
        .select([
            label_expr(df, input::WEAVING_DATE)?,
            label_expr(df, input::LOOM)?,
            label_expr(df, input::SHIFT)?,
            timestamp_expr(timestamp_is_temporal),
            counter_expr(df)?,
            label_expr(df, input::RUNNING_STATUS)?,
        ])
        .collect()?;

    let weaving_dates = coerced.column(input::WEAVING_DATE)?.str()?;
    let looms = coerced.column(input::LOOM)?.str()?;
    let shifts = coerced.column(input::SHIFT)?.str()?;
    let counters = coerced.column(input::PICK_COUNTER)?.f64()?;
    let statuses = coerced.column(input::RUNNING_STATUS)?.str()?;
    let timestamps: Vec<Option<NaiveDateTime>> = if timestamp_is_temporal {
        coerced
            .column(input::TIMESTAMP)?
            .i64()?
            .into_iter()
            .map(|us| us.and_then(micros_to_datetime))
            .collect()
    } else {
        coerced
            .column(input::TIMESTAMP)?
            .str()?
            .into_iter()
            .map(|s| s.and_then(parse_timestamp))
            .collect()
    };

    let mut validated = Validated::default();
    for (row, timestamp) in timestamps.into_iter().enumerate() {
        let Some(timestamp) = timestamp else {
            validated.dropped.push(DroppedRow {
                row,
                reason: DropReason::Timestamp,
            });
            continue;
        };
        let Some(pick_counter) = counters.get(row).filter(|v| !v.is_nan()) else {
            validated.dropped.push(DroppedRow {
                row,
                reason: DropReason::PickCounter,
            });
            continue;
        };
        let Some(status) = statuses.get(row).map(str::trim).filter(|s| !s.is_empty()) else {
            validated.dropped.push(DroppedRow {
                row,
                reason: DropReason::RunningStatus,
            });
            continue;
        };

        validated.records.push(InputRecord {
            row,
            weaving_date: to_label(weaving_dates.get(row)),
            loom: to_label(looms.get(row)),
            shift: shifts
                .get(row)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(OriginalShift::parse),
            timestamp,
            pick_counter,
            running_status: RunningStatus::parse(status),
        });
    }

    validated.records.sort_by(processing_order);

    debug!(
        "validated {} of {} rows ({} dropped)",
        validated.records.len(),
        coerced.height(),
        validated.dropped.len()
    );
    Ok(validated)
}

/// Render records back into an input-schema table.
///
/// Used to export the corrected log and to re-validate it.
pub fn records_to_frame(records: &[InputRecord]) -> Result<DataFrame, ShiftError> {
    let label = |l: &Option<Label>| l.as_ref().map(|v| v.as_str().to_string());
    let weaving_dates: Vec<Option<String>> = records.iter().map(|r| label(&r.weaving_date)).collect();
    let looms: Vec<Option<String>> = records.iter().map(|r| label(&r.loom)).collect();
    let shifts: Vec<Option<String>> = records
        .iter()
        .map(|r| {
            r.shift.as_ref().map(|s| match s {
                OriginalShift::A => "A".to_string(),
                OriginalShift::B => "B".to_string(),
                OriginalShift::C => "C".to_string(),
                OriginalShift::Other(other) => other.clone(),
            })
        })
        .collect();
    let timestamps: Vec<i64> = records
        .iter()
        .map(|r| r.timestamp.and_utc().timestamp_micros())
        .collect();
    let counters: Vec<f64> = records.iter().map(|r| r.pick_counter).collect();
    let statuses: Vec<String> = records
        .iter()
        .map(|r| match &r.running_status {
            RunningStatus::Running => crate::schema::status::RUNNING.to_string(),
            RunningStatus::Start => crate::schema::status::START.to_string(),
            RunningStatus::Stop => crate::schema::status::STOP.to_string(),
            RunningStatus::Other(other) => other.clone(),
        })
        .collect();

    let df = DataFrame::new(vec![
        Column::new(input::WEAVING_DATE.into(), &weaving_dates),
        Column::new(input::LOOM.into(), &looms),
        Column::new(input::SHIFT.into(), &shifts),
        Column::new(input::TIMESTAMP.into(), &timestamps)
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?,
        Column::new(input::PICK_COUNTER.into(), &counters),
        Column::new(input::RUNNING_STATUS.into(), &statuses),
    ])?;
    Ok(df)
}

// ── Coercion helpers ────────────────────────────────────────────────────────

/// Labels become trimmed-later strings; dates render as ISO `YYYY-MM-DD`.
fn label_expr(df: &DataFrame, name: &str) -> Result<Expr, ShiftError> {
    let expr = match df.column(name)?.dtype() {
        DataType::Date | DataType::Datetime(_, _) => {
            col(name).cast(DataType::Date).cast(DataType::String)
        }
        _ => col(name).cast(DataType::String),
    };
    Ok(expr.alias(name))
}

/// Temporal columns become microseconds since the epoch; anything else is
/// handed over as text and parsed row by row.
fn timestamp_expr(temporal: bool) -> Expr {
    let expr = if temporal {
        col(input::TIMESTAMP)
            .cast(DataType::Datetime(TimeUnit::Microseconds, None))
            .cast(DataType::Int64)
    } else {
        col(input::TIMESTAMP).cast(DataType::String)
    };
    expr.alias(input::TIMESTAMP)
}

/// Non-strict numeric cast: anything unparseable becomes null.
fn counter_expr(df: &DataFrame) -> Result<Expr, ShiftError> {
    let expr = match df.column(input::PICK_COUNTER)?.dtype() {
        DataType::String => col(input::PICK_COUNTER)
            .str()
            .strip_chars(lit(" \t\r\n"))
            .cast(DataType::Float64),
        _ => col(input::PICK_COUNTER).cast(DataType::Float64),
    };
    Ok(expr.alias(input::PICK_COUNTER))
}

fn to_label(value: Option<&str>) -> Option<Label> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(Label::new)
}

fn micros_to_datetime(us: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(us).map(|dt| dt.naive_utc())
}

/// Parse a timestamp cell, accepting a bare date as midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn cmp_labels(a: &Option<Label>, b: &Option<Label>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn processing_order(a: &InputRecord, b: &InputRecord) -> Ordering {
    cmp_labels(&a.weaving_date, &b.weaving_date)
        .then_with(|| cmp_labels(&a.loom, &b.loom))
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}
