use chrono::{DateTime, NaiveDate};
use polars::prelude::*;

use crate::error::ShiftError;
use crate::model::ResultRecord;
use crate::schema::output;

/// Render a duration in seconds as `HH:MM:SS`.
///
/// Fractional seconds are truncated; hours are not wrapped at 24.
pub fn format_runtime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Whole-number output for display, rounding half away from zero.
pub fn display_output(total_output: f64) -> i64 {
    if total_output.is_finite() {
        total_output.round() as i64
    } else {
        0
    }
}

/// Order results by `(loom, date, shift)`; equal keys keep their order.
pub fn assemble(mut records: Vec<ResultRecord>) -> Vec<ResultRecord> {
    records.sort_by(|a, b| {
        a.loom
            .cmp(&b.loom)
            .then_with(|| a.date.cmp(&b.date))
            .then_with(|| a.shift.cmp(&b.shift))
    });
    records
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.signed_duration_since(DateTime::UNIX_EPOCH.date_naive())
        .num_days() as i32
}

/// Build the output table: `Loom`, `Date`, `Shift`, `Runtime`, `Total Output`.
pub fn to_frame(records: &[ResultRecord]) -> Result<DataFrame, ShiftError> {
    let looms: Vec<String> = records.iter().map(|r| r.loom.to_string()).collect();
    let dates: Vec<i32> = records.iter().map(|r| days_since_epoch(r.date)).collect();
    let shifts: Vec<String> = records.iter().map(|r| r.shift.to_string()).collect();
    let runtimes: Vec<String> = records
        .iter()
        .map(|r| format_runtime(r.runtime_seconds))
        .collect();
    let outputs: Vec<i64> = records
        .iter()
        .map(|r| display_output(r.total_output))
        .collect();

    let df = DataFrame::new(vec![
        Column::new(output::LOOM.into(), &looms),
        Column::new(output::DATE.into(), &dates).cast(&DataType::Date)?,
        Column::new(output::SHIFT.into(), &shifts),
        Column::new(output::RUNTIME.into(), &runtimes),
        Column::new(output::TOTAL_OUTPUT.into(), &outputs),
    ])?;
    Ok(df)
}
