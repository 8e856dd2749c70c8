use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::config::{EndPairing, ShiftConfig};
use crate::pipeline;
use crate::schema;
use crate::validate;

fn config_from_args(warmup_readings: usize, exclusive_pairing: bool) -> ShiftConfig {
    ShiftConfig {
        warmup_readings,
        end_pairing: if exclusive_pairing {
            EndPairing::Exclusive
        } else {
            EndPairing::Shared
        },
        ..ShiftConfig::default()
    }
}

/// Convert an A/B/C loom event log into the AA/BB shift report.
///
/// Raises RuntimeError naming the missing columns when the log is incomplete.
#[pyfunction]
#[pyo3(signature = (df, warmup_readings=5, exclusive_pairing=false))]
fn convert_shifts(
    df: PyDataFrame,
    warmup_readings: usize,
    exclusive_pairing: bool,
) -> PyResult<PyDataFrame> {
    let config = config_from_args(warmup_readings, exclusive_pairing);
    let report = pipeline::transform(&df.0, &config)?;
    Ok(PyDataFrame(report.table))
}

/// Validated, warm-up corrected log plus `(row, reason)` for every dropped row.
#[pyfunction]
#[pyo3(signature = (df, warmup_readings=5))]
fn corrected_log(
    df: PyDataFrame,
    warmup_readings: usize,
) -> PyResult<(PyDataFrame, Vec<(usize, String)>)> {
    let config = config_from_args(warmup_readings, false);
    let (records, dropped) = pipeline::corrected_records(&df.0, &config)?;
    let table = validate::records_to_frame(&records)?;
    let dropped = dropped
        .into_iter()
        .map(|d| (d.row, d.reason.to_string()))
        .collect();
    Ok((PyDataFrame(table), dropped))
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let input = PyModule::new(m.py(), "input")?;
    input.add("WEAVING_DATE", schema::input::WEAVING_DATE)?;
    input.add("LOOM", schema::input::LOOM)?;
    input.add("SHIFT", schema::input::SHIFT)?;
    input.add("TIMESTAMP", schema::input::TIMESTAMP)?;
    input.add("PICK_COUNTER", schema::input::PICK_COUNTER)?;
    input.add("RUNNING_STATUS", schema::input::RUNNING_STATUS)?;
    m.add_submodule(&input)?;

    let output = PyModule::new(m.py(), "output")?;
    output.add("LOOM", schema::output::LOOM)?;
    output.add("DATE", schema::output::DATE)?;
    output.add("SHIFT", schema::output::SHIFT)?;
    output.add("RUNTIME", schema::output::RUNTIME)?;
    output.add("TOTAL_OUTPUT", schema::output::TOTAL_OUTPUT)?;
    m.add_submodule(&output)?;

    Ok(())
}

#[pymodule]
fn weave_shift(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(convert_shifts, m)?)?;
    m.add_function(wrap_pyfunction!(corrected_log, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}
