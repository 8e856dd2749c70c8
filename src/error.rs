use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported table format: {0}")]
    UnsupportedFormat(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("{0}")]
    General(String),
}

/// Failure while summing running intervals for one shift window.
///
/// Never escapes the remapper: the window's runtime falls back to zero.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntervalError {
    #[error("running time overflowed after {pairs} intervals")]
    Overflow { pairs: usize },
}

#[cfg(feature = "python")]
impl From<ShiftError> for pyo3::PyErr {
    fn from(err: ShiftError) -> pyo3::PyErr {
        pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_every_name() {
        let err = ShiftError::MissingColumns(vec!["Loom".into(), "Pick Counter".into()]);
        assert_eq!(
            err.to_string(),
            "Missing required columns: Loom, Pick Counter"
        );
    }
}
