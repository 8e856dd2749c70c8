use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::NewShift;
use crate::schema::status;

// ── Labels ──────────────────────────────────────────────────────────────────

/// Loom id or weaving date as it appears in the event log.
///
/// Ordering is numeric-aware: labels that parse as integers compare by value
/// and come before all other labels, which compare as text. Loom "9" sorts
/// before loom "10", and ISO dates sort chronologically. Whole floats such as
/// "7.0" (a float-typed loom column) count as integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        let text = self.0.trim();
        text.parse().ok().or_else(|| {
            let value: f64 = text.parse().ok()?;
            (value.fract() == 0.0 && value.abs() < 9.0e15).then_some(value as i64)
        })
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ── Categorical fields ──────────────────────────────────────────────────────

/// Shift label of the original three-shift scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OriginalShift {
    A,
    B,
    C,
    /// Any other label. Carried through but never corrected or counted.
    Other(String),
}

impl OriginalShift {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "A" => Self::A,
            "B" => Self::B,
            "C" => Self::C,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunningStatus {
    Running,
    Start,
    Stop,
    Other(String),
}

impl RunningStatus {
    /// Labels are matched exactly after trimming; "stop" is not STOP.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            status::RUNNING => Self::Running,
            status::START => Self::Start,
            status::STOP => Self::Stop,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Start)
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

// ── Records ─────────────────────────────────────────────────────────────────

/// One validated sensor report.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    /// Zero-based row of the input table this record came from
    pub row: usize,
    pub weaving_date: Option<Label>,
    pub loom: Option<Label>,
    pub shift: Option<OriginalShift>,
    pub timestamp: NaiveDateTime,
    pub pick_counter: f64,
    pub running_status: RunningStatus,
}

impl InputRecord {
    pub fn is_shift(&self, shift: &OriginalShift) -> bool {
        self.shift.as_ref() == Some(shift)
    }
}

/// Why the validator discarded an input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Timestamp,
    PickCounter,
    RunningStatus,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Timestamp => f.write_str("missing or unparseable timestamp"),
            DropReason::PickCounter => f.write_str("missing or non-numeric pick counter"),
            DropReason::RunningStatus => f.write_str("missing running status"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedRow {
    pub row: usize,
    pub reason: DropReason,
}

/// Production figures of one loom for one new-scheme shift.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub loom: Label,
    pub date: NaiveDate,
    pub shift: NewShift,
    pub runtime_seconds: f64,
    pub total_output: f64,
}
