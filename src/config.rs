use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Seconds since midnight for a wall-clock time.
pub const fn hms(hour: u32, minute: u32, second: u32) -> u32 {
    hour * 3600 + minute * 60 + second
}

/// Time-of-day of `time`, truncated to whole seconds.
pub fn second_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight()
}

// ── Time ranges and windows ─────────────────────────────────────────────────

/// Inclusive range of seconds-of-day, e.g. `07:00:00..=14:59:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

impl TimeRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, second: u32) -> bool {
        self.start <= second && second <= self.end
    }
}

/// Shift of the new two-shift scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NewShift {
    AA,
    BB,
}

impl NewShift {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewShift::AA => "AA",
            NewShift::BB => "BB",
        }
    }
}

impl fmt::Display for NewShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A new-scheme shift window: one or more time-of-day ranges.
///
/// BB wraps midnight, so it is stored as two ranges rather than one
/// range with `start > end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftWindow {
    pub shift: NewShift,
    pub ranges: Vec<TimeRange>,
}

impl ShiftWindow {
    pub fn contains(&self, second: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(second))
    }
}

// ── Pairing policy ──────────────────────────────────────────────────────────

/// How start events are matched with end events when summing runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndPairing {
    /// Every start takes the next end after it, even if an earlier start
    /// already took the same end. Matches the historical reports.
    #[default]
    Shared,
    /// An end closes at most one start.
    Exclusive,
}

// ── Config ──────────────────────────────────────────────────────────────────

/// Shift boundaries and pipeline knobs.
///
/// The two shift schemes are fixed for this version; `Default` carries them.
/// Only `warmup_readings` and `end_pairing` are meant to be overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftConfig {
    /// Original shift A
    pub shift_a: TimeRange,
    /// Original shift B
    pub shift_b: TimeRange,
    /// Original shift C
    pub shift_c: TimeRange,
    pub aa: ShiftWindow,
    pub bb: ShiftWindow,
    /// Leading readings per (shift, loom) whose counter is zeroed
    pub warmup_readings: usize,
    pub end_pairing: EndPairing,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            shift_a: TimeRange::new(hms(7, 0, 0), hms(14, 59, 59)),
            shift_b: TimeRange::new(hms(15, 0, 0), hms(23, 59, 59)),
            shift_c: TimeRange::new(hms(0, 0, 0), hms(6, 59, 59)),
            aa: ShiftWindow {
                shift: NewShift::AA,
                ranges: vec![TimeRange::new(hms(7, 0, 0), hms(18, 59, 59))],
            },
            bb: ShiftWindow {
                shift: NewShift::BB,
                ranges: vec![
                    TimeRange::new(hms(19, 0, 0), hms(23, 59, 59)),
                    TimeRange::new(hms(0, 0, 0), hms(6, 59, 59)),
                ],
            },
            warmup_readings: 5,
            end_pairing: EndPairing::Shared,
        }
    }
}

impl ShiftConfig {
    /// New-scheme window for a time-of-day, AA taking precedence.
    pub fn classify(&self, time: NaiveTime) -> Option<NewShift> {
        let second = second_of_day(time);
        if self.aa.contains(second) {
            Some(NewShift::AA)
        } else if self.bb.contains(second) {
            Some(NewShift::BB)
        } else {
            None
        }
    }

    /// Last second of the AA window, the cut-off for the B interim reading.
    pub fn aa_end(&self) -> u32 {
        self.aa.ranges.iter().map(|r| r.end).max().unwrap_or(0)
    }
}
