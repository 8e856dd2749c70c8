//! Running-time reconstruction from status transitions.
//!
//! A start event is an active record (RUNNING or START) directly preceded by
//! STOP; an end event is a STOP directly preceded by an active record. Each
//! start is closed by the earliest end strictly after it.

use chrono::{NaiveDateTime, TimeDelta};

use crate::config::EndPairing;
use crate::error::IntervalError;
use crate::model::InputRecord;

/// One continuous running period, `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl RunInterval {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Start and end event timestamps of a window, both ascending.
fn transition_events(records: &[&InputRecord]) -> (Vec<NaiveDateTime>, Vec<NaiveDateTime>) {
    let mut ordered = records.to_vec();
    ordered.sort_by_key(|r| r.timestamp);

    let mut starts = Vec::new();
    let mut ends = Vec::new();
    for pair in ordered.windows(2) {
        let (prev, current) = (&pair[0].running_status, &pair[1].running_status);
        if current.is_active() && prev.is_stop() {
            starts.push(pair[1].timestamp);
        } else if current.is_stop() && prev.is_active() {
            ends.push(pair[1].timestamp);
        }
    }
    (starts, ends)
}

/// Pair start events with end events.
///
/// With [`EndPairing::Shared`] one end may close several starts, which
/// counts the overlap more than once. [`EndPairing::Exclusive`] drops a start
/// whose next end is already taken.
pub fn run_intervals(records: &[&InputRecord], pairing: EndPairing) -> Vec<RunInterval> {
    let (starts, ends) = transition_events(records);
    let mut intervals = Vec::with_capacity(starts.len());
    let mut first_free = 0usize;

    for start in starts {
        let next = ends.partition_point(|end| *end <= start);
        // Already running: the earlier start owns this end.
        if pairing == EndPairing::Exclusive && next < first_free {
            continue;
        }
        if let Some(&end) = ends.get(next) {
            intervals.push(RunInterval { start, end });
            first_free = next + 1;
        }
    }
    intervals
}

/// Total running time of a window in seconds.
pub fn running_seconds(
    records: &[&InputRecord],
    pairing: EndPairing,
) -> Result<f64, IntervalError> {
    let intervals = run_intervals(records, pairing);
    let mut total = TimeDelta::zero();
    for (pairs, interval) in intervals.iter().enumerate() {
        let duration = interval.duration();
        if duration <= TimeDelta::zero() {
            continue;
        }
        total = total
            .checked_add(&duration)
            .ok_or(IntervalError::Overflow { pairs })?;
    }

    let micros = total.num_microseconds().ok_or(IntervalError::Overflow {
        pairs: intervals.len(),
    })?;
    Ok(micros as f64 / 1_000_000.0)
}
