//! Re-bucketing of corrected loom records into the AA/BB shift scheme.
//!
//! Records are partitioned by `(loom, weaving date)`. Inside a partition the
//! new window of a record is decided by its time-of-day alone; the original
//! A/B/C label only decides which counter readings feed the output figure.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use log::{debug, warn};

use crate::config::{NewShift, ShiftConfig};
use crate::model::{InputRecord, Label, OriginalShift, ResultRecord};
use crate::runtime;

/// `(loom, weaving date)`, ordered loom first.
pub type PartitionKey = (Label, Label);

/// Counter readings behind one window's output figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputBreakdown {
    Aa {
        shift_a_max: f64,
        shift_b_interim: f64,
    },
    Bb {
        shift_b_max: f64,
        /// Taken from the whole partition, not just the BB records
        shift_b_interim: f64,
        shift_b_contribution: f64,
        shift_c_max: f64,
    },
}

impl OutputBreakdown {
    pub fn total(&self) -> f64 {
        match *self {
            OutputBreakdown::Aa {
                shift_a_max,
                shift_b_interim,
            } => shift_a_max + shift_b_interim,
            OutputBreakdown::Bb {
                shift_b_contribution,
                shift_c_max,
                ..
            } => shift_b_contribution + shift_c_max,
        }
    }
}

/// Figures for one non-empty window of one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowResult {
    pub shift: NewShift,
    /// Calendar date of the window's earliest record
    pub date: NaiveDate,
    pub records: usize,
    pub runtime_seconds: f64,
    pub breakdown: OutputBreakdown,
}

impl WindowResult {
    pub fn total_output(&self) -> f64 {
        self.breakdown.total()
    }

    fn into_result(self, loom: &Label) -> ResultRecord {
        ResultRecord {
            loom: loom.clone(),
            date: self.date,
            shift: self.shift,
            runtime_seconds: self.runtime_seconds,
            total_output: self.breakdown.total(),
        }
    }
}

// ── Partitioning ────────────────────────────────────────────────────────────

/// Group records by `(loom, weaving date)`, keeping their order.
///
/// Records without a loom or weaving date belong to no partition.
pub fn partition(records: &[InputRecord]) -> BTreeMap<PartitionKey, Vec<&InputRecord>> {
    let mut partitions: BTreeMap<PartitionKey, Vec<&InputRecord>> = BTreeMap::new();
    let mut unkeyed = 0usize;

    for record in records {
        match (&record.loom, &record.weaving_date) {
            (Some(loom), Some(date)) => partitions
                .entry((loom.clone(), date.clone()))
                .or_default()
                .push(record),
            _ => unkeyed += 1,
        }
    }

    if unkeyed > 0 {
        debug!("{unkeyed} records without loom or weaving date left out of partitioning");
    }
    partitions
}

/// Split a partition into its AA and BB records by time-of-day.
pub fn split_windows<'a>(
    records: &[&'a InputRecord],
    config: &ShiftConfig,
) -> (Vec<&'a InputRecord>, Vec<&'a InputRecord>) {
    let mut aa = Vec::new();
    let mut bb = Vec::new();
    for &record in records {
        match config.classify(record.timestamp.time()) {
            Some(NewShift::AA) => aa.push(record),
            Some(NewShift::BB) => bb.push(record),
            None => debug!("row {} falls outside both shift windows", record.row),
        }
    }
    (aa, bb)
}

// ── Per-partition figures ───────────────────────────────────────────────────

fn max_counter<'a>(records: impl Iterator<Item = &'a InputRecord>) -> f64 {
    records
        .map(|r| r.pick_counter)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0)
}

fn last_counter<'a>(records: impl Iterator<Item = &'a InputRecord>) -> f64 {
    records.last().map_or(0.0, |r| r.pick_counter)
}

/// Records carrying `shift` whose time-of-day is at or before `until`.
///
/// The cut-off is the exact instant `until` seconds after midnight, so a
/// reading at 14:59:59.5 is past a 14:59:59 cut-off.
fn labelled_until<'a, 'b>(
    records: &'b [&'a InputRecord],
    shift: &'b OriginalShift,
    until: u32,
) -> impl Iterator<Item = &'a InputRecord> + 'b {
    let cutoff = NaiveTime::from_num_seconds_from_midnight_opt(until, 0);
    records.iter().copied().filter(move |r| {
        r.is_shift(shift) && cutoff.is_some_and(|c| r.timestamp.time() <= c)
    })
}

fn window_runtime(window: &[&InputRecord], config: &ShiftConfig, shift: NewShift) -> f64 {
    runtime::running_seconds(window, config.end_pairing).unwrap_or_else(|err| {
        let row = window.first().map_or(0, |r| r.row);
        warn!("{shift} runtime reset to zero for partition starting at row {row}: {err}");
        0.0
    })
}

fn earliest_date(window: &[&InputRecord]) -> Option<NaiveDate> {
    window.iter().map(|r| r.timestamp).min().map(|ts| ts.date())
}

/// AA and BB figures for one `(loom, weaving date)` partition.
///
/// Empty windows yield nothing, so a partition gives zero, one or two
/// results, AA first.
pub fn remap_partition(records: &[&InputRecord], config: &ShiftConfig) -> Vec<WindowResult> {
    let (aa, bb) = split_windows(records, config);
    let aa_end = config.aa_end();
    let mut results = Vec::with_capacity(2);

    if let Some(date) = earliest_date(&aa) {
        let breakdown = OutputBreakdown::Aa {
            shift_a_max: max_counter(labelled_until(&aa, &OriginalShift::A, config.shift_a.end)),
            shift_b_interim: last_counter(labelled_until(&aa, &OriginalShift::B, aa_end)),
        };
        results.push(WindowResult {
            shift: NewShift::AA,
            date,
            records: aa.len(),
            runtime_seconds: window_runtime(&aa, config, NewShift::AA),
            breakdown,
        });
    }

    if let Some(date) = earliest_date(&bb) {
        let shift_b_max = max_counter(labelled_until(&bb, &OriginalShift::B, config.shift_b.end));
        let shift_b_interim = last_counter(labelled_until(records, &OriginalShift::B, aa_end));
        let shift_b_contribution = (shift_b_max - shift_b_interim).max(0.0);
        let breakdown = OutputBreakdown::Bb {
            shift_b_max,
            shift_b_interim,
            shift_b_contribution,
            shift_c_max: max_counter(labelled_until(&bb, &OriginalShift::C, config.shift_c.end)),
        };
        results.push(WindowResult {
            shift: NewShift::BB,
            date,
            records: bb.len(),
            runtime_seconds: window_runtime(&bb, config, NewShift::BB),
            breakdown,
        });
    }

    results
}

/// Remap every partition of the corrected log into result records.
///
/// Partitions are processed in key order; no partition sees another's data.
pub fn remap(records: &[InputRecord], config: &ShiftConfig) -> Vec<ResultRecord> {
    let partitions = partition(records);
    let mut results = Vec::with_capacity(partitions.len() * 2);

    for ((loom, weaving_date), members) in &partitions {
        let windows = remap_partition(members, config);
        debug!(
            "loom {loom} weaving date {weaving_date}: {} records, {} windows",
            members.len(),
            windows.len()
        );
        results.extend(windows.into_iter().map(|w| w.into_result(loom)));
    }
    results
}
