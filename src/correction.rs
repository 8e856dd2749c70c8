use std::collections::HashMap;

use log::debug;

use crate::model::{InputRecord, Label, OriginalShift};

/// Zero the pick counter of the first `warmup_readings` records of every
/// (original shift, loom) pair, in processing order.
///
/// Only shifts A, B and C with a known loom are corrected. Returns a new
/// vector; the input order is preserved.
pub fn zero_warmup_counters(records: Vec<InputRecord>, warmup_readings: usize) -> Vec<InputRecord> {
    let mut seen: HashMap<(OriginalShift, Label), usize> = HashMap::new();
    let mut zeroed = 0usize;

    let corrected: Vec<InputRecord> = records
        .into_iter()
        .map(|mut record| {
            if let (Some(shift), Some(loom)) = (&record.shift, &record.loom) {
                if shift.is_known() {
                    let count = seen.entry((shift.clone(), loom.clone())).or_insert(0);
                    if *count < warmup_readings {
                        record.pick_counter = 0.0;
                        zeroed += 1;
                    }
                    *count += 1;
                }
            }
            record
        })
        .collect();

    debug!(
        "zeroed warm-up counters on {zeroed} records across {} shift/loom runs",
        seen.len()
    );
    corrected
}
