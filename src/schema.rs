/// Column-name constants for weave-shift tables.
/// Single source of truth - also exported to Python when built with `python`.

// ── Input columns (loom event log) ──────────────────────────────────────────
pub mod input {
    pub const WEAVING_DATE: &str = "Weaving Date";
    pub const LOOM: &str = "Loom";
    pub const SHIFT: &str = "Shift";
    pub const TIMESTAMP: &str = "Base Date and Time";
    pub const PICK_COUNTER: &str = "Pick Counter";
    pub const RUNNING_STATUS: &str = "Running Status";

    pub const REQUIRED: [&str; 6] = [
        WEAVING_DATE,
        LOOM,
        SHIFT,
        TIMESTAMP,
        PICK_COUNTER,
        RUNNING_STATUS,
    ];
}

// ── Output columns (new shift report) ───────────────────────────────────────
pub mod output {
    pub const LOOM: &str = "Loom";
    pub const DATE: &str = "Date";
    pub const SHIFT: &str = "Shift";
    pub const RUNTIME: &str = "Runtime";
    pub const TOTAL_OUTPUT: &str = "Total Output";

    pub const ALL: [&str; 5] = [LOOM, DATE, SHIFT, RUNTIME, TOTAL_OUTPUT];
}

// ── Running status values ───────────────────────────────────────────────────
pub mod status {
    pub const RUNNING: &str = "RUNNING";
    pub const START: &str = "START";
    pub const STOP: &str = "STOP";
}
