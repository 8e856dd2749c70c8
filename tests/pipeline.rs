use std::io::Write;

use chrono::NaiveDate;
use polars::prelude::*;
use tempfile::Builder;

use weave_shift::io;
use weave_shift::model::DropReason;
use weave_shift::schema::{input, output};
use weave_shift::{convert, transform, NewShift, ShiftConfig};

/// `(weaving date, loom, shift, timestamp, pick counter, status)`
type Row<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str, &'a str);

fn column(rows: &[Row], pick: impl Fn(&Row) -> String) -> Vec<String> {
    rows.iter().map(pick).collect()
}

fn event_log(rows: &[Row]) -> DataFrame {
    df!(
        input::WEAVING_DATE => column(rows, |r| r.0.to_string()),
        input::LOOM => column(rows, |r| r.1.to_string()),
        input::SHIFT => column(rows, |r| r.2.to_string()),
        input::TIMESTAMP => column(rows, |r| r.3.to_string()),
        input::PICK_COUNTER => column(rows, |r| r.4.to_string()),
        input::RUNNING_STATUS => column(rows, |r| r.5.to_string())
    )
    .unwrap()
}

fn no_warmup() -> ShiftConfig {
    ShiftConfig {
        warmup_readings: 0,
        ..ShiftConfig::default()
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

#[test]
fn single_morning_run() {
    let df = event_log(&[
        ("2024-03-01", "1", "A", "2024-03-01 07:00:00", "0", "STOP"),
        ("2024-03-01", "1", "A", "2024-03-01 07:00:00", "0", "START"),
        ("2024-03-01", "1", "A", "2024-03-01 09:00:00", "120", "STOP"),
    ]);

    let report = transform(&df, &no_warmup()).unwrap();
    assert_eq!(report.results.len(), 1);
    let aa = &report.results[0];
    assert_eq!(aa.shift, NewShift::AA);
    assert_eq!(aa.date, date(1));
    assert_eq!(aa.total_output, 120.0);

    let runtime = report.table.column(output::RUNTIME).unwrap().str().unwrap();
    assert_eq!(runtime.get(0), Some("02:00:00"));
}

#[test]
fn night_window_crosses_midnight() {
    let df = event_log(&[
        ("2024-03-01", "1", "B", "2024-03-01 22:00:00", "300", "RUNNING"),
        ("2024-03-01", "1", "C", "2024-03-02 02:00:00", "50", "RUNNING"),
    ]);

    let report = transform(&df, &no_warmup()).unwrap();
    assert_eq!(report.results.len(), 1);
    let bb = &report.results[0];
    assert_eq!(bb.shift, NewShift::BB);
    assert_eq!(bb.date, date(1));
    assert_eq!(bb.total_output, 350.0);
}

#[test]
fn missing_pick_counter_column() {
    let df = df!(
        input::WEAVING_DATE => &["2024-03-01"],
        input::LOOM => &["1"],
        input::SHIFT => &["A"],
        input::TIMESTAMP => &["2024-03-01 07:00:00"],
        input::RUNNING_STATUS => &["RUNNING"]
    )
    .unwrap();

    let conversion = convert(&df, &ShiftConfig::default());
    assert_eq!(conversion.table.height(), 0);
    assert_eq!(
        conversion.message.as_deref(),
        Some("Missing required columns: Pick Counter")
    );
}

#[test]
fn alternating_stops_sum_each_cycle() {
    let df = event_log(&[
        ("2024-03-01", "1", "A", "2024-03-01 08:00:00", "0", "STOP"),
        ("2024-03-01", "1", "A", "2024-03-01 08:30:00", "0", "RUNNING"),
        ("2024-03-01", "1", "A", "2024-03-01 09:00:00", "10", "STOP"),
        ("2024-03-01", "1", "A", "2024-03-01 11:00:00", "10", "RUNNING"),
        ("2024-03-01", "1", "A", "2024-03-01 12:15:00", "25", "STOP"),
    ]);

    let report = transform(&df, &no_warmup()).unwrap();
    // 30 min + 75 min, not 08:30 -> 12:15
    assert_eq!(report.results[0].runtime_seconds, 105.0 * 60.0);
}

#[test]
fn warmup_readings_are_zeroed_before_totals() {
    let mut rows: Vec<Row> = vec![
        ("2024-03-01", "1", "A", "2024-03-01 07:00:00", "90000", "RUNNING"),
        ("2024-03-01", "1", "A", "2024-03-01 07:01:00", "90000", "RUNNING"),
        ("2024-03-01", "1", "A", "2024-03-01 07:02:00", "90000", "RUNNING"),
        ("2024-03-01", "1", "A", "2024-03-01 07:03:00", "90000", "RUNNING"),
        ("2024-03-01", "1", "A", "2024-03-01 07:04:00", "90000", "RUNNING"),
    ];
    rows.push(("2024-03-01", "1", "A", "2024-03-01 14:00:00", "700", "RUNNING"));

    let report = transform(&event_log(&rows), &ShiftConfig::default()).unwrap();
    assert_eq!(report.results[0].total_output, 700.0);
}

#[test]
fn output_is_ordered_by_loom_date_shift() {
    let df = event_log(&[
        ("2024-03-02", "2", "A", "2024-03-02 08:00:00", "5", "RUNNING"),
        ("2024-03-01", "10", "B", "2024-03-01 20:00:00", "5", "RUNNING"),
        ("2024-03-01", "2", "B", "2024-03-01 20:00:00", "5", "RUNNING"),
        ("2024-03-01", "2", "A", "2024-03-01 08:00:00", "5", "RUNNING"),
    ]);

    let report = transform(&df, &no_warmup()).unwrap();
    let keys: Vec<(String, NaiveDate, NewShift)> = report
        .results
        .iter()
        .map(|r| (r.loom.to_string(), r.date, r.shift))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("2".to_string(), date(1), NewShift::AA),
            ("2".to_string(), date(1), NewShift::BB),
            ("2".to_string(), date(2), NewShift::AA),
            ("10".to_string(), date(1), NewShift::BB),
        ]
    );
}

#[test]
fn dropped_rows_are_reported_without_failing() {
    let df = event_log(&[
        ("2024-03-01", "1", "A", "2024-03-01 08:00:00", "5", "RUNNING"),
        ("2024-03-01", "1", "A", "31/31/2024", "5", "RUNNING"),
        ("2024-03-01", "1", "A", "2024-03-01 09:00:00", "n/a", "RUNNING"),
    ]);

    let report = transform(&df, &no_warmup()).unwrap();
    assert_eq!(report.results.len(), 1);
    let reasons: Vec<(usize, DropReason)> =
        report.dropped.iter().map(|d| (d.row, d.reason)).collect();
    assert_eq!(
        reasons,
        vec![(1, DropReason::Timestamp), (2, DropReason::PickCounter)]
    );
}

#[test]
fn csv_file_end_to_end() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        file,
        "Weaving Date,Loom,Shift,Base Date and Time,Pick Counter,Running Status,Operator"
    )
    .unwrap();
    writeln!(file, "2024-03-01,4,A,2024-03-01 10:00:00,400,RUNNING,ana").unwrap();
    writeln!(file, "2024-03-01,4,B,2024-03-01 17:00:00,60,RUNNING,ben").unwrap();
    writeln!(file, "2024-03-01,4,B,2024-03-01 23:00:00,200,RUNNING,ben").unwrap();

    let df = io::read_table(file.path()).unwrap();
    let mut conversion = convert(&df, &no_warmup());
    assert!(conversion.message.is_none());

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.csv");
    io::write_table(&mut conversion.table, &out).unwrap();

    let written = io::read_table(&out).unwrap();
    let totals: Vec<Option<&str>> = written
        .column(output::TOTAL_OUTPUT)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(totals, vec![Some("460"), Some("140")]);
    let dates = written.column(output::DATE).unwrap().str().unwrap();
    assert_eq!(dates.get(0), Some("2024-03-01"));
}
