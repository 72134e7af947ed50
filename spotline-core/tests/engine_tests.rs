//! End-to-end engine tests: synthetic extracted rows, with the artifact
//! noise the real documents carry, driven through the full processor.
//! Every assertion here is an auditable business property — spot and
//! revenue totals must match the source document exactly.

use chrono::NaiveDate;
use spotline_core::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn row(index: usize, day: &str, time: &str, rate: &str, program: &str, spots: &[&str]) -> RawRow {
    let mut cells = vec![
        RawCell::new(ColumnRole::Day, day),
        RawCell::new(ColumnRole::Time, time),
        RawCell::new(ColumnRole::Rate, rate),
        RawCell::new(ColumnRole::Duration, "30"),
        RawCell::new(ColumnRole::Program, program),
    ];
    for s in spots {
        cells.push(RawCell::new(ColumnRole::Spots, *s));
    }
    RawRow::new(index, cells)
}

fn order(rows: Vec<RawRow>) -> ExtractedOrder {
    ExtractedOrder {
        order_code: "EST 9710".to_string(),
        market: "SEA".to_string(),
        flight_start: date(2026, 1, 5),
        flight_end: date(2026, 2, 8),
        week_starts: None,
        rows,
        south_asian_choice: None,
    }
}

fn generic_processor() -> OrderProcessor {
    OrderProcessor::new(SourceProfile::default())
}

// ============================================================================
// Consolidation shape
// ============================================================================

#[test]
fn same_rate_series_splits_only_on_count_change() {
    // [3,3,3,4,4] → two lines: weeks 1-3 at 3/wk, weeks 4-5 at 4/wk
    let out = generic_processor()
        .process(&order(vec![row(
            1,
            "M-F",
            "6:00a-8:00a",
            "25.00",
            "Mandarin News",
            &["3", "3", "3", "4", "4"],
        )]))
        .unwrap();

    assert_eq!(out.lines.len(), 2);
    assert_eq!(out.lines[0].weekly_spots, 3);
    assert_eq!(out.lines[0].total_spots, 9);
    assert_eq!(out.lines[0].start_date, date(2026, 1, 5));
    assert_eq!(out.lines[0].end_date, date(2026, 1, 25));
    assert_eq!(out.lines[1].weekly_spots, 4);
    assert_eq!(out.lines[1].total_spots, 8);
    assert_eq!(out.lines[1].end_date, date(2026, 2, 8));
}

#[test]
fn spot_totals_are_conserved_across_the_whole_order() {
    let out = generic_processor()
        .process(&order(vec![
            row(1, "M-F", "6:00a-8:00a", "25.00", "Mandarin News", &["14", "0", "14", "14"]),
            row(2, "Sa-Su", "8:00p-10:00p", "40.00", "Korean Drama", &["7", "7", "3", "0"]),
        ]))
        .unwrap();

    let input_total = 14 + 14 + 14 + 7 + 7 + 3;
    let output_total: u32 = out.lines.iter().map(|l| l.total_spots).sum();
    assert_eq!(output_total, input_total);
}

#[test]
fn bonus_week_after_gap_becomes_its_own_bonus_line() {
    // [72,72,0,20] where the 20-spot tail is unrated: paid line + bonus
    // line, and the zero week produces no record at all.
    let out = generic_processor()
        .process(&order(vec![
            row(1, "M-Su", "8:00a-10:00a", "25.00", "Vietnamese Variety", &["72", "72", "0", "0"]),
            row(2, "M-Su", "8:00a-10:00a", "0.00", "Vietnamese Variety", &["0", "0", "0", "20"]),
        ]))
        .unwrap();

    assert_eq!(out.lines.len(), 2);

    let paid = &out.lines[0];
    assert!(!paid.is_bonus);
    assert_eq!(paid.weekly_spots, 72);
    assert_eq!(paid.weeks, 2);
    assert_eq!(paid.total_spots, 144);

    let bonus = &out.lines[1];
    assert!(bonus.is_bonus);
    assert_eq!(bonus.rate, 0.0);
    assert_eq!(bonus.weekly_spots, 20);
    assert_eq!(bonus.weeks, 1);
    assert_eq!(bonus.start_date, date(2026, 1, 26));
}

#[test]
fn no_end_date_exceeds_the_flight_cap() {
    let mut ord = order(vec![row(
        1,
        "M-F",
        "6:00a-8:00a",
        "25.00",
        "Mandarin News",
        &["2", "2", "2", "2", "2", "2"],
    )]);
    // Flight ends mid-week of the last column
    ord.flight_end = date(2026, 2, 10);

    let out = OrderProcessor::new(SourceProfile::default())
        .process(&ord)
        .unwrap();
    for line in &out.lines {
        assert!(line.end_date <= ord.flight_end);
    }
}

#[test]
fn explicit_week_columns_split_on_date_discontinuity() {
    // Two separate flight windows with matching counts stay two lines
    let mut ord = order(vec![row(
        1,
        "M-F",
        "6:00a-8:00a",
        "25.00",
        "Cantonese News",
        &["5", "5", "5", "5"],
    )]);
    ord.week_starts = Some(vec![
        date(2026, 5, 4),
        date(2026, 5, 11),
        date(2026, 8, 3),
        date(2026, 8, 10),
    ]);
    ord.flight_start = date(2026, 5, 4);
    ord.flight_end = date(2026, 8, 16);

    let out = generic_processor().process(&ord).unwrap();
    assert_eq!(out.lines.len(), 2);
    assert_eq!(out.lines[0].start_date, date(2026, 5, 4));
    assert_eq!(out.lines[1].start_date, date(2026, 8, 3));
}

// ============================================================================
// Schedule rules
// ============================================================================

#[test]
fn sunday_six_to_seven_window_drops_sunday() {
    let out = generic_processor()
        .process(&order(vec![row(
            1,
            "M-Su",
            "6:00a-7:00a",
            "25.00",
            "Mandarin News",
            &["12", "12"],
        )]))
        .unwrap();

    let line = &out.lines[0];
    assert_eq!(line.days.label(), "M-Sa");
    // 12 spots over 6 active days
    assert_eq!(line.max_daily_run, 2);
}

#[test]
fn other_windows_keep_sunday() {
    let out = generic_processor()
        .process(&order(vec![row(
            1,
            "M-Su",
            "6:00a-7:30a",
            "25.00",
            "Mandarin News",
            &["14", "14"],
        )]))
        .unwrap();

    assert_eq!(out.lines[0].days.label(), "M-Su");
    assert_eq!(out.lines[0].max_daily_run, 2);
}

#[test]
fn midnight_end_normalizes_to_2359() {
    let out = generic_processor()
        .process(&order(vec![row(
            1,
            "M-Su",
            "7:00p-12:00a",
            "25.00",
            "Korean Drama",
            &["7"],
        )]))
        .unwrap();

    assert_eq!(out.lines[0].time.end_hhmm(), "23:59");
}

#[test]
fn semicolon_ranges_stay_one_line() {
    let out = generic_processor()
        .process(&order(vec![row(
            1,
            "M-F",
            "4p-5p; 6p-7p",
            "25.00",
            "Filipino Talk",
            &["5"],
        )]))
        .unwrap();

    assert_eq!(out.lines.len(), 1);
    assert_eq!(out.lines[0].time.start_hhmm(), "16:00");
    assert_eq!(out.lines[0].time.end_hhmm(), "19:00");
}

// ============================================================================
// Rates & classification
// ============================================================================

#[test]
fn net_rate_profile_grosses_up() {
    let manager = ProfileManager::new();
    let processor = OrderProcessor::new(manager.get(&SourceKind::NetRateAgency).clone());

    let out = processor
        .process(&order(vec![row(
            1,
            "M-F",
            "6:00a-8:00a",
            "21.25",
            "Mandarin News",
            &["10"],
        )]))
        .unwrap();

    assert_eq!(out.lines[0].rate, 25.00);
    assert!(!out.lines[0].is_bonus);
}

#[test]
fn bonus_lines_keep_rate_zero_under_gross_up() {
    let manager = ProfileManager::new();
    let processor = OrderProcessor::new(manager.get(&SourceKind::NetRateAgency).clone());

    let out = processor
        .process(&order(vec![row(
            1,
            "M-Su",
            "6a-11:59p",
            "0.00",
            "Korean Rotation",
            &["8"],
        )]))
        .unwrap();

    assert_eq!(out.lines[0].rate, 0.0);
    assert!(out.lines[0].is_bonus);
}

// ============================================================================
// Artifact repair & skip accounting
// ============================================================================

#[test]
fn catalogued_artifacts_are_repaired_in_place() {
    let out = generic_processor()
        .process(&order(vec![
            // Stray space after the dash, doubled weekday letter
            row(1, "MTuWTHhF", "6:00a- 8:00p", "25.00", "Mandarin News", &["3", "3"]),
            // Extra digit in the minute component
            row(2, "Sa-Su", "8:00p-10:300p", "40.00", "Korean Drama", &["2", "2"]),
        ]))
        .unwrap();

    assert_eq!(out.diagnostics.rows_skipped, 0);
    assert_eq!(out.lines[0].days.label(), "M-F");
    assert_eq!(out.lines[1].time.end_hhmm(), "22:30");
}

#[test]
fn uncorrectable_rows_are_skipped_and_counted() {
    let out = generic_processor()
        .process(&order(vec![
            row(1, "M-F", "6:00a-8:00a", "25.00", "Mandarin News", &["3", "3"]),
            // Day pattern no catalogued repair covers
            row(2, "XQZ", "6:00a-8:00a", "25.00", "Korean News", &["5"]),
            // Inverted time range
            row(3, "M-F", "9:00p-7:00p", "25.00", "Filipino Talk", &["5"]),
        ]))
        .unwrap();

    assert_eq!(out.diagnostics.rows_seen, 3);
    assert_eq!(out.diagnostics.rows_parsed, 1);
    assert_eq!(out.diagnostics.rows_skipped, 2);
    assert_eq!(out.diagnostics.reasons.len(), 2);
    assert_eq!(out.diagnostics.reasons[0].row_index, 2);
    assert_eq!(out.diagnostics.reasons[1].row_index, 3);
    // Only the clean row made it through
    let total: u32 = out.lines.iter().map(|l| l.total_spots).sum();
    assert_eq!(total, 6);
}

#[test]
fn spot_count_week_column_mismatch_is_skipped_not_truncated() {
    // Five spot cells against four printed week columns: the surplus week
    // must never be dropped behind a success result.
    let mut ord = order(vec![
        row(1, "M-F", "6:00a-8:00a", "25.00", "Mandarin News", &["3", "3", "3", "3"]),
        row(2, "Sa-Su", "8:00p-10:00p", "40.00", "Korean Drama", &["3", "3", "3", "3", "9"]),
    ]);
    ord.week_starts = Some(vec![
        date(2026, 1, 5),
        date(2026, 1, 12),
        date(2026, 1, 19),
        date(2026, 1, 26),
    ]);

    let out = generic_processor().process(&ord).unwrap();

    assert_eq!(out.diagnostics.rows_skipped, 1);
    assert_eq!(out.diagnostics.reasons[0].row_index, 2);
    assert!(out.diagnostics.reasons[0].reason.contains("week columns"));
    // Only the well-formed row contributes spots
    let total: u32 = out.lines.iter().map(|l| l.total_spots).sum();
    assert_eq!(total, 12);
}

#[test]
fn day_error_wins_when_both_day_and_time_are_bad() {
    let out = generic_processor()
        .process(&order(vec![
            row(1, "M-F", "6:00a-8:00a", "25.00", "Mandarin News", &["3"]),
            row(2, "XQZ", "garbage", "25.00", "Korean News", &["5"]),
        ]))
        .unwrap();

    assert!(out.diagnostics.reasons[0].reason.contains("day pattern"));
}

// ============================================================================
// Order-level outcomes
// ============================================================================

#[test]
fn south_asian_without_choice_halts_the_order() {
    let err = generic_processor()
        .process(&order(vec![row(
            1,
            "M-F",
            "6:00a-8:00a",
            "25.00",
            "HINDI NEWS/TALK",
            &["3"],
        )]))
        .unwrap_err();

    assert!(matches!(err, OrderError::PendingDisambiguation { .. }));
}

#[test]
fn south_asian_with_choice_resolves_prefixes() {
    let mut ord = order(vec![row(
        1,
        "M-F",
        "6:00a-8:00a",
        "25.00",
        "HINDI NEWS/TALK",
        &["3"],
    )]);
    ord.south_asian_choice = Some(SouthAsianChoice::Hindi);

    let out = generic_processor().process(&ord).unwrap();
    assert_eq!(out.lines[0].block_prefixes, vec!["SA".to_string()]);

    ord.south_asian_choice = Some(SouthAsianChoice::Both);
    let out = generic_processor().process(&ord).unwrap();
    assert_eq!(
        out.lines[0].block_prefixes,
        vec!["SA".to_string(), "P".to_string()]
    );
}

#[test]
fn empty_order_is_a_structure_failure() {
    let err = generic_processor().process(&order(vec![])).unwrap_err();
    assert!(matches!(err, OrderError::OrderStructureFailure(_)));
}

#[test]
fn all_rows_unparseable_is_a_structure_failure() {
    let err = generic_processor()
        .process(&order(vec![
            row(1, "XQZ", "nope", "25.00", "Mandarin News", &["3"]),
            row(2, "???", "nope", "25.00", "Korean News", &["5"]),
        ]))
        .unwrap_err();

    assert!(matches!(err, OrderError::OrderStructureFailure(_)));
}

#[test]
fn missing_schedule_falls_back_to_ros_window() {
    // Bonus rotation line with no printed day/time columns
    let cells = vec![
        RawCell::new(ColumnRole::Rate, "0.00"),
        RawCell::new(ColumnRole::Duration, "30"),
        RawCell::new(ColumnRole::Program, "Korean Rotation"),
        RawCell::new(ColumnRole::Spots, "10"),
    ];
    let out = generic_processor()
        .process(&order(vec![RawRow::new(1, cells)]))
        .unwrap();

    let line = &out.lines[0];
    assert_eq!(line.days.label(), "M-Su");
    assert_eq!(line.time.start_hhmm(), "06:00");
    assert_eq!(line.time.end_hhmm(), "23:59");
    assert!(line.is_bonus);
}

#[test]
fn output_carries_schema_version_and_separation() {
    let out = generic_processor()
        .process(&order(vec![row(
            1,
            "M-F",
            "6:00a-8:00a",
            "25.00",
            "Mandarin News",
            &["3"],
        )]))
        .unwrap();

    assert_eq!(out.schema_version, SCHEMA_VERSION);
    assert_eq!(out.lines[0].separation_minutes, 15);
    assert_eq!(out.lines[0].block_prefixes, vec!["M".to_string()]);
    assert_eq!(out.lines[0].description, "Mandarin M-F 6-8a");
}
