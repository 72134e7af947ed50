use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// The schema version stamped on every order output.
/// Bump this when the output shape changes.
pub const SCHEMA_VERSION: &str = "0.1.0";

// ===== SCHEDULE PRIMITIVES =====

/// Days of the broadcast week, Monday-first. Single-letter parser codes
/// follow the traffic-system convention: M T W R F S U.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Two-letter display code used in compact day labels.
    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Monday => "M",
            Weekday::Tuesday => "Tu",
            Weekday::Wednesday => "W",
            Weekday::Thursday => "Th",
            Weekday::Friday => "F",
            Weekday::Saturday => "Sa",
            Weekday::Sunday => "Su",
        }
    }

    /// Position in the Monday-first week, 0..=6.
    pub fn index(&self) -> usize {
        Weekday::ALL.iter().position(|d| d == self).unwrap_or(0)
    }
}

/// An ordered set of weekdays. Construction goes through the day-pattern
/// parser; the set is never mutated after a row is parsed except by the
/// Sunday paid-programming adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySet {
    days: BTreeSet<Weekday>,
}

impl DaySet {
    pub fn new() -> Self {
        Self {
            days: BTreeSet::new(),
        }
    }

    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    pub fn full_week() -> Self {
        Self::from_days(Weekday::ALL)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.days.insert(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.days.iter().copied()
    }

    /// Copy of this set with one day removed.
    pub fn without(&self, day: Weekday) -> Self {
        let mut days = self.days.clone();
        days.remove(&day);
        Self { days }
    }

    /// Compact label for descriptions and submissions: a contiguous run
    /// renders as a range ("M-F", "Sa-Su", "M-Su"), anything else as a
    /// comma list ("M,W,F").
    pub fn label(&self) -> String {
        if self.days.is_empty() {
            return String::new();
        }
        let indices: Vec<usize> = self.days.iter().map(|d| d.index()).collect();
        let contiguous = indices.windows(2).all(|w| w[1] == w[0] + 1);
        let first = Weekday::ALL[indices[0]];
        let last = Weekday::ALL[*indices.last().unwrap_or(&0)];
        if self.days.len() == 1 {
            first.code().to_string()
        } else if contiguous {
            format!("{}-{}", first.code(), last.code())
        } else {
            self.days
                .iter()
                .map(|d| d.code())
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

impl Default for DaySet {
    fn default() -> Self {
        Self::new()
    }
}

/// A daily time window in minutes from midnight. Invariant: start < end,
/// enforced by the time parser (midnight ends are normalized to 23:59
/// before the check, so a zero-length window can't slip through).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u16,
    pub end: u16,
}

impl TimeRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    pub fn start_hhmm(&self) -> String {
        format!("{:02}:{:02}", self.start / 60, self.start % 60)
    }

    pub fn end_hhmm(&self) -> String {
        format!("{:02}:{:02}", self.end / 60, self.end % 60)
    }

    /// Compact label for line descriptions: "6-7a", "7p-12a", "6a-11:59p".
    pub fn label(&self) -> String {
        let (sh, sp) = Self::hour_12(self.start);
        // 23:59 reads as midnight in descriptions
        let (eh, ep) = if self.end == 23 * 60 + 59 {
            (12, 'a')
        } else {
            Self::hour_12(self.end)
        };
        let s_min = self.start % 60;
        let e_min = if self.end == 23 * 60 + 59 { 0 } else { self.end % 60 };

        let fmt = |h: u16, m: u16, p: char, with_period: bool| {
            let mut out = if m == 0 {
                format!("{}", h)
            } else {
                format!("{}:{:02}", h, m)
            };
            if with_period {
                out.push(p);
            }
            out
        };

        if sp == ep {
            format!("{}-{}", fmt(sh, s_min, sp, false), fmt(eh, e_min, ep, true))
        } else {
            format!("{}-{}", fmt(sh, s_min, sp, true), fmt(eh, e_min, ep, true))
        }
    }

    fn hour_12(minutes: u16) -> (u16, char) {
        let h = minutes / 60;
        match h {
            0 => (12, 'a'),
            1..=11 => (h, 'a'),
            12 => (12, 'p'),
            _ => (h - 12, 'p'),
        }
    }
}

// ===== RAW INPUT TYPES =====

/// Which table column a cell came from. Drives the repair catalog: a rule
/// only fires on cells from its own column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    Day,
    Time,
    Rate,
    Duration,
    Spots,
    Program,
}

/// One text cell as extracted from the source table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCell {
    pub role: ColumnRole,
    pub text: String,
}

impl RawCell {
    pub fn new(role: ColumnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// One extracted table row. Mutable only during normalization; discarded
/// after parsing. Cells with role `Spots` appear once per week column,
/// in week order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    /// Row position in the source table, for skip diagnostics.
    pub index: usize,
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(index: usize, cells: Vec<RawCell>) -> Self {
        Self { index, cells }
    }

    /// First cell with the given role, if any.
    pub fn cell(&self, role: ColumnRole) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.role == role)
            .map(|c| c.text.as_str())
    }

    /// All cells with the given role, in order.
    pub fn cells_with_role(&self, role: ColumnRole) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .filter(move |c| c.role == role)
            .map(|c| c.text.as_str())
    }
}

// ===== PARSED & CONSOLIDATED TYPES =====

/// Spot count for one week of a line's flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCount {
    pub week_start: NaiveDate,
    pub count: u32,
}

impl WeekCount {
    pub fn new(week_start: NaiveDate, count: u32) -> Self {
        Self { week_start, count }
    }
}

/// One source table row after normalization and parsing. Immutable once
/// produced; consumed exactly once by the consolidation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedLineSpec {
    pub days: DaySet,
    /// Day count after the Sunday 6-7a adjustment; this is the divisor for
    /// the max-daily-run calculation, not `days.len()` pre-adjustment.
    pub active_day_count: usize,
    pub time: TimeRange,
    pub language: String,
    /// Net rate as printed on the order. None when the column was absent.
    pub net_rate: Option<f64>,
    pub spot_length_seconds: u32,
    pub weekly: Vec<WeekCount>,
    pub market: String,
    pub program: String,
}

/// The engine's sole externally-visible output unit: one schedule line
/// ready for traffic-system submission. Produced only by the consolidation
/// stage; immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedLine {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: DaySet,
    pub time: TimeRange,
    /// Constant across this line's whole date span.
    pub weekly_spots: u32,
    pub weeks: u32,
    pub total_spots: u32,
    /// Effective rate: net, or grossed-up net when the source profile
    /// carries a gross-up factor. Always 0.0 on bonus lines.
    pub rate: f64,
    pub is_bonus: bool,
    pub max_daily_run: u32,
    pub block_prefixes: Vec<String>,
    pub description: String,
    /// Minimum spacing between airings, from the source profile.
    pub separation_minutes: u32,
}

// ===== DIAGNOSTICS =====

/// Why a row was skipped. Carried in diagnostics so silent spot/revenue
/// loss is always observable downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipReason {
    pub row_index: usize,
    pub reason: String,
}

/// Per-order processing accounting. The caller always receives this next
/// to the line output, even when every row parsed cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDiagnostics {
    pub run_id: Uuid,
    pub rows_seen: usize,
    pub rows_parsed: usize,
    pub rows_skipped: usize,
    pub reasons: Vec<SkipReason>,
}

impl OrderDiagnostics {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            rows_seen: 0,
            rows_parsed: 0,
            rows_skipped: 0,
            reasons: Vec::new(),
        }
    }

    pub fn record_skip(&mut self, row_index: usize, reason: String) {
        self.rows_skipped += 1;
        self.reasons.push(SkipReason { row_index, reason });
    }
}

impl Default for OrderDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete engine output for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderOutput {
    pub schema_version: String,
    pub lines: Vec<ConsolidatedLine>,
    pub diagnostics: OrderDiagnostics,
}
