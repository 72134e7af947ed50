//! Weekly consolidation.
//!
//! Turns a per-week spot-count series into the minimal set of contiguous
//! runs. This single rule governs how many schedule lines an order
//! produces: over-splitting wastes downstream submissions, under-splitting
//! loses the weekly-count distinction the source document encodes, and
//! either direction breaks the exact-totals audit.

use crate::types::WeekCount;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One maximal run of weeks sharing an identical nonzero spot count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRun {
    pub start_date: NaiveDate,
    /// Last day of the run's final week, capped at the flight end.
    pub end_date: NaiveDate,
    pub weekly_spots: u32,
    pub weeks: u32,
}

impl WeekRun {
    pub fn total_spots(&self) -> u32 {
        self.weekly_spots * self.weeks
    }
}

/// Group an ordered-by-date weekly series into maximal runs.
///
/// A new run starts whenever:
/// (a) the spot count changes from the previous week,
/// (b) the previous week had zero spots (a gap), or
/// (c) adjacent weeks are not exactly 7 days apart (separate flight
///     windows, e.g. a May block and an August block with matching counts).
///
/// Zero-count weeks produce no run at all, so the sum of run totals equals
/// the sum of the nonzero input counts exactly.
pub fn consolidate(weeks: &[WeekCount], flight_end: NaiveDate) -> Vec<WeekRun> {
    let mut runs = Vec::new();
    let n = weeks.len();
    let mut i = 0;

    while i < n {
        if weeks[i].count == 0 {
            i += 1;
            continue;
        }

        let run_spots = weeks[i].count;
        let run_start = weeks[i].week_start;

        // Extend while the count holds and the weeks stay contiguous.
        let mut j = i + 1;
        while j < n && weeks[j].count == run_spots {
            let gap = weeks[j]
                .week_start
                .signed_duration_since(weeks[j - 1].week_start)
                .num_days();
            if gap != 7 {
                break;
            }
            j += 1;
        }

        let last_week_start = weeks[j - 1].week_start;
        let natural_end = last_week_start + Days::new(6);
        let end_date = natural_end.min(flight_end);

        runs.push(WeekRun {
            start_date: run_start,
            end_date,
            weekly_spots: run_spots,
            weeks: (j - i) as u32,
        });
        i = j;
    }

    runs
}

/// Generate the week-start series for sources that print weekly counts
/// without explicit week columns: weeks begin at the flight start and
/// advance in 7-day steps.
pub fn weeks_from_flight(flight_start: NaiveDate, counts: &[u32]) -> Vec<WeekCount> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| WeekCount::new(flight_start + Days::new(7 * i as u64), count))
        .collect()
}
