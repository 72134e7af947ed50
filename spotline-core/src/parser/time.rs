//! Time-range parsing.
//!
//! Source formats write windows as 12-hour tokens with `a`/`p` suffixes and
//! optional minutes, in several shapes: "6:00a-7:00a", "6a-11:59p",
//! "7:00-7:30p" (meridiem only on the end), "730p-800p" (compressed),
//! "4p-5p; 6p-7p" (manually edited multi-range).
//!
//! Normalization rules, in precedence order:
//! 1. An end of exactly midnight ("12:00a"/"12a"), or in the 1a-5a
//!    overnight band, becomes 23:59 — never 00:00, so a window can't
//!    collapse to zero length at day rollover.
//! 2. Sunday + exactly 06:00-07:00 drops Sunday from the day set (paid
//!    programming occupies that slot); see [`apply_sunday_rule`].
//! 3. A semicolon multi-range collapses to one window from the earliest
//!    start to the latest end. The gap is never expanded into extra lines;
//!    downstream exclusion handles it.
//!
//! The broadcast day runs 06:00-23:59: starts are floored and ends are
//! capped to that window.

use crate::error::RowError;
use crate::types::{DaySet, TimeRange, Weekday};
use regex::Regex;

/// Earliest schedulable start, minutes from midnight.
const DAY_FLOOR: u16 = 6 * 60;
/// Latest schedulable end.
const DAY_CEILING: u16 = 23 * 60 + 59;

/// Parses time-range tokens into explicit 24-hour windows. Pure; holds
/// only its compiled token patterns.
pub struct TimeRangeParser {
    clock_token: Regex,
    compressed_token: Regex,
}

impl TimeRangeParser {
    pub fn new() -> Self {
        Self {
            // "6", "6:00", "6:00a", "1159p"
            clock_token: Regex::new(r"^(\d{1,2}):?(\d{2})?([ap])?$").expect("valid time pattern"),
            // "730p" / "1130" — 3-4 digits where the tail is minutes. Kept
            // separate so the greedy two-digit hour match can't read "130p"
            // as hour 13.
            compressed_token: Regex::new(r"^(\d{3,4})([ap])?$").expect("valid time pattern"),
        }
    }

    /// Parse a full range token. Returns minutes-from-midnight with
    /// `start < end` guaranteed.
    pub fn parse(&self, token: &str) -> Result<TimeRange, RowError> {
        let raw = token;

        // Semicolon multi-range: earliest start to latest end.
        if token.contains(';') {
            let mut windows = Vec::new();
            for part in token.split(';') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                windows.push(self.parse(part)?);
            }
            return match (
                windows.iter().map(|w| w.start).min(),
                windows.iter().map(|w| w.end).max(),
            ) {
                (Some(start), Some(end)) if start < end => Ok(TimeRange::new(start, end)),
                _ => Err(RowError::InvalidTimeRange(raw.to_string())),
            };
        }

        let cleaned = token
            .replace(' ', "")
            .to_lowercase()
            .replace("am", "a")
            .replace("pm", "p")
            .replace("12m", "12a") // midnight
            .replace("12n", "12p"); // noon

        let (start_str, end_str) = cleaned
            .split_once('-')
            .ok_or_else(|| RowError::InvalidTimeRange(raw.to_string()))?;
        if start_str.is_empty() || end_str.is_empty() {
            return Err(RowError::InvalidTimeRange(raw.to_string()));
        }

        let (end_hour, end_minute, end_period) = self
            .parse_clock(end_str)
            .ok_or_else(|| RowError::InvalidTimeRange(raw.to_string()))?;
        let (start_hour, start_minute, start_period) = self
            .parse_clock(start_str)
            .ok_or_else(|| RowError::InvalidTimeRange(raw.to_string()))?;

        let start_period = start_period
            .or_else(|| infer_start_period(start_hour, end_hour, end_period))
            .ok_or_else(|| RowError::InvalidTimeRange(raw.to_string()))?;
        let end_period =
            end_period.ok_or_else(|| RowError::InvalidTimeRange(raw.to_string()))?;

        let start = to_minutes(start_hour, start_minute, start_period)
            .ok_or_else(|| RowError::InvalidTimeRange(raw.to_string()))?
            .max(DAY_FLOOR);

        // End-of-day handling: 12a is midnight, and 1a-5a ends are
        // overnight spillover. Both mean "end of the broadcast day".
        let end = if end_period == 'a' && (end_hour == 12 || end_hour < 6) {
            DAY_CEILING
        } else {
            to_minutes(end_hour, end_minute, end_period)
                .ok_or_else(|| RowError::InvalidTimeRange(raw.to_string()))?
                .min(DAY_CEILING)
        };

        if start >= end {
            return Err(RowError::InvalidTimeRange(raw.to_string()));
        }
        Ok(TimeRange::new(start, end))
    }

    /// Single clock token → (hour-12, minute, optional meridiem).
    fn parse_clock(&self, token: &str) -> Option<(u16, u16, Option<char>)> {
        if let Some(caps) = self.compressed_token.captures(token) {
            let digits = caps.get(1)?.as_str();
            let period = caps.get(2).and_then(|m| m.as_str().chars().next());
            let (hour, minute) = if digits.len() == 3 {
                (digits[..1].parse().ok()?, digits[1..].parse().ok()?)
            } else {
                (digits[..2].parse().ok()?, digits[2..].parse().ok()?)
            };
            return Some((hour, minute, period)).filter(|(h, m, _)| *h <= 12 && *m < 60);
        }
        let caps = self.clock_token.captures(token)?;
        let hour: u16 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u16 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        let period = caps.get(3).and_then(|m| m.as_str().chars().next());
        Some((hour, minute, period)).filter(|(h, m, _)| *h <= 12 && *m < 60)
    }
}

impl Default for TimeRangeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer a missing start meridiem from the end token. "11-130p" is
/// 11:00a-1:30p: when the end is PM and the start hour is numerically
/// above the end hour (or the end is noon), the start must be AM.
fn infer_start_period(start_hour: u16, end_hour: u16, end_period: Option<char>) -> Option<char> {
    let end_period = end_period?;
    if end_period == 'p' && start_hour != 12 && (end_hour == 12 || start_hour > end_hour) {
        Some('a')
    } else {
        Some(end_period)
    }
}

fn to_minutes(hour: u16, minute: u16, period: char) -> Option<u16> {
    let hour24 = match (period, hour) {
        ('a', 12) => 0,
        ('a', h) => h,
        ('p', 12) => 12,
        ('p', h) => h + 12,
        _ => return None,
    };
    if hour24 > 23 || minute > 59 {
        return None;
    }
    Some(hour24 * 60 + minute)
}

/// Sunday 6-7a paid-programming rule. Fires iff the day set includes
/// Sunday AND the window is exactly 06:00-07:00; any other window leaves
/// the pattern untouched. Returns the (possibly adjusted) day set and the
/// resulting active-day count, which feeds the max-daily-run divisor.
pub fn apply_sunday_rule(days: &DaySet, time: &TimeRange) -> (DaySet, usize) {
    let is_6_to_7a = time.start == 6 * 60 && time.end == 7 * 60;
    if is_6_to_7a && days.contains(Weekday::Sunday) {
        let adjusted = days.without(Weekday::Sunday);
        let count = adjusted.len();
        (adjusted, count)
    } else {
        (days.clone(), days.len())
    }
}
