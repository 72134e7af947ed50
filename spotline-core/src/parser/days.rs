//! Day-pattern parsing.
//!
//! Source formats write schedules three ways: range tokens ("M-F", "Sa-Su",
//! "M-Su"), comma lists ("M,W,F"), and compact runs ("MTuWThF",
//! "MTuWThFSaSu"). All expand to an explicit [`DaySet`]. Unrecognized
//! tokens are an error, never a silent full-week default.

use crate::error::RowError;
use crate::types::{DaySet, Weekday};

/// Parse any supported day-pattern token into an explicit weekday set.
pub fn parse_day_pattern(token: &str) -> Result<DaySet, RowError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(RowError::InvalidDayPattern(token.to_string()));
    }

    // Range notation: exactly two day tokens joined by a hyphen.
    if let Some((start, end)) = token.split_once('-') {
        if !start.is_empty() && !end.is_empty() && !end.contains('-') {
            return expand_range(start.trim(), end.trim())
                .ok_or_else(|| RowError::InvalidDayPattern(token.to_string()));
        }
        return Err(RowError::InvalidDayPattern(token.to_string()));
    }

    // Comma list: each part is a single day token.
    if token.contains(',') {
        let mut set = DaySet::new();
        for part in token.split(',') {
            let day = parse_day_token(part.trim())
                .ok_or_else(|| RowError::InvalidDayPattern(token.to_string()))?;
            set.insert(day);
        }
        return Ok(set);
    }

    // Single day token ("M", "Sa", "Sun").
    if let Some(day) = parse_day_token(token) {
        return Ok(DaySet::from_days([day]));
    }

    // Compact run ("MTuWThF", "SaSu").
    parse_compact_run(token).ok_or_else(|| RowError::InvalidDayPattern(token.to_string()))
}

/// Single day token. Covers parser codes (M T W R F S U), two-letter
/// display codes (Tu Th Sa Su) and common aliases.
fn parse_day_token(token: &str) -> Option<Weekday> {
    match token {
        "M" | "Mo" | "Mon" => Some(Weekday::Monday),
        "T" | "Tu" | "Tue" => Some(Weekday::Tuesday),
        "W" | "We" | "Wed" => Some(Weekday::Wednesday),
        "R" | "Th" | "Thu" => Some(Weekday::Thursday),
        "F" | "Fr" | "Fri" => Some(Weekday::Friday),
        "S" | "Sa" | "SAT" | "Sat" => Some(Weekday::Saturday),
        "U" | "Su" | "SU" | "SUN" | "Sun" => Some(Weekday::Sunday),
        _ => None,
    }
}

fn expand_range(start: &str, end: &str) -> Option<DaySet> {
    let start = parse_day_token(start)?;
    let end = parse_day_token(end)?;
    let (si, ei) = (start.index(), end.index());
    if si > ei {
        return None;
    }
    Some(DaySet::from_days(Weekday::ALL[si..=ei].iter().copied()))
}

/// Scan a compact run left to right, preferring two-letter codes (Tu, Th,
/// Sa, Su) over single letters so "Th" never reads as Tuesday + something.
fn parse_compact_run(token: &str) -> Option<DaySet> {
    let chars: Vec<char> = token.chars().collect();
    let mut set = DaySet::new();
    let mut i = 0;
    while i < chars.len() {
        let two: String = chars[i..chars.len().min(i + 2)].iter().collect();
        if let Some(day) = parse_two_letter(&two) {
            set.insert(day);
            i += 2;
            continue;
        }
        let day = match chars[i] {
            'M' => Weekday::Monday,
            'T' => Weekday::Tuesday,
            'W' => Weekday::Wednesday,
            'R' => Weekday::Thursday,
            'F' => Weekday::Friday,
            'S' => Weekday::Saturday,
            'U' => Weekday::Sunday,
            _ => return None,
        };
        set.insert(day);
        i += 1;
    }
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

fn parse_two_letter(token: &str) -> Option<Weekday> {
    match token {
        "Tu" => Some(Weekday::Tuesday),
        "Th" => Some(Weekday::Thursday),
        "Sa" => Some(Weekday::Saturday),
        "Su" => Some(Weekday::Sunday),
        _ => None,
    }
}
