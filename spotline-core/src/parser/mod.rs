// Pattern parsing — day-range and time-range tokens to typed values.
//
// Both branches are pure functions with no I/O. When a row carries both a
// bad day pattern and a bad time range, the day pattern is checked first;
// the row's skip reason reports that error.

pub mod days;
pub mod time;

pub use days::parse_day_pattern;
pub use time::{apply_sunday_rule, TimeRangeParser};
