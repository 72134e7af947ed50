//! Rate, classification, and max-daily-run rules.
//!
//! Some agencies print net rates and bill gross; the gross-up factor is a
//! fixed per-source configuration value, never a decision made at parse
//! time. Bonus lines are value-added inventory: zero rate, nonzero spots.

/// Round to cents, half away from zero. Matches how the source systems
/// quantize grossed-up rates.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Effective rate for a line: the net rate, grossed up (`net / factor`)
/// when the source profile carries a factor. Gross-up applies iff the net
/// is positive — a zero rate stays zero so bonus classification holds.
pub fn effective_rate(net_rate: Option<f64>, gross_up_factor: Option<f64>) -> f64 {
    let net = net_rate.unwrap_or(0.0);
    if net <= 0.0 {
        return 0.0;
    }
    match gross_up_factor {
        Some(factor) if factor > 0.0 => round_to_cents(net / factor),
        _ => round_to_cents(net),
    }
}

/// A line is bonus iff it costs nothing and still airs.
pub fn is_bonus(effective_rate: f64, total_spots: u32) -> bool {
    effective_rate == 0.0 && total_spots > 0
}

/// Per-day spot cap: `ceil(weekly_spots / active_day_count)`. The day count
/// is the Sunday-adjusted one. Ceiling is the only rounding mode.
pub fn max_daily_run(weekly_spots: u32, active_day_count: usize) -> u32 {
    let days = active_day_count.max(1) as u32;
    weekly_spots.div_ceil(days)
}
