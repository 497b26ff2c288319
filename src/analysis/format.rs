//! Display formatting for impact values expressed in fractional years.

pub const MINUTES_PER_YEAR: f64 = 525_600.0;
pub const SECONDS_PER_YEAR: f64 = MINUTES_PER_YEAR * 60.0;

/// A daily habit repeated every day for 30 years.
const LONG_TERM_MULTIPLIER: f64 = 365.0 * 30.0;

/// Cap for `format_direct_impact`; larger values still read as "60 min".
const DIRECT_MINUTES_CAP: f64 = 60.0;

/// Rendered for NaN and infinite inputs.
pub const NOT_AVAILABLE: &str = "n/a";

fn sign(value: f64) -> char {
    if value >= 0.0 {
        '+'
    } else {
        '-'
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Years plus remaining months for `|value| >= 1`, otherwise months only.
/// Unsigned. `1.5` renders as "1 year 6 months".
pub fn format_lifespan(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let abs = value.abs();
    if abs >= 1.0 {
        let mut years = abs.floor() as u64;
        let mut months = ((abs - abs.floor()) * 12.0).round() as u64;
        if months == 12 {
            years += 1;
            months = 0;
        }

        if months == 0 {
            plural(years, "year")
        } else {
            format!("{} {}", plural(years, "year"), plural(months, "month"))
        }
    } else {
        plural((abs * 12.0).round() as u64, "month")
    }
}

/// Signed minutes, capped at 60, or seconds when under one minute.
pub fn format_direct_impact(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let minutes = (value * MINUTES_PER_YEAR).abs();
    if minutes >= 1.0 {
        format!(
            "{}{} min",
            sign(value),
            minutes.round().min(DIRECT_MINUTES_CAP) as u64
        )
    } else {
        format!("{}{} sec", sign(value), (minutes * 60.0).round() as u64)
    }
}

fn format_short_horizon(abs_years: f64) -> String {
    let seconds = abs_years * SECONDS_PER_YEAR;
    if seconds.round() < 120.0 {
        return format!("{} sec", seconds.round() as u64);
    }

    let minutes = seconds / 60.0;
    if minutes.round() < 60.0 {
        return format!("{} min", minutes.round() as u64);
    }

    let hours = minutes / 60.0;
    if hours.round() < 24.0 {
        return plural(hours.round() as u64, "hour");
    }

    plural((hours / 24.0).round() as u64, "day")
}

/// Unsigned rendering that picks the largest readable unit.
///
/// From one month up this is `format_lifespan`; below it the value is shown
/// in seconds (under two minutes), minutes, hours or days.
pub fn format_impact(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let abs = value.abs();
    if abs >= 1.0 / 12.0 {
        format_lifespan(abs)
    } else {
        format_short_horizon(abs)
    }
}

pub fn format_signed_impact(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{}{}", sign(value), format_impact(value))
}

/// Project a single day's impact over 30 years of daily repetition.
pub fn format_long_term_impact(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let long_term = value * LONG_TERM_MULTIPLIER;
    let abs = long_term.abs();
    if abs >= 1.0 {
        format!("{}{:.1} years lifetime", sign(long_term), abs)
    } else {
        format!("{}{:.1} months lifetime", sign(long_term), abs * 12.0)
    }
}

pub fn share_message(net_impact: f64) -> String {
    let days = if net_impact.is_finite() {
        format!("{:.1}", (net_impact * 365.0).abs())
    } else {
        NOT_AVAILABLE.to_string()
    };
    let direction = if net_impact >= 0.0 { "added" } else { "reduced" };

    format!(
        "My lifestyle choices today have {direction} my estimated lifespan by {days} days if continued long-term. #WhatsKillingMe"
    )
}
