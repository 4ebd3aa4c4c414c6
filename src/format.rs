// src/format.rs
//! Display formatting for page regions. Numbers follow en-US grouping.

use chrono::{DateTime, Local};
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Group an unsigned integer string; digits too long for u128 pass through.
fn group_digits(digits: &str) -> String {
    digits
        .parse::<u128>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| digits.to_string())
}

/// en-US grouping with a fraction-digit range, like `toLocaleString`.
pub fn group_f64(value: f64, min_fraction: usize, max_fraction: usize) -> String {
    if !value.is_finite() {
        return "NaN".to_string();
    }
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), ""),
    };

    let mut frac = frac_part.to_string();
    while frac.len() > min_fraction && frac.ends_with('0') {
        frac.pop();
    }

    let mut out = String::new();
    if value < 0.0 && (int_part.chars().any(|c| c != '0') || frac.chars().any(|c| c != '0')) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

pub fn group_u64(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

/// `$55.00B`, `$1.20T`, or grouped digits below one billion.
pub fn market_cap(value: f64) -> String {
    let body = if value >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else {
        group_f64(value, 0, 3)
    };
    format!("${}", body)
}

/// Whole-dollar amount with grouping, rounding half away from zero.
pub fn usd_whole(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let whole = rounded.abs().to_u128().unwrap_or(0);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}", sign, whole.to_formatted_string(&Locale::en))
}

/// Dollar amount with exactly two decimals.
pub fn usd_cents(value: f64) -> String {
    group_f64(value, 2, 2)
}

pub fn finality(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

/// First 10 and last 4 characters joined by an ellipsis.
pub fn truncate_hash(hash: &str) -> String {
    let chars: Vec<char> = hash.chars().collect();
    let head: String = chars.iter().take(10).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// First 8 characters followed by an ellipsis.
pub fn truncate_address(address: &str) -> String {
    let head: String = address.chars().take(8).collect();
    format!("{}...", head)
}

/// Local wall-clock time (`3:04:05 PM`) of an RFC 3339 timestamp.
pub fn local_time(timestamp: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(parsed.with_timezone(&Local).format("%-I:%M:%S %p").to_string())
}
