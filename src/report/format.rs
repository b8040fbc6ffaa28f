use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub const NA: &str = "n/a";

/// Fixed-point rendering with exactly `dp` decimals.
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(dp);
    rounded.to_string()
}

/// Like [`fixed`] but always carries a sign.
pub fn signed(value: Decimal, dp: u32) -> String {
    let s = fixed(value, dp);
    if s.starts_with('-') {
        s
    } else {
        format!("+{s}")
    }
}

/// `$1,234.56`
pub fn money(value: Decimal) -> String {
    let s = fixed(value.abs(), 2);
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let sign = if value < Decimal::ZERO && s != "0.00" { "-" } else { "" };
    format!("{sign}${}.{frac}", group_thousands(int))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A fraction in [0, 1] as a percentage with one decimal.
pub fn rate(fraction: Decimal) -> String {
    format!("{}%", fixed(fraction * Decimal::ONE_HUNDRED, 1))
}

/// Tiny token prices read better in scientific notation.
pub fn sci(value: Option<Decimal>) -> String {
    value
        .and_then(|v| v.to_f64())
        .map(|v| format!("{v:.2e}"))
        .unwrap_or_else(|| NA.into())
}

pub fn opt_fixed(value: Option<Decimal>, dp: u32) -> String {
    value.map(|v| fixed(v, dp)).unwrap_or_else(|| NA.into())
}

pub fn opt_money(value: Option<Decimal>) -> String {
    value.map(money).unwrap_or_else(|| NA.into())
}

/// `2026-01-05 10:00` in UTC.
pub fn opt_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| NA.into())
}

/// First `width` characters of `s`.
pub fn clip(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}
