//! Text formatting shared by the widgets.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Compact dollar amount: `$1.2M`, `$4.2K`, `$950`.
pub fn format_currency(amount: Decimal) -> String {
    let million = Decimal::from(1_000_000);
    let thousand = Decimal::from(1_000);
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    let abs = amount.abs();

    if abs >= million {
        format!("{sign}${:.1}M", abs / million)
    } else if abs >= thousand {
        format!("{sign}${:.1}K", abs / thousand)
    } else {
        format!("{sign}${:.0}", abs)
    }
}

/// Relative age such as `5m ago` or `2d ago`.
pub fn format_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

/// Cut `s` to `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
