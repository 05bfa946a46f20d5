//! Number formatting for metric displays and axis labels.

/// Placeholder shown when a statistic is undefined (mean of nothing).
pub const UNDEFINED: &str = "n/a";

/// Round to a whole number and group thousands: `18000.4` → `"18,000"`.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    let rounded = format!("{:.0}", value.abs());
    let digits = rounded.as_bytes();
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    if value.is_sign_negative() && rounded != "0" {
        out.push('-');
    }
    for (i, &d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(d as char);
    }
    out
}

/// Two decimals, or [`UNDEFINED`] for `None` / non-finite values.
pub fn two_decimals(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => UNDEFINED.to_string(),
    }
}

/// Compact axis label: `12_500_000.0` → `"12.5M"`.
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}k", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}
