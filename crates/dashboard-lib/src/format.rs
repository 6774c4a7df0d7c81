//! Display formatting for utilization values
//!
//! Formatting is presentation-only: callers keep full-precision values and
//! only pass them through these helpers when building view text.

/// Placeholder shown when a value cannot be computed
pub const NOT_AVAILABLE: &str = "N/A";

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const SIZE_STEP: f64 = 1024.0;

/// Round to a fixed number of decimal digits
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Format a value rounded to `digits`, dropping trailing zeros (`0.5`, `2`)
pub fn format_rounded(value: f64, digits: u32) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{}", round_to(value, digits))
}

/// Format a value with exactly `digits` decimals (`1.00`)
pub fn format_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.*}", digits, value)
}

/// Format a byte count with binary units, e.g. `1KB`, `1.5MB`
pub fn humanize_file_size(bytes: f64) -> String {
    if !bytes.is_finite() || bytes < 0.0 {
        return NOT_AVAILABLE.to_string();
    }

    let mut value = bytes;
    let mut unit = 0;
    while value >= SIZE_STEP && unit < SIZE_UNITS.len() - 1 {
        value /= SIZE_STEP;
        unit += 1;
    }

    format!("{}{}", round_to(value, 2), SIZE_UNITS[unit])
}

/// Format an optional value, falling back to [`NOT_AVAILABLE`]
pub fn or_not_available(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
