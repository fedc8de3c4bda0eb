//! Rendering numbers for the display.
//!
//! Whole numbers lose their fractional part (`16.0` -> `16`), everything
//! else is rounded to [`MAX_DECIMALS`] places with trailing zeros removed.

/// Maximum number of fractional digits shown
pub const MAX_DECIMALS: usize = 10;

/// Formats a float for the display
pub fn format_f64(value: f64) -> String {
    if !value.is_finite() {
        // there is no integer or decimal form to fall back on
        return value.to_string();
    }

    if value == value.trunc() {
        return normalize_zero(format!("{:.0}", value));
    }

    let s = format!("{:.*}", MAX_DECIMALS, value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    normalize_zero(s.to_string())
}

/// Formats a number given as text. The text that does not look like a number
/// is returned unchanged instead of failing
pub fn format_text(text: &str) -> String {
    match text.trim().parse::<f64>() {
        Ok(f) => format_f64(f),
        Err(..) => text.to_string(),
    }
}

// rounding tiny negative values produces "-0"
fn normalize_zero(s: String) -> String {
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}
