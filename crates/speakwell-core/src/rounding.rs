//! Numeric rounding helpers.
//!
//! Integer rounding is ties-to-even ("banker's"), so `12.5` rounds to `12`
//! and `13.5` rounds to `14`. Decimal rounding works on the exact stored
//! binary value: `0.615` is stored just below the half and rounds to `0.61`.

/// Round to the nearest integer, ties to even.
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Round to `places` decimal places.
///
/// Scaling by `10^places` first can push a value stored just below a half
/// onto the half, so the digits come from correctly rounded decimal
/// formatting instead. Non-finite inputs are returned unchanged.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Convert integer milliseconds to seconds.
#[allow(clippy::cast_precision_loss)]
pub fn ms_to_secs(ms: i64) -> f64 {
    ms as f64 / 1000.0
}
