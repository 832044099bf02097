//! Rounding helpers for comparing calculated values.

/// Rounds `x` to `places` decimal places.
#[must_use]
pub fn round_to(x: f64, places: i32) -> f64 {
    let pow = 10f64.powi(places);
    (x * pow).round() / pow
}

/// Returns true if `a` and `b` are equal once rounded to `places` decimal places.
#[must_use]
pub fn equal_to_places(a: f64, b: f64, places: i32) -> bool {
    round_to(a, places) == round_to(b, places)
}
