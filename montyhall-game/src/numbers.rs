//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(f64::MAX)
}

/// Fraction `part / whole`, returning 0.0 for an empty whole.
#[must_use]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    usize_to_f64(part) / usize_to_f64(whole)
}

/// Split `total` into `parts` contiguous chunk lengths that differ by at most one.
#[must_use]
pub fn split_evenly(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts;
    let extra = total % parts;
    (0..parts)
        .map(|idx| if idx < extra { base + 1 } else { base })
        .collect()
}
