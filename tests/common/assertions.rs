//! Assertion utilities for testing.
//!
//! Floating-point comparisons and palette checks used across tests.

use scoremap::ZeroCenteredPalette;

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert the structural guarantees of a zero-centered palette: the counts add
/// up, the white sample is white, and its bin is centered on zero.
pub fn assert_palette_invariants(palette: &ZeroCenteredPalette) {
    assert_eq!(
        palette.neg_count() + palette.pos_count() + 1,
        palette.len(),
        "palette counts do not add up"
    );
    assert_eq!(
        palette.colors()[palette.white_index()],
        [255, 255, 255, 255],
        "white sample is not white"
    );
    assert_approx_eq(
        palette.sample_value(palette.white_index()),
        0.0,
        Some(DEFAULT_EPSILON * palette.step().max(1.0)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.0 + 1e-12, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }
}
