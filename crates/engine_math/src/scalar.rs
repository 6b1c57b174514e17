//! Scalar tolerances and small float helpers shared by the rotation types.

/// Tolerance used for squared-length checks (normalisation cut-off).
pub const SMALL_NUMBER: f32 = 1.0e-8;

/// Default tolerance for component-wise comparisons of rotations.
pub const KINDA_SMALL_NUMBER: f32 = 1.0e-4;

/// Allowed error in `|q|²` for a quaternion to count as normalised.
pub const QUAT_NORMALIZED_THRESHOLD: f32 = 0.01;

/// Returns `true` if `a` and `b` differ by strictly less than `tolerance`.
#[must_use]
#[inline]
pub fn float_equal(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_equal_is_strict() {
        assert!(float_equal(1.0, 1.00005, KINDA_SMALL_NUMBER));
        assert!(!float_equal(1.0, 1.5, 0.5));
        assert!(!float_equal(0.0, f32::NAN, 1.0));
    }
}
