//! Float comparison utilities.
//!
//! Time and value comparisons throughout the crate go through these helpers
//! with one shared tolerance, so that "exact key time" and "degenerate
//! interval" mean the same thing at every call site.

/// Tolerance used for all time and value comparisons in this crate.
pub const EPSILON: f32 = 1e-6;

/// Check whether two floats are equal within [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

/// Check whether a float is zero within [`EPSILON`].
#[inline]
pub fn approx_zero(v: f32) -> bool {
    v.abs() <= EPSILON
}

/// Linear blend between two scalars.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap `t` into `[0, length)`, adding `length` back when the remainder is
/// negative so reverse playback wraps to the end rather than clamping at 0.
#[inline]
pub fn wrap(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let m = t % length;
    if m < 0.0 {
        m + length
    } else {
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0));
        assert!(approx_eq(1.0, 1.0 + EPSILON * 0.5));
        assert!(!approx_eq(1.0, 1.0 + EPSILON * 10.0));
    }

    #[test]
    fn test_approx_zero() {
        assert!(approx_zero(0.0));
        assert!(approx_zero(-EPSILON * 0.5));
        assert!(!approx_zero(0.001));
    }

    #[test]
    fn test_lerp() {
        assert_relative_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_relative_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_relative_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }

    #[test]
    fn test_wrap() {
        assert_relative_eq!(wrap(1.5, 1.0), 0.5);
        assert_relative_eq!(wrap(-0.25, 1.0), 0.75);
        assert_relative_eq!(wrap(3.0, 1.5), 0.0);
        assert_relative_eq!(wrap(0.25, 1.0), 0.25);
    }
}
