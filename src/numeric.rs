//! Numeric helpers shared by the probability and stat engines.

/// Tolerance used when comparing probability sums.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Default epsilon below which a remaining deficit or weight counts as zero
/// during redistribution.
pub const REDISTRIBUTION_EPSILON: f64 = 1e-15;

/// Return `total` when it is strictly positive, otherwise `1.0`.
///
/// Dividing by the result keeps every share finite: a degenerate partition
/// yields zero shares instead of NaN.
///
/// # Examples
///
/// ```rust
/// use hatchstat::numeric::safe_divisor;
///
/// assert_eq!(safe_divisor(4.0), 4.0);
/// assert_eq!(safe_divisor(0.0), 1.0);
/// assert_eq!(safe_divisor(-2.0), 1.0);
/// assert_eq!(safe_divisor(f64::NAN), 1.0);
/// ```
pub fn safe_divisor(total: f64) -> f64 {
    if total > 0.0 {
        total
    } else {
        if total != 0.0 {
            tracing::debug!(total, "non-positive divisor replaced with 1");
        }
        1.0
    }
}

/// Treat a zero running multiplier as neutral.
///
/// Summed multipliers start at zero; a stat with no multiplier contributions
/// must scale by 1, not collapse to 0.
pub fn neutral_if_zero(multiplier: f64) -> f64 {
    if multiplier == 0.0 || multiplier.is_nan() {
        1.0
    } else {
        multiplier
    }
}

/// Check whether two floats are equal within `tolerance`.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Clamp `value` to `[min, max]`, mapping NaN to `min`.
pub fn clamp_or_min(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_if_zero() {
        assert_eq!(neutral_if_zero(0.0), 1.0);
        assert_eq!(neutral_if_zero(2.5), 2.5);
        assert_eq!(neutral_if_zero(f64::NAN), 1.0);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(0.1 + 0.2, 0.3, PROBABILITY_TOLERANCE));
        assert!(!approx_eq(0.3, 0.31, PROBABILITY_TOLERANCE));
    }

    #[test]
    fn test_clamp_or_min() {
        assert_eq!(clamp_or_min(75.0, 0.0, 50.0), 50.0);
        assert_eq!(clamp_or_min(-3.0, 0.0, 50.0), 0.0);
        assert_eq!(clamp_or_min(f64::NAN, 0.0, 50.0), 0.0);
    }
}
