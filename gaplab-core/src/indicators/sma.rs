//! Simple Moving Average (SMA).
//!
//! Trailing mean over the last `window` values.
//! Undefined (NaN) for the first `window - 1` points.

/// Compute SMA values for a close-price series.
///
/// The window rolls forward with a running sum; the first `window - 1`
/// outputs are NaN. A zero window yields all-NaN.
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }

    let mut sum: f64 = values.iter().take(window).sum();
    result[window - 1] = sum / window as f64;

    for i in window..n {
        sum += values[i] - values[i - window];
        result[i] = sum / window as f64;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_3_over_one_to_five() {
        let result = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 2.0, DEFAULT_EPSILON);
        assert_approx(result[3], 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_window_1_equals_input() {
        assert_eq!(sma(&[7.0, 8.0, 9.0], 1), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn sma_window_larger_than_series_is_all_nan() {
        let result = sma(&[1.0, 2.0], 50);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sma_empty_input() {
        assert!(sma(&[], 3).is_empty());
    }
}
