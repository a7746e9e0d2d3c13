//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = EMA[t-1] + alpha * (value[t] - EMA[t-1])
//! Seed: EMA[0] = value[0] (no separate warmup — every point is defined).
//! alpha = 2 / (window + 1).

/// Compute EMA values for a close-price series.
///
/// The first output equals the first input; from there the standard recursive
/// smoothing applies. A zero window or empty input yields all-NaN / empty.
pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    if window == 0 {
        return vec![f64::NAN; n];
    }
    let mut result = Vec::with_capacity(n);
    let Some(&first) = values.first() else {
        return result;
    };

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut prev = first;
    result.push(prev);
    for &value in &values[1..] {
        prev += alpha * (value - prev);
        result.push(prev);
    }
    result
}
