//! Trend indicators — pure functions over close-price series.
//!
//! Both indicators take a raw `&[f64]` slice and return one value per input
//! point, using NaN for points where the indicator is undefined. They are
//! deterministic and side-effect free; callers extract closes via
//! `CandleSeries::closes`.

pub mod ema;
pub mod sma;

pub use ema::ema;
pub use sma::sma;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() <= epsilon,
        "expected {expected}, got {actual} (epsilon {epsilon})"
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;
