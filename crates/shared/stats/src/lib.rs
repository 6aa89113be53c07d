//! Robust statistics over bounded sample windows
//!
//! Provides the rolling distribution that every baseline store is built on,
//! plus the free helpers it uses.
//!
//! # Design
//!
//! - Samples are `f64`, kept in insertion order, oldest evicted first
//! - Median, mean and MAD are recomputed from the current window on demand
//! - Percentile rank is a robust z-score (`(x - median) / (MAD * 1.4826)`)
//!   mapped through the standard normal CDF
//! - Degenerate windows (MAD below [`DEGENERATE_MAD`]) never yield a rank
//!   from the validity-tagged queries

mod rolling_dist;

pub use rolling_dist::{DEFAULT_EXTREME_K, EMPTY_MEAN_SENTINEL, EXTREME_MIN_SAMPLES, RollingDist};

/// Scales a MAD to a normal-consistent standard deviation
pub const MAD_TO_SIGMA: f64 = 1.4826;

/// MAD values below this are treated as zero variance
pub const DEGENERATE_MAD: f64 = 1e-9;

/// Standard normal CDF
#[inline]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + statrs::function::erf::erf(z / std::f64::consts::SQRT_2))
}

/// Median of a slice, sorting it in place.
///
/// Even-length slices average the two middle order statistics.
pub fn median_in_place(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 0 {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    } else {
        Some(values[n / 2])
    }
}

/// Clamp to the unit interval
#[inline]
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
