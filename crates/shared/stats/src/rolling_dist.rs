//! Bounded sliding-window sample distribution

use super::{DEGENERATE_MAD, MAD_TO_SIGMA, median_in_place, normal_cdf};
use amt_core::BaselineReadiness;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Minimum window size before [`RollingDist::is_extreme`] can fire
pub const EXTREME_MIN_SAMPLES: usize = 10;

/// Default outlier multiplier, in MAD-sigmas
pub const DEFAULT_EXTREME_K: f64 = 2.5;

/// Value returned by [`RollingDist::mean`] on an empty window
pub const EMPTY_MEAN_SENTINEL: f64 = 1.0;

/// Rolling sample distribution with robust queries
///
/// Holds at most `capacity` finite samples; pushing into a full window
/// evicts the oldest one. All statistics are recomputed from the samples
/// currently in the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingDist {
    /// Samples in insertion order
    values: VecDeque<f64>,
    /// Maximum number of samples (always >= 1)
    capacity: usize,
}

impl RollingDist {
    /// Create an empty window
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Drop all samples and set a new capacity
    pub fn reset(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.values.clear();
    }

    /// Add a sample, evicting the oldest if the window is full.
    ///
    /// Non-finite samples are ignored.
    #[inline]
    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if window is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    /// Maximum number of samples
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples, oldest first
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Most recent sample
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Clear all values, keeping the capacity
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Arithmetic mean.
    ///
    /// Returns [`EMPTY_MEAN_SENTINEL`] on an empty window. Detect emptiness
    /// with [`is_empty`](Self::is_empty), never with the mean.
    pub fn mean(&self) -> f64 {
        self.try_mean().unwrap_or(EMPTY_MEAN_SENTINEL)
    }

    pub fn try_mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Median (0.0 on an empty window)
    pub fn median(&self) -> f64 {
        self.try_median().unwrap_or(0.0)
    }

    pub fn try_median(&self) -> Option<f64> {
        median_in_place(&mut self.sorted_copy())
    }

    /// Median absolute deviation. Zero for fewer than two samples.
    pub fn mad(&self) -> f64 {
        if self.values.len() < 2 {
            return 0.0;
        }
        let med = self.median();
        let mut deviations: Vec<f64> = self.values.iter().map(|v| (v - med).abs()).collect();
        median_in_place(&mut deviations).unwrap_or(0.0)
    }

    /// Outlier test with the default multiplier
    pub fn is_extreme(&self, value: f64) -> bool {
        self.is_extreme_k(value, DEFAULT_EXTREME_K)
    }

    /// True if `value` lies more than `k` MAD-sigmas from the median.
    ///
    /// Always false below [`EXTREME_MIN_SAMPLES`] samples and on zero-variance
    /// windows.
    pub fn is_extreme_k(&self, value: f64, k: f64) -> bool {
        if self.values.len() < EXTREME_MIN_SAMPLES {
            return false;
        }
        let mad = self.mad();
        if mad < DEGENERATE_MAD {
            return false;
        }
        (value - self.median()).abs() > k * mad * MAD_TO_SIGMA
    }

    /// Legacy percentile rank in [0, 100].
    ///
    /// On a degenerate window this returns 75 when `value >= median` and 25
    /// otherwise instead of reporting that no rank exists.
    #[deprecated(note = "step-function fallback on degenerate windows; use try_percentile")]
    pub fn percentile(&self, value: f64) -> f64 {
        let med = self.median();
        let mad = self.mad();
        if mad < DEGENERATE_MAD {
            return if value >= med { 75.0 } else { 25.0 };
        }
        100.0 * normal_cdf((value - med) / (mad * MAD_TO_SIGMA))
    }

    /// Robust percentile rank in [0, 100], `None` on an empty or degenerate window
    pub fn try_percentile(&self, value: f64) -> Option<f64> {
        if self.values.is_empty() || !value.is_finite() {
            return None;
        }
        let mad = self.mad();
        if mad < DEGENERATE_MAD {
            return None;
        }
        let z = (value - self.median()) / (mad * MAD_TO_SIGMA);
        Some(100.0 * normal_cdf(z))
    }

    /// [`try_percentile`](Self::try_percentile) gated on a minimum sample count
    pub fn try_percentile_min(&self, value: f64, min_samples: usize) -> Option<f64> {
        if self.values.len() < min_samples {
            return None;
        }
        self.try_percentile(value)
    }

    /// Empirical percentile: share of samples strictly below `value`, in [0, 100]
    pub fn empirical_percentile(&self, value: f64) -> Option<f64> {
        if self.values.is_empty() || value.is_nan() {
            return None;
        }
        let below = self.values.iter().filter(|&&v| v < value).count();
        Some(below as f64 / self.values.len() as f64 * 100.0)
    }

    /// Inverse query: the sample value at percentile `p` (0 to 100).
    ///
    /// Interpolates linearly between order statistics; `p` is clamped.
    pub fn percentile_value(&self, p: f64) -> Option<f64> {
        if self.values.is_empty() || !p.is_finite() {
            return None;
        }
        let sorted = self.sorted_copy();
        let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
        let lo = rank.floor() as usize;
        let hi = rank.ceil() as usize;
        let frac = rank - lo as f64;
        Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
    }

    /// Readiness against a sample-count threshold
    pub fn readiness(&self, min_samples: usize) -> BaselineReadiness {
        BaselineReadiness::from_count(self.values.len(), min_samples)
    }

    #[inline]
    pub fn is_ready(&self, min_samples: usize) -> bool {
        self.readiness(min_samples).is_ready()
    }

    fn sorted_copy(&self) -> Vec<f64> {
        let mut sorted: Vec<f64> = self.values.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }
}

impl Default for RollingDist {
    fn default() -> Self {
        Self::new(300)
    }
}
