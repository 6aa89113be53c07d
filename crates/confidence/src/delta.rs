//! Aggressor delta: direction (consistency) and magnitude (strength)

use amt_core::Metric;
use amt_stats::clamp01;
use serde::{Deserialize, Serialize};

/// Bars with less total volume than this carry no delta signal
pub const THIN_BAR_VOLUME: f64 = 20.0;

/// Consistency above this reads as one-sided buying
pub const EXTREME_BUYING: f64 = 0.7;
/// Consistency below this reads as one-sided selling
pub const EXTREME_SELLING: f64 = 0.3;

/// Delta sub-metrics for a single bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaReading {
    /// Aggressor buy fraction, 0.5 = balanced
    pub consistency: Metric,
    /// |delta| / volume, capped at 1
    pub strength: Metric,
    /// Signed delta / volume, `None` on a thin bar
    pub delta_pct: Option<f64>,
}

impl Default for DeltaReading {
    fn default() -> Self {
        Self {
            consistency: Metric::fraction(),
            strength: Metric::magnitude(),
            delta_pct: None,
        }
    }
}

impl DeltaReading {
    pub fn is_valid(&self) -> bool {
        self.consistency.is_valid()
    }

    pub fn is_extreme_buying(&self) -> bool {
        self.consistency.get().is_some_and(|c| c > EXTREME_BUYING)
    }

    pub fn is_extreme_selling(&self) -> bool {
        self.consistency.get().is_some_and(|c| c < EXTREME_SELLING)
    }
}

/// Compute delta consistency and strength from the aggressor split.
///
/// Below `thin_bar_volume` (or with non-finite inputs) both sub-metrics stay
/// unavailable at their neutral placeholders.
pub fn compute_delta(ask_volume: f64, bid_volume: f64, thin_bar_volume: f64) -> DeltaReading {
    let mut reading = DeltaReading::default();
    let total = ask_volume + bid_volume;
    if !total.is_finite() || total < thin_bar_volume || total <= 0.0 {
        return reading;
    }

    let delta_pct = (ask_volume - bid_volume) / total;
    reading.consistency.set(clamp01(0.5 + 0.5 * delta_pct));
    reading.strength.set(delta_pct.abs().min(1.0));
    reading.delta_pct = Some(delta_pct);
    reading
}
