//! Per-bar facilitation classification from effort percentiles

use amt_core::FacilitationState;
use serde::{Deserialize, Serialize};

use crate::protocol::FacilitationClassifier;

/// Percentile cut-offs for facilitation classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilitationThresholds {
    /// At or above this is "high"
    pub high: f64,
    /// At or below this is "low"
    pub low: f64,
    /// At or below this is "extremely low"
    pub extreme: f64,
}

impl Default for FacilitationThresholds {
    fn default() -> Self {
        Self {
            high: 75.0,
            low: 25.0,
            extreme: 10.0,
        }
    }
}

impl FacilitationThresholds {
    /// Ordered `0 <= extreme <= low <= high <= 100`
    pub fn is_valid(&self) -> bool {
        (0.0..=100.0).contains(&self.extreme)
            && (0.0..=100.0).contains(&self.high)
            && self.extreme <= self.low
            && self.low <= self.high
    }
}

/// Classify a bar from its volume and range percentiles.
///
/// - LABORED: heavy volume, narrow range
/// - INEFFICIENT: light volume, wide range
/// - FAILED: both extremely low
/// - EFFICIENT: anything else
///
/// Either percentile missing yields `Unknown`.
pub fn classify_facilitation(
    vol_pct: Option<f64>,
    range_pct: Option<f64>,
    t: &FacilitationThresholds,
) -> FacilitationState {
    let (Some(vol), Some(range)) = (vol_pct, range_pct) else {
        return FacilitationState::Unknown;
    };

    if vol >= t.high && range <= t.low {
        FacilitationState::Labored
    } else if vol <= t.low && range >= t.high {
        FacilitationState::Inefficient
    } else if vol <= t.extreme && range <= t.extreme {
        FacilitationState::Failed
    } else {
        FacilitationState::Efficient
    }
}

/// Threshold classifier over volume-rate and bar-range percentiles
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileClassifier {
    thresholds: FacilitationThresholds,
}

impl PercentileClassifier {
    pub fn new(thresholds: FacilitationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &FacilitationThresholds {
        &self.thresholds
    }
}

impl FacilitationClassifier for PercentileClassifier {
    fn classify(&self, vol_pct: Option<f64>, range_pct: Option<f64>) -> FacilitationState {
        classify_facilitation(vol_pct, range_pct, &self.thresholds)
    }

    fn name(&self) -> &str {
        "percentile_classifier"
    }
}
