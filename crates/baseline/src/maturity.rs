//! Profile maturity gate
//!
//! Decides whether the current session's profile is developed enough to
//! support decisions. Structural gates always apply; the volume gate only
//! applies when the progress-conditioned volume baseline is ready.

use crate::profile::HistoricalProfileBaseline;
use amt_core::ProgressBucket;
use serde::{Deserialize, Serialize};

/// Maturity thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaturityThresholds {
    pub min_price_levels: usize,
    pub min_bars: usize,
    pub min_minutes: i64,
    /// Current volume must reach this percentile of historical volume-so-far
    pub volume_sufficiency_percentile: f64,
}

impl Default for MaturityThresholds {
    fn default() -> Self {
        Self {
            min_price_levels: 5,
            min_bars: 5,
            min_minutes: 10,
            volume_sufficiency_percentile: 20.0,
        }
    }
}

/// First gate that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaturityGate {
    PriceLevels,
    Bars,
    Minutes,
    Volume,
}

impl MaturityGate {
    pub fn reason(&self) -> &'static str {
        match self {
            MaturityGate::PriceLevels => "insufficient price levels",
            MaturityGate::Bars => "insufficient bars",
            MaturityGate::Minutes => "insufficient minutes",
            MaturityGate::Volume => "volume below historical percentile",
        }
    }
}

/// Current session profile inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileProgress {
    pub price_levels: usize,
    pub total_volume: f64,
    pub session_bars: usize,
    pub session_minutes: i64,
    pub bucket: ProgressBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaturityResult {
    pub is_mature: bool,
    /// Volume percentile vs history, `None` when the baseline is not ready
    /// and the volume gate was not applied
    pub volume_percentile: Option<f64>,
    pub failed_gate: Option<MaturityGate>,
}

impl MaturityResult {
    pub fn volume_gate_applied(&self) -> bool {
        self.volume_percentile.is_some()
    }
}

/// Evaluate the maturity gates, in order: levels, bars, minutes, volume
pub fn check_profile_maturity(
    progress: &ProfileProgress,
    baseline: Option<&HistoricalProfileBaseline>,
    thresholds: &MaturityThresholds,
) -> MaturityResult {
    let volume_percentile = baseline.and_then(|b| {
        b.try_volume_sufficiency_percentile(progress.bucket, progress.total_volume)
    });

    let failed_gate = if progress.price_levels < thresholds.min_price_levels {
        Some(MaturityGate::PriceLevels)
    } else if progress.session_bars < thresholds.min_bars {
        Some(MaturityGate::Bars)
    } else if progress.session_minutes < thresholds.min_minutes {
        Some(MaturityGate::Minutes)
    } else if volume_percentile.is_some_and(|p| p < thresholds.volume_sufficiency_percentile) {
        Some(MaturityGate::Volume)
    } else {
        None
    };

    MaturityResult {
        is_mature: failed_gate.is_none(),
        volume_percentile,
        failed_gate,
    }
}
