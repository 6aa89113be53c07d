//! Engine configuration
//!
//! JSON-backed, every field optional with the defaults below.

use std::path::Path;

use amt_baseline::MaturityThresholds;
use amt_confidence::{ConfidenceWeights, DomQualityConfig, THIN_BAR_VOLUME};
use amt_facilitation::FacilitationThresholds;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

const SECS_PER_DAY: u32 = 86_400;

/// What the session boundary does to per-session state.
///
/// Baseline stores always carry forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionBoundaryPolicy {
    /// Keep tracker and DOM quality state across the boundary
    #[default]
    CarryForward,
    /// Reset the facilitation tracker and DOM quality tracker
    ResetSessionState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bar_interval_secs: i64,
    /// RTH open, seconds since midnight
    pub rth_start_sec: u32,
    /// RTH close, exclusive
    pub rth_end_sec: u32,
    pub effort_window: usize,
    pub session_delta_window: usize,
    pub dom_window: usize,
    pub profile_window: usize,
    pub thin_bar_volume: f64,
    pub expected_dom_levels_per_side: u32,
    pub tick_size: f64,
    pub weights: ConfidenceWeights,
    pub facilitation: FacilitationThresholds,
    pub dom_quality: DomQualityConfig,
    pub maturity: MaturityThresholds,
    pub session_boundary: SessionBoundaryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bar_interval_secs: 60,
            rth_start_sec: 34_200,
            rth_end_sec: 58_500,
            effort_window: 6000,
            session_delta_window: 50,
            dom_window: 6000,
            profile_window: 50,
            thin_bar_volume: THIN_BAR_VOLUME,
            expected_dom_levels_per_side: 10,
            tick_size: 0.25,
            weights: ConfidenceWeights::default(),
            facilitation: FacilitationThresholds::default(),
            dom_quality: DomQualityConfig::default(),
            maturity: MaturityThresholds::default(),
            session_boundary: SessionBoundaryPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|error| EngineError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_json(&content)
    }

    /// The embedded default configuration
    pub fn load_default() -> Result<Self> {
        Self::from_json(include_str!("default_config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.bar_interval_secs <= 0 {
            return Err(EngineError::invalid("bar_interval_secs must be positive"));
        }
        if self.rth_start_sec >= self.rth_end_sec || self.rth_end_sec > SECS_PER_DAY {
            return Err(EngineError::invalid(format!(
                "RTH window [{}, {}) is not inside one day",
                self.rth_start_sec, self.rth_end_sec
            )));
        }
        if self.effort_window == 0
            || self.session_delta_window == 0
            || self.dom_window == 0
            || self.profile_window == 0
        {
            return Err(EngineError::invalid("baseline windows must be at least 1"));
        }
        if !(self.tick_size.is_finite() && self.tick_size > 0.0) {
            return Err(EngineError::invalid("tick_size must be positive"));
        }
        if !(self.thin_bar_volume.is_finite() && self.thin_bar_volume >= 0.0) {
            return Err(EngineError::invalid("thin_bar_volume must be non-negative"));
        }
        if self.expected_dom_levels_per_side == 0 {
            return Err(EngineError::invalid("expected_dom_levels_per_side must be positive"));
        }
        if !self.weights.is_valid() {
            return Err(EngineError::invalid("confidence weights must be finite and non-negative"));
        }
        if !self.facilitation.is_valid() {
            return Err(EngineError::invalid(
                "facilitation thresholds must satisfy extreme <= low <= high within 0..=100",
            ));
        }
        Ok(())
    }
}
