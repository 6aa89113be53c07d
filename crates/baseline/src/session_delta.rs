//! Session-level delta baseline
//!
//! One sample per phase per session: the phase's cumulative delta divided by
//! its volume. Kept apart from the bar-level `delta_pct` distribution, the two
//! are not comparable.

use crate::buckets::PhaseBuckets;
use crate::protocol::PhaseBaseline;
use amt_core::{SessionPhase, min_samples};
use amt_stats::RollingDist;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_DELTA_WINDOW: usize = 50;

/// History of one phase's session delta ratios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDeltaBucket {
    /// Raw signed ratios as observed
    signed: RollingDist,
    /// Magnitudes of the same ratios; percentile queries use these
    magnitude: RollingDist,
    sessions_contributed: usize,
}

impl SessionDeltaBucket {
    pub fn new(window: usize) -> Self {
        Self {
            signed: RollingDist::new(window),
            magnitude: RollingDist::new(window),
            sessions_contributed: 0,
        }
    }

    pub fn push(&mut self, ratio: f64) {
        if !ratio.is_finite() {
            return;
        }
        self.signed.push(ratio);
        self.magnitude.push(ratio.abs());
    }

    pub fn increment_session_count(&mut self) {
        self.sessions_contributed += 1;
    }

    pub fn sessions_contributed(&self) -> usize {
        self.sessions_contributed
    }

    pub fn signed_ratios(&self) -> &RollingDist {
        &self.signed
    }

    pub fn magnitudes(&self) -> &RollingDist {
        &self.magnitude
    }

    pub fn is_ready(&self) -> bool {
        self.sessions_contributed >= min_samples::SESSIONS
    }

    /// Share of historical magnitudes below `|ratio|`, in [0, 100]
    pub fn try_percentile(&self, ratio: f64) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }
        self.magnitude.empirical_percentile(ratio.abs())
    }
}

impl Default for SessionDeltaBucket {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_DELTA_WINDOW)
    }
}

/// Session delta ratios for all tradeable phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDeltaBaseline {
    buckets: PhaseBuckets<SessionDeltaBucket>,
}

impl SessionDeltaBaseline {
    pub fn new(window: usize) -> Self {
        Self {
            buckets: PhaseBuckets::from_fn(|_| SessionDeltaBucket::new(window)),
        }
    }

    pub fn reset(&mut self, window: usize) {
        *self = Self::new(window);
    }

    pub fn get(&self, phase: SessionPhase) -> &SessionDeltaBucket {
        self.buckets.get(phase)
    }

    pub fn push_phase_delta(&mut self, phase: SessionPhase, ratio: f64) {
        self.buckets.get_mut(phase).push(ratio);
    }

    pub fn increment_phase_session_count(&mut self, phase: SessionPhase) {
        let bucket = self.buckets.get_mut(phase);
        bucket.increment_session_count();
        debug!(
            "[BASELINE] session delta {} sessions={}",
            phase,
            bucket.sessions_contributed()
        );
    }

    /// Push one session's ratio and count the session
    pub fn record_session(&mut self, phase: SessionPhase, ratio: f64) {
        self.push_phase_delta(phase, ratio);
        self.increment_phase_session_count(phase);
    }

    pub fn is_phase_ready(&self, phase: SessionPhase) -> bool {
        self.buckets.get(phase).is_ready()
    }

    pub fn try_percentile(&self, phase: SessionPhase, ratio: f64) -> Option<f64> {
        self.buckets.get(phase).try_percentile(ratio)
    }
}

impl Default for SessionDeltaBaseline {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_DELTA_WINDOW)
    }
}

impl PhaseBaseline for SessionDeltaBaseline {
    fn name(&self) -> &str {
        "session_delta"
    }

    fn is_ready(&self, phase: SessionPhase) -> bool {
        self.is_phase_ready(phase)
    }

    fn sample_count(&self, phase: SessionPhase) -> usize {
        self.buckets.get(phase).magnitudes().len()
    }

    /// One sample per session, so there is no per-bar expectation
    fn set_expected_bars_per_session(&mut self, _bar_interval_secs: i64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_five_sessions() {
        let mut baseline = SessionDeltaBaseline::default();
        let phase = SessionPhase::InitialBalance;
        for i in 0..4 {
            baseline.record_session(phase, 0.1 * (i + 1) as f64);
        }
        assert_eq!(baseline.try_percentile(phase, 0.2), None);

        baseline.record_session(phase, 0.5);
        assert!(baseline.is_phase_ready(phase));
        assert!(baseline.try_percentile(phase, 0.2).is_some());
    }

    #[test]
    fn test_pushes_without_session_count_do_not_make_ready() {
        let mut baseline = SessionDeltaBaseline::default();
        for _ in 0..10 {
            baseline.push_phase_delta(SessionPhase::MidSession, 0.3);
        }
        assert!(!baseline.is_phase_ready(SessionPhase::MidSession));
        assert_eq!(baseline.try_percentile(SessionPhase::MidSession, 0.3), None);
    }

    #[test]
    fn test_query_is_sign_insensitive() {
        let mut baseline = SessionDeltaBaseline::default();
        let phase = SessionPhase::MidSession;
        for r in [-0.4, -0.2, 0.1, 0.3, 0.5] {
            baseline.record_session(phase, r);
        }
        assert_eq!(
            baseline.try_percentile(phase, 0.35),
            baseline.try_percentile(phase, -0.35)
        );
        // magnitudes 0.1 0.2 0.3 0.4 0.5: three below 0.35
        assert_eq!(baseline.try_percentile(phase, -0.35), Some(60.0));
    }

    #[test]
    fn test_raw_signed_ratios_are_kept() {
        let mut baseline = SessionDeltaBaseline::default();
        baseline.record_session(SessionPhase::ClosingSession, -0.25);
        let bucket = baseline.get(SessionPhase::ClosingSession);
        assert_eq!(bucket.signed_ratios().last(), Some(-0.25));
        assert_eq!(bucket.magnitudes().last(), Some(0.25));
    }
}
