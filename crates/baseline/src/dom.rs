//! Order-book (DOM) baseline
//!
//! Phase-bucketed history of stack/pull rates and resting depth. Historical
//! bars often carry no depth data; callers only push bars that have it.

use crate::buckets::PhaseBuckets;
use crate::effort::BucketDiagnostics;
use crate::protocol::PhaseBaseline;
use amt_core::{SessionPhase, expected_bars_in_phase, min_samples};
use amt_stats::RollingDist;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DOM_WINDOW: usize = 6000;

/// Depth samples a bucket needs before percentiles are valid
pub const DOM_MIN_SAMPLES: usize = min_samples::POSITIVE_SKEW;

/// DOM distributions for one phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomBucket {
    pub stack_rate: RollingDist,
    pub pull_rate: RollingDist,
    pub depth_mass_core: RollingDist,
    pub depth_mass_halo: RollingDist,
    pub halo_imbalance: RollingDist,
    pub spread_ticks: RollingDist,
    sessions_contributed: usize,
    total_bars_pushed: usize,
    expected_bars_per_session: usize,
}

impl DomBucket {
    pub fn new(window: usize) -> Self {
        Self {
            stack_rate: RollingDist::new(window),
            pull_rate: RollingDist::new(window),
            depth_mass_core: RollingDist::new(window),
            depth_mass_halo: RollingDist::new(window),
            halo_imbalance: RollingDist::new(window),
            spread_ticks: RollingDist::new(window),
            sessions_contributed: 0,
            total_bars_pushed: 0,
            expected_bars_per_session: 0,
        }
    }

    pub fn push(&mut self, stack: f64, pull: f64, depth: f64) {
        self.stack_rate.push(stack);
        self.pull_rate.push(pull);
        self.depth_mass_core.push(depth);
        self.total_bars_pushed += 1;
    }

    pub fn push_halo(&mut self, halo_mass: f64, imbalance: f64) {
        self.depth_mass_halo.push(halo_mass);
        self.halo_imbalance.push(imbalance);
    }

    /// Negative spreads (crossed books) are dropped
    pub fn push_spread(&mut self, spread_ticks: f64) {
        if spread_ticks >= 0.0 {
            self.spread_ticks.push(spread_ticks);
        }
    }

    pub fn increment_session_count(&mut self) {
        self.sessions_contributed += 1;
    }

    pub fn set_expected_bars_per_session(&mut self, expected: usize) {
        self.expected_bars_per_session = expected;
    }

    /// Ready once this bucket holds enough depth samples
    pub fn is_ready(&self) -> bool {
        self.depth_mass_core.len() >= DOM_MIN_SAMPLES
    }

    pub fn is_halo_ready(&self) -> bool {
        self.depth_mass_halo.len() >= DOM_MIN_SAMPLES
    }

    pub fn is_spread_ready(&self) -> bool {
        self.spread_ticks.len() >= DOM_MIN_SAMPLES
    }

    pub fn sample_count(&self) -> usize {
        self.depth_mass_core.len()
    }

    pub fn try_stack_percentile(&self, value: f64) -> Option<f64> {
        self.is_ready()
            .then(|| self.stack_rate.try_percentile(value))
            .flatten()
    }

    pub fn try_pull_percentile(&self, value: f64) -> Option<f64> {
        self.is_ready()
            .then(|| self.pull_rate.try_percentile(value))
            .flatten()
    }

    pub fn try_depth_percentile(&self, value: f64) -> Option<f64> {
        self.is_ready()
            .then(|| self.depth_mass_core.try_percentile(value))
            .flatten()
    }

    pub fn try_halo_percentile(&self, value: f64) -> Option<f64> {
        self.is_halo_ready()
            .then(|| self.depth_mass_halo.try_percentile(value))
            .flatten()
    }

    pub fn try_imbalance_percentile(&self, value: f64) -> Option<f64> {
        self.is_halo_ready()
            .then(|| self.halo_imbalance.try_percentile(value))
            .flatten()
    }

    /// Spread is small and discrete, so it uses the empirical percentile
    pub fn try_spread_percentile(&self, value: f64) -> Option<f64> {
        self.is_spread_ready()
            .then(|| self.spread_ticks.empirical_percentile(value))
            .flatten()
    }

    /// `expected` covers every session seen so far, counting the one in
    /// progress before the first close
    pub fn diagnostics(&self) -> BucketDiagnostics {
        BucketDiagnostics {
            sessions: self.sessions_contributed,
            bars: self.total_bars_pushed,
            expected: self.expected_bars_per_session * self.sessions_contributed.max(1),
            min_required: DOM_MIN_SAMPLES,
        }
    }
}

impl Default for DomBucket {
    fn default() -> Self {
        Self::new(DEFAULT_DOM_WINDOW)
    }
}

/// DOM distributions for all tradeable phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomBaselineStore {
    buckets: PhaseBuckets<DomBucket>,
}

impl DomBaselineStore {
    pub fn new(window: usize) -> Self {
        Self {
            buckets: PhaseBuckets::from_fn(|_| DomBucket::new(window)),
        }
    }

    pub fn reset(&mut self, window: usize) {
        *self = Self::new(window);
    }

    pub fn get(&self, phase: SessionPhase) -> &DomBucket {
        self.buckets.get(phase)
    }

    pub fn push(&mut self, phase: SessionPhase, stack: f64, pull: f64, depth: f64) {
        self.buckets.get_mut(phase).push(stack, pull, depth);
    }

    pub fn push_halo(&mut self, phase: SessionPhase, halo_mass: f64, imbalance: f64) {
        self.buckets.get_mut(phase).push_halo(halo_mass, imbalance);
    }

    pub fn push_spread(&mut self, phase: SessionPhase, spread_ticks: f64) {
        self.buckets.get_mut(phase).push_spread(spread_ticks);
    }

    pub fn increment_session_count(&mut self, phase: SessionPhase) {
        let bucket = self.buckets.get_mut(phase);
        bucket.increment_session_count();
        debug!(
            "[BASELINE] dom {} sessions={} depth_samples={}",
            phase,
            bucket.sessions_contributed,
            bucket.sample_count()
        );
    }

    pub fn is_halo_ready(&self, phase: SessionPhase) -> bool {
        self.buckets.get(phase).is_halo_ready()
    }

    pub fn is_spread_ready(&self, phase: SessionPhase) -> bool {
        self.buckets.get(phase).is_spread_ready()
    }

    pub fn try_stack_percentile(&self, phase: SessionPhase, value: f64) -> Option<f64> {
        self.buckets.get(phase).try_stack_percentile(value)
    }

    pub fn try_pull_percentile(&self, phase: SessionPhase, value: f64) -> Option<f64> {
        self.buckets.get(phase).try_pull_percentile(value)
    }

    pub fn try_depth_percentile(&self, phase: SessionPhase, value: f64) -> Option<f64> {
        self.buckets.get(phase).try_depth_percentile(value)
    }

    pub fn try_halo_percentile(&self, phase: SessionPhase, value: f64) -> Option<f64> {
        self.buckets.get(phase).try_halo_percentile(value)
    }

    pub fn try_imbalance_percentile(&self, phase: SessionPhase, value: f64) -> Option<f64> {
        self.buckets.get(phase).try_imbalance_percentile(value)
    }

    pub fn try_spread_percentile(&self, phase: SessionPhase, value: f64) -> Option<f64> {
        self.buckets.get(phase).try_spread_percentile(value)
    }
}

impl Default for DomBaselineStore {
    fn default() -> Self {
        Self::new(DEFAULT_DOM_WINDOW)
    }
}

impl PhaseBaseline for DomBaselineStore {
    fn name(&self) -> &str {
        "dom"
    }

    fn is_ready(&self, phase: SessionPhase) -> bool {
        self.buckets.get(phase).is_ready()
    }

    fn sample_count(&self, phase: SessionPhase) -> usize {
        self.buckets.get(phase).sample_count()
    }

    fn set_expected_bars_per_session(&mut self, bar_interval_secs: i64) {
        for (phase, bucket) in self.buckets.iter_mut() {
            bucket.set_expected_bars_per_session(expected_bars_in_phase(phase, bar_interval_secs));
        }
    }
}
