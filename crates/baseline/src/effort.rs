//! Effort baseline
//!
//! Bar-level samples from prior sessions, one bucket per session phase.
//! Each distribution holds individual bar values, never bucket summaries.

use crate::buckets::PhaseBuckets;
use crate::protocol::PhaseBaseline;
use amt_core::{BucketBaselineState, SessionPhase, expected_bars_in_phase, min_samples};
use amt_stats::RollingDist;
use log::debug;
use serde::{Deserialize, Serialize};

/// Default window: roughly 1000 one-minute bars times 5 sessions
pub const DEFAULT_EFFORT_WINDOW: usize = 6000;

/// Sessions a bucket needs before it is considered ready
pub const REQUIRED_SESSIONS: usize = 5;

/// Share of the expected bars per session that must have been observed
pub const MIN_COVERAGE_RATIO: f64 = 0.5;

/// Per-session bar minimum when no expectation has been set
const FALLBACK_MIN_BARS_PER_SESSION: usize = 10;

/// Bar-level metrics kept by the effort store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffortMetric {
    /// Volume per second
    VolSec,
    /// Trades per second
    TradesSec,
    /// Signed delta as a share of bar volume
    DeltaPct,
    /// High minus low, in ticks
    BarRange,
    /// Volume per trade
    AvgTradeSize,
    /// |close - previous close| in ticks
    AbsCloseChange,
    /// Range per minute of bar duration
    RangeVelocity,
}

impl EffortMetric {
    /// Samples needed before the metric's percentile is trusted
    pub fn min_samples(&self) -> usize {
        match self {
            EffortMetric::VolSec | EffortMetric::BarRange | EffortMetric::RangeVelocity => {
                min_samples::ROBUST_CONTINUOUS
            }
            EffortMetric::DeltaPct => min_samples::BOUNDED_RATIO,
            EffortMetric::TradesSec => min_samples::COUNT_MODEL,
            EffortMetric::AvgTradeSize | EffortMetric::AbsCloseChange => {
                min_samples::POSITIVE_SKEW
            }
        }
    }
}

/// One bar's effort measurements
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffortSample {
    pub vol_sec: f64,
    pub trades_sec: f64,
    pub delta_pct: f64,
    pub bar_range_ticks: f64,
    /// `None` when the bar had no trades
    pub avg_trade_size: Option<f64>,
    /// `None` on the first bar (no previous close)
    pub abs_close_change_ticks: Option<f64>,
    pub range_velocity: f64,
}

/// Distributions and coverage bookkeeping for one phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffortBucket {
    pub vol_sec: RollingDist,
    pub trades_sec: RollingDist,
    pub delta_pct: RollingDist,
    pub bar_range: RollingDist,
    pub avg_trade_size: RollingDist,
    pub abs_close_change: RollingDist,
    pub range_velocity: RollingDist,
    sessions_contributed: usize,
    total_bars_pushed: usize,
    expected_bars_per_session: usize,
}

/// Coverage figures for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDiagnostics {
    pub sessions: usize,
    pub bars: usize,
    /// Expected bars across the required sessions
    pub expected: usize,
    /// Minimum bars across the required sessions
    pub min_required: usize,
}

impl EffortBucket {
    pub fn new(window: usize) -> Self {
        Self {
            vol_sec: RollingDist::new(window),
            trades_sec: RollingDist::new(window),
            delta_pct: RollingDist::new(window),
            bar_range: RollingDist::new(window),
            avg_trade_size: RollingDist::new(window),
            abs_close_change: RollingDist::new(window),
            range_velocity: RollingDist::new(window),
            sessions_contributed: 0,
            total_bars_pushed: 0,
            expected_bars_per_session: 0,
        }
    }

    pub fn push(&mut self, sample: &EffortSample) {
        self.vol_sec.push(sample.vol_sec);
        self.trades_sec.push(sample.trades_sec);
        self.delta_pct.push(sample.delta_pct);
        self.bar_range.push(sample.bar_range_ticks);
        if let Some(size) = sample.avg_trade_size {
            self.avg_trade_size.push(size);
        }
        if let Some(change) = sample.abs_close_change_ticks {
            self.abs_close_change.push(change);
        }
        self.range_velocity.push(sample.range_velocity);
        self.total_bars_pushed += 1;
    }

    pub fn dist(&self, metric: EffortMetric) -> &RollingDist {
        match metric {
            EffortMetric::VolSec => &self.vol_sec,
            EffortMetric::TradesSec => &self.trades_sec,
            EffortMetric::DeltaPct => &self.delta_pct,
            EffortMetric::BarRange => &self.bar_range,
            EffortMetric::AvgTradeSize => &self.avg_trade_size,
            EffortMetric::AbsCloseChange => &self.abs_close_change,
            EffortMetric::RangeVelocity => &self.range_velocity,
        }
    }

    /// Robust percentile of `value`, gated on the metric's sample minimum
    pub fn try_percentile(&self, metric: EffortMetric, value: f64) -> Option<f64> {
        self.dist(metric)
            .try_percentile_min(value, metric.min_samples())
    }

    pub fn increment_session_count(&mut self) {
        self.sessions_contributed += 1;
    }

    pub fn set_expected_bars_per_session(&mut self, expected: usize) {
        self.expected_bars_per_session = expected;
    }

    pub fn sessions_contributed(&self) -> usize {
        self.sessions_contributed
    }

    pub fn total_bars_pushed(&self) -> usize {
        self.total_bars_pushed
    }

    pub fn expected_bars_per_session(&self) -> usize {
        self.expected_bars_per_session
    }

    /// Bars per session needed for coverage
    pub fn min_bars_per_session(&self) -> usize {
        if self.expected_bars_per_session == 0 {
            return FALLBACK_MIN_BARS_PER_SESSION;
        }
        (self.expected_bars_per_session as f64 * MIN_COVERAGE_RATIO) as usize
    }

    pub fn state(&self) -> BucketBaselineState {
        if self.sessions_contributed < REQUIRED_SESSIONS {
            return BucketBaselineState::InsufficientSessions;
        }
        if self.total_bars_pushed < REQUIRED_SESSIONS * self.min_bars_per_session() {
            return BucketBaselineState::InsufficientCoverage;
        }
        BucketBaselineState::Ready
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    pub fn diagnostics(&self) -> BucketDiagnostics {
        BucketDiagnostics {
            sessions: self.sessions_contributed,
            bars: self.total_bars_pushed,
            expected: self.expected_bars_per_session * REQUIRED_SESSIONS,
            min_required: self.min_bars_per_session() * REQUIRED_SESSIONS,
        }
    }
}

impl Default for EffortBucket {
    fn default() -> Self {
        Self::new(DEFAULT_EFFORT_WINDOW)
    }
}

/// Effort distributions for all tradeable phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffortBaselineStore {
    buckets: PhaseBuckets<EffortBucket>,
}

impl EffortBaselineStore {
    pub fn new(window: usize) -> Self {
        Self {
            buckets: PhaseBuckets::from_fn(|_| EffortBucket::new(window)),
        }
    }

    /// Drop all history and re-create buckets with the given window
    pub fn reset(&mut self, window: usize) {
        *self = Self::new(window);
    }

    pub fn get(&self, phase: SessionPhase) -> &EffortBucket {
        self.buckets.get(phase)
    }

    pub fn get_mut(&mut self, phase: SessionPhase) -> &mut EffortBucket {
        self.buckets.get_mut(phase)
    }

    pub fn by_index(&self, index: usize) -> Option<&EffortBucket> {
        self.buckets.by_index(index)
    }

    pub fn push_bar(&mut self, phase: SessionPhase, sample: &EffortSample) {
        self.buckets.get_mut(phase).push(sample);
    }

    pub fn increment_session_count(&mut self, phase: SessionPhase) {
        let bucket = self.buckets.get_mut(phase);
        bucket.increment_session_count();
        debug!(
            "[BASELINE] effort {} sessions={} bars={}",
            phase,
            bucket.sessions_contributed(),
            bucket.total_bars_pushed()
        );
    }

    /// Coverage state; `NotApplicable` for phases without their own bucket
    pub fn state_for(&self, phase: SessionPhase) -> BucketBaselineState {
        if !phase.is_tradeable() {
            return BucketBaselineState::NotApplicable;
        }
        self.buckets.get(phase).state()
    }

    pub fn has_enough_sessions(&self, phase: SessionPhase) -> bool {
        self.buckets.get(phase).sessions_contributed() >= REQUIRED_SESSIONS
    }

    pub fn all_buckets_ready(&self) -> bool {
        self.buckets.iter().all(|(_, b)| b.is_ready())
    }

    pub fn try_percentile(
        &self,
        phase: SessionPhase,
        metric: EffortMetric,
        value: f64,
    ) -> Option<f64> {
        self.buckets.get(phase).try_percentile(metric, value)
    }
}

impl Default for EffortBaselineStore {
    fn default() -> Self {
        Self::new(DEFAULT_EFFORT_WINDOW)
    }
}

impl PhaseBaseline for EffortBaselineStore {
    fn name(&self) -> &str {
        "effort"
    }

    fn is_ready(&self, phase: SessionPhase) -> bool {
        self.buckets.get(phase).is_ready()
    }

    fn sample_count(&self, phase: SessionPhase) -> usize {
        self.buckets.get(phase).vol_sec.len()
    }

    fn set_expected_bars_per_session(&mut self, bar_interval_secs: i64) {
        for (phase, bucket) in self.buckets.iter_mut() {
            bucket.set_expected_bars_per_session(expected_bars_in_phase(phase, bar_interval_secs));
        }
    }
}
