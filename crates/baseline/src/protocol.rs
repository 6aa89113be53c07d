//! Common contract of the phase-keyed baseline stores

use amt_core::SessionPhase;

/// A baseline store partitioned by session phase
pub trait PhaseBaseline: Send + Sync {
    /// Short store name for logs
    fn name(&self) -> &str;

    /// Whether the bucket behind `phase` can answer percentile queries
    fn is_ready(&self, phase: SessionPhase) -> bool;

    /// Samples held by the bucket's primary distribution
    fn sample_count(&self, phase: SessionPhase) -> usize;

    /// Precompute the per-bucket expected bar counts for diagnostics
    fn set_expected_bars_per_session(&mut self, bar_interval_secs: i64);

    /// Phases whose bucket is ready, in bucket order
    fn ready_phases(&self) -> Vec<SessionPhase> {
        SessionPhase::TRADEABLE
            .iter()
            .copied()
            .filter(|&p| self.is_ready(p))
            .collect()
    }
}
