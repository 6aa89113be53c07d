use serde::{Deserialize, Serialize};

/// Sample-count readiness of a single distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaselineReadiness {
    /// Enough samples, outputs are valid
    Ready,
    /// Some samples, still below the threshold
    Warmup,
    /// Reserved for time-based invalidation
    Stale,
    /// No samples at all
    Unavailable,
}

impl BaselineReadiness {
    /// Classify a sample count against a threshold
    pub fn from_count(count: usize, min_samples: usize) -> Self {
        if count == 0 {
            BaselineReadiness::Unavailable
        } else if count < min_samples {
            BaselineReadiness::Warmup
        } else {
            BaselineReadiness::Ready
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, BaselineReadiness::Ready)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BaselineReadiness::Ready => "READY",
            BaselineReadiness::Warmup => "WARMUP",
            BaselineReadiness::Stale => "STALE",
            BaselineReadiness::Unavailable => "UNAVAILABLE",
        }
    }
}

/// Session-coverage state of a phase bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketBaselineState {
    Ready,
    /// Fewer contributing sessions than required
    InsufficientSessions,
    /// Enough sessions but too few bars across them
    InsufficientCoverage,
    /// Phase has no baseline (maintenance, unknown)
    NotApplicable,
}

impl BucketBaselineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, BucketBaselineState::Ready)
    }
}

/// Minimum sample counts per metric family
pub mod min_samples {
    /// Heavy-tailed continuous metrics (vol/sec, bar range)
    pub const ROBUST_CONTINUOUS: usize = 20;
    /// Ratios bounded in a fixed interval (delta pct)
    pub const BOUNDED_RATIO: usize = 10;
    /// Positive right-skewed metrics (depth, stack, pull, trade size)
    pub const POSITIVE_SKEW: usize = 10;
    /// Count-like metrics (trades/sec)
    pub const COUNT_MODEL: usize = 10;
    /// Per-session profile metrics (VA width, POC share)
    pub const PROFILE: usize = 5;
    /// Contributing sessions for session-level baselines
    pub const SESSIONS: usize = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_from_count() {
        assert_eq!(BaselineReadiness::from_count(0, 10), BaselineReadiness::Unavailable);
        assert_eq!(BaselineReadiness::from_count(9, 10), BaselineReadiness::Warmup);
        assert_eq!(BaselineReadiness::from_count(10, 10), BaselineReadiness::Ready);
        assert!(BaselineReadiness::from_count(11, 10).is_ready());
    }

    #[test]
    fn test_zero_threshold_still_needs_a_sample() {
        assert_eq!(BaselineReadiness::from_count(0, 0), BaselineReadiness::Unavailable);
        assert_eq!(BaselineReadiness::from_count(1, 0), BaselineReadiness::Ready);
    }
}
