//! Progress-conditioned profile baseline
//!
//! Stores dimensionless volume-profile features observed at fixed points of
//! prior sessions (15m, 30m, 60m, 120m, end of day). Sessions are the
//! samples, so N samples means N prior sessions.

use amt_core::{PROGRESS_BUCKET_COUNT, ProgressBucket, min_samples};
use amt_stats::RollingDist;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE_WINDOW: usize = 50;

/// Profile features captured at one progress point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileFeatureSnapshot {
    pub bucket: ProgressBucket,
    pub minutes_into_session: i64,
    /// (VAH - VAL) / tick size
    pub va_width_ticks: f64,
    /// (session high - session low) / tick size
    pub session_range_ticks: f64,
    /// VA width as a share of the session range
    pub va_width_ratio: f64,
    /// Volume at POC / total volume
    pub poc_share: f64,
    /// Cumulative session volume at this point
    pub cumulative_volume: f64,
    /// VA width data was available
    pub valid: bool,
    /// POC volume data was available
    pub poc_share_valid: bool,
}

impl ProfileFeatureSnapshot {
    /// Build a snapshot and derive the ratio fields from raw values
    pub fn from_raw(
        bucket: ProgressBucket,
        minutes_into_session: i64,
        va_width_ticks: f64,
        session_range_ticks: f64,
        poc_volume: Option<f64>,
        total_volume: f64,
    ) -> Self {
        let va_width_ratio = if session_range_ticks > 0.0 {
            va_width_ticks / session_range_ticks
        } else {
            0.0
        };
        let poc_share = match poc_volume {
            Some(poc) if total_volume > 0.0 => Some(poc / total_volume),
            _ => None,
        };
        Self {
            bucket,
            minutes_into_session,
            va_width_ticks,
            session_range_ticks,
            va_width_ratio,
            poc_share: poc_share.unwrap_or(0.0),
            cumulative_volume: total_volume,
            valid: va_width_ticks.is_finite() && va_width_ticks >= 0.0,
            poc_share_valid: poc_share.is_some(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileBucket {
    va_width_ticks: RollingDist,
    va_width_ratio: RollingDist,
    poc_share: RollingDist,
    volume_so_far: RollingDist,
}

impl ProfileBucket {
    fn new(window: usize) -> Self {
        Self {
            va_width_ticks: RollingDist::new(window),
            va_width_ratio: RollingDist::new(window),
            poc_share: RollingDist::new(window),
            volume_so_far: RollingDist::new(window),
        }
    }
}

/// Per-progress-bucket distributions of profile features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalProfileBaseline {
    buckets: [ProfileBucket; PROGRESS_BUCKET_COUNT],
    sessions_accumulated: usize,
}

impl HistoricalProfileBaseline {
    pub fn new(window: usize) -> Self {
        Self {
            buckets: std::array::from_fn(|_| ProfileBucket::new(window)),
            sessions_accumulated: 0,
        }
    }

    pub fn reset(&mut self, window: usize) {
        *self = Self::new(window);
    }

    /// Record one snapshot. Invalid snapshots are dropped, and ratio, POC
    /// share and volume are only recorded when positive.
    pub fn push_snapshot(&mut self, snap: &ProfileFeatureSnapshot) {
        if !snap.valid {
            return;
        }
        let bucket = &mut self.buckets[snap.bucket.index()];
        bucket.va_width_ticks.push(snap.va_width_ticks);
        if snap.va_width_ratio > 0.0 {
            bucket.va_width_ratio.push(snap.va_width_ratio);
        }
        if snap.poc_share_valid && snap.poc_share > 0.0 {
            bucket.poc_share.push(snap.poc_share);
        }
        if snap.cumulative_volume > 0.0 {
            bucket.volume_so_far.push(snap.cumulative_volume);
        }
    }

    /// Count a completed session
    pub fn mark_session_complete(&mut self) {
        self.sessions_accumulated += 1;
    }

    pub fn sessions_accumulated(&self) -> usize {
        self.sessions_accumulated
    }

    /// VA-width readiness for a bucket (default minimum: 5)
    pub fn is_ready(&self, bucket: ProgressBucket) -> bool {
        self.is_ready_min(bucket, min_samples::PROFILE)
    }

    pub fn is_ready_min(&self, bucket: ProgressBucket, min: usize) -> bool {
        self.buckets[bucket.index()].va_width_ticks.len() >= min
    }

    pub fn is_poc_share_ready(&self, bucket: ProgressBucket) -> bool {
        self.buckets[bucket.index()].poc_share.len() >= min_samples::PROFILE
    }

    pub fn is_volume_sufficiency_ready(&self, bucket: ProgressBucket) -> bool {
        self.buckets[bucket.index()].volume_so_far.len() >= min_samples::PROFILE
    }

    pub fn try_va_width_percentile(&self, bucket: ProgressBucket, width_ticks: f64) -> Option<f64> {
        self.buckets[bucket.index()]
            .va_width_ticks
            .try_percentile_min(width_ticks, min_samples::PROFILE)
    }

    pub fn try_va_width_ratio_percentile(&self, bucket: ProgressBucket, ratio: f64) -> Option<f64> {
        self.buckets[bucket.index()]
            .va_width_ratio
            .try_percentile_min(ratio, min_samples::PROFILE)
    }

    pub fn try_poc_share_percentile(&self, bucket: ProgressBucket, share: f64) -> Option<f64> {
        self.buckets[bucket.index()]
            .poc_share
            .try_percentile_min(share, min_samples::PROFILE)
    }

    pub fn try_volume_sufficiency_percentile(
        &self,
        bucket: ProgressBucket,
        volume: f64,
    ) -> Option<f64> {
        self.buckets[bucket.index()]
            .volume_so_far
            .try_percentile_min(volume, min_samples::PROFILE)
    }

    /// (VA width samples, POC share samples) for a bucket
    pub fn sample_counts(&self, bucket: ProgressBucket) -> (usize, usize) {
        let b = &self.buckets[bucket.index()];
        (b.va_width_ticks.len(), b.poc_share.len())
    }
}

impl Default for HistoricalProfileBaseline {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE_WINDOW)
    }
}
