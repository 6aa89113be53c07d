//! Facilitation Classification Protocol

use amt_core::FacilitationState;

/// Maps a bar's effort percentiles to a facilitation state.
///
/// Implementations must be thread-safe (Send + Sync) and must return
/// `Unknown` when either percentile is unavailable.
pub trait FacilitationClassifier: Send + Sync {
    /// Classify from volume-rate and bar-range percentiles (0..=100)
    fn classify(&self, vol_pct: Option<f64>, range_pct: Option<f64>) -> FacilitationState;

    /// Get the classifier name for logging/debugging
    fn name(&self) -> &str;
}
