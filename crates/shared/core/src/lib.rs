//! AMT Core Domain
//!
//! Pure domain types shared by the baseline, confidence and facilitation
//! crates. This crate contains no I/O and is 100% unit testable.
//!
//! - **Session**: trading-day phases, progress buckets and the phase to
//!   storage-bucket mapping
//! - **Validity**: tagged metric values and baseline readiness
//! - **Facilitation**: auction facilitation states and transitions

pub mod facilitation;
pub mod session;
pub mod validity;

// Re-export commonly used types at crate root
pub use facilitation::{FacilitationState, FacilitationTransition};
pub use session::{
    EFFORT_BUCKET_COUNT, FALLBACK_BUCKET, PROGRESS_BUCKET_COUNT, ProgressBucket, SessionPhase,
    expected_bars_in_phase,
};
pub use validity::{BaselineReadiness, BucketBaselineState, Metric, MetricKind, min_samples};
