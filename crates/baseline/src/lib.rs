//! AMT Historical Baselines
//!
//! Bounded, bucketed sample distributions that give every live metric a
//! same-context historical reference:
//!
//! - **Effort**: bar-level volume, trade and range samples per session phase
//! - **Session delta**: one delta ratio per phase per session
//! - **DOM**: stack/pull rates and resting depth per session phase
//! - **Profile**: value-area and POC features per progress bucket
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Baseline Stores                           │
//! │                                                             │
//! │  SessionPhase ──► storage_bucket() ──► PhaseBuckets[0..7]   │
//! │                        │                                    │
//! │    MAINT / UNKNOWN ────┘ (aliased to bucket 0)              │
//! │                                                             │
//! │  ProgressBucket ─────────────────────► profile[0..5]        │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!              try_*_percentile() -> Option<f64>
//!                              │
//!                              ▼
//!                  Confidence / Facilitation
//! ```
//!
//! Every query returns `None` until its bucket has the minimum history; no
//! store ever extrapolates or clips a value for an under-populated bucket.

pub mod buckets;
pub mod dom;
pub mod effort;
pub mod maturity;
pub mod profile;
pub mod protocol;
pub mod session_delta;

// Re-export main types
pub use buckets::PhaseBuckets;
pub use dom::{DOM_MIN_SAMPLES, DomBaselineStore, DomBucket};
pub use effort::{
    BucketDiagnostics, EffortBaselineStore, EffortBucket, EffortMetric, EffortSample,
    REQUIRED_SESSIONS,
};
pub use maturity::{
    MaturityGate, MaturityResult, MaturityThresholds, ProfileProgress, check_profile_maturity,
};
pub use profile::{HistoricalProfileBaseline, ProfileFeatureSnapshot};
pub use protocol::PhaseBaseline;
pub use session_delta::{SessionDeltaBaseline, SessionDeltaBucket};
