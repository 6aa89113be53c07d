//! AMT Facilitation
//!
//! Turns effort percentiles into a per-bar facilitation classification, then
//! debounces it into a stable confirmed state.
//!
//! ```text
//! vol_sec pct ──┐
//!               ├──► FacilitationClassifier ──► FacilitationTracker::update()
//! range pct ────┘                                       │
//!                                                       ▼
//!                              confirmed state, persistence, transition
//! ```

pub mod classify;
pub mod protocol;
pub mod tracker;

pub use amt_core::{FacilitationState, FacilitationTransition};
pub use classify::{FacilitationThresholds, PercentileClassifier, classify_facilitation};
pub use protocol::FacilitationClassifier;
pub use tracker::{CALM_CONFIRMATION_BARS, FacilitationTracker, LABORED_PERSISTENCE_BARS};
