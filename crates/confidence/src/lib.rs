//! AMT Confidence
//!
//! Independently gated sub-metrics and the renormalized score built from
//! them.
//!
//! ## Architecture
//!
//! ```text
//! bar / depth / profile inputs
//!        │
//!        ├── compute_delta()           ──► delta_consistency, delta_strength
//!        ├── compute_dom_strength()    ──► dom_strength
//!        ├── compute_tpo_acceptance()  ──► tpo_acceptance
//!        ├── volume_profile_clarity()  ──► volume_profile_clarity ◄── profile baseline
//!        ├── liquidity_availability()  ──► liquidity_availability ◄── DOM baseline
//!        └── market_composition()      ──► market_composition     ◄── effort baseline
//!                                                 │
//!                                                 ▼
//!                                   ConfidenceAttribute::calculate_score()
//!                                                 │
//!                                                 ▼
//!                                 ScoreResult (None = no opinion)
//! ```
//!
//! An unavailable sub-metric is dropped from both sides of the weighted mean.
//! It is never scored as zero.

pub mod attribute;
pub mod components;
pub mod delta;
pub mod dom_quality;
pub mod tpo;

pub use amt_core::{Metric, MetricKind};
pub use attribute::{ConfidenceAttribute, ConfidenceWeights, ScoreResult};
pub use components::{liquidity_availability, market_composition, volume_profile_clarity};
pub use delta::{DeltaReading, THIN_BAR_VOLUME, compute_delta};
pub use dom_quality::{
    DomQualityConfig, DomQualitySnapshot, DomQualityTracker, DomStrength, compute_dom_strength,
    structure_hash,
};
pub use tpo::{TpoAcceptance, TpoInputs, compute_tpo_acceptance};
