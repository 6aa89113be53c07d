//! AMT Engine
//!
//! Per-instrument session orchestration. The engine owns the long-lived
//! baseline stores and the facilitation tracker and runs one synchronous
//! cycle per bar.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   BarInput    ┌──────────────────────────────────────┐
//! │     Host     │ ────────────► │            AuctionEngine             │
//! │ (bars, DOM,  │               │                                      │
//! │  profile)    │ ◄──────────── │  phase change ─► close_phase()       │
//! └──────────────┘ EngineSnapshot│  → Globex     ─► session_boundary()  │
//!                                │                                      │
//!                                │  query baselines ─► ConfidenceAttr.  │
//!                                │  classify ─► FacilitationTracker     │
//!                                │  push bar ─► Effort / DOM / Profile  │
//!                                └──────────────────────────────────────┘
//! ```
//!
//! Baselines persist across sessions. What happens to per-session state at
//! the day boundary is set by [`SessionBoundaryPolicy`].

pub mod config;
pub mod engine;
pub mod error;

pub use config::{EngineConfig, SessionBoundaryPolicy};
pub use engine::{AuctionEngine, BarInput, DepthInput, EngineSnapshot, ProfileInput};
pub use error::{EngineError, Result};
