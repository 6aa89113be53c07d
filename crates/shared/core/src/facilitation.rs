//! Auction facilitation states
//!
//! How easily the auction is moving price relative to the effort spent.

use serde::{Deserialize, Serialize};

/// Facilitation classification of a bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilitationState {
    /// Baselines not ready, no classification possible
    #[default]
    Unknown,
    /// Effort and progress in proportion
    Efficient,
    /// Low effort, large movement (thin market)
    Inefficient,
    /// High effort, little movement (absorption)
    Labored,
    /// Very low effort and very low movement (stalled auction)
    Failed,
}

impl FacilitationState {
    /// Danger states are confirmed on the first bar they are observed.
    /// `Unknown` is neither danger nor calm.
    pub fn is_danger(&self) -> bool {
        matches!(
            self,
            FacilitationState::Inefficient | FacilitationState::Labored | FacilitationState::Failed
        )
    }

    /// Calm states need sustained evidence before they are confirmed
    pub fn is_calm(&self) -> bool {
        matches!(self, FacilitationState::Efficient)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FacilitationState::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FacilitationState::Unknown => "UNKNOWN",
            FacilitationState::Efficient => "EFFICIENT",
            FacilitationState::Inefficient => "INEFFICIENT",
            FacilitationState::Labored => "LABORED",
            FacilitationState::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for FacilitationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A confirmed change of facilitation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitationTransition {
    /// Previously confirmed state
    pub from: FacilitationState,
    /// Newly confirmed state
    pub to: FacilitationState,
    /// Bar index at which the change was confirmed
    pub bar: i64,
}

impl FacilitationTransition {
    /// Calm or unknown into danger
    pub fn is_deteriorating(&self) -> bool {
        !self.from.is_danger() && self.to.is_danger()
    }

    /// Danger into calm
    pub fn is_recovering(&self) -> bool {
        self.from.is_danger() && self.to.is_calm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_partition() {
        assert!(!FacilitationState::Unknown.is_danger());
        assert!(!FacilitationState::Efficient.is_danger());
        assert!(FacilitationState::Inefficient.is_danger());
        assert!(FacilitationState::Labored.is_danger());
        assert!(FacilitationState::Failed.is_danger());
        assert!(!FacilitationState::Unknown.is_calm());
        assert!(FacilitationState::Efficient.is_calm());
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(FacilitationState::default(), FacilitationState::Unknown);
    }

    #[test]
    fn test_transition_direction() {
        let worse = FacilitationTransition {
            from: FacilitationState::Efficient,
            to: FacilitationState::Labored,
            bar: 3,
        };
        assert!(worse.is_deteriorating());
        assert!(!worse.is_recovering());

        let better = FacilitationTransition {
            from: FacilitationState::Failed,
            to: FacilitationState::Efficient,
            bar: 9,
        };
        assert!(better.is_recovering());
        assert!(!better.is_deteriorating());
    }
}
