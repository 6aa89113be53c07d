//! Facilitation Tracker
//!
//! Debounces the per-bar classification into a confirmed state.
//!
//! Hysteresis is asymmetric: a danger state is confirmed on the first bar it
//! is seen, a calm state only after two consecutive bars. `Unknown` always
//! propagates at once.

use amt_core::{FacilitationState, FacilitationTransition};
use log::debug;
use serde::{Deserialize, Serialize};

/// Consecutive bars a calm candidate needs before promotion
pub const CALM_CONFIRMATION_BARS: u32 = 2;

/// Bars in LABORED before it counts as persistent absorption
pub const LABORED_PERSISTENCE_BARS: u32 = 5;

/// Confirmed and candidate facilitation state with dwell counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilitationTracker {
    confirmed: FacilitationState,
    candidate: FacilitationState,
    prior_confirmed: FacilitationState,
    bars_in_confirmed: u32,
    bars_in_candidate: u32,
    just_changed: bool,
    last_transition_bar: Option<i64>,
    last_vol_pct: Option<f64>,
    last_range_pct: Option<f64>,
}

impl FacilitationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the initial unknown state. Idempotent.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feed one bar's classification.
    ///
    /// Returns the transition when the confirmed state changed on this bar.
    /// Observing the confirmed state again drops any pending calm candidate,
    /// so a calm state is only promoted after consecutive bars.
    pub fn update(
        &mut self,
        observed: FacilitationState,
        bar: i64,
    ) -> Option<FacilitationTransition> {
        if observed == FacilitationState::Unknown {
            self.clear_candidate();
            self.bars_in_confirmed = 0;
            if self.confirmed == FacilitationState::Unknown {
                self.just_changed = false;
                return None;
            }
            return Some(self.confirm(FacilitationState::Unknown, 0, bar));
        }

        if observed == self.confirmed {
            self.bars_in_confirmed += 1;
            // Candidate must be consecutive
            self.clear_candidate();
            self.just_changed = false;
            return None;
        }

        if observed.is_danger() || self.confirmed == FacilitationState::Unknown {
            self.clear_candidate();
            return Some(self.confirm(observed, 1, bar));
        }

        if self.candidate == observed {
            self.bars_in_candidate += 1;
        } else {
            self.candidate = observed;
            self.bars_in_candidate = 1;
        }

        if self.bars_in_candidate >= CALM_CONFIRMATION_BARS {
            let dwell = self.bars_in_candidate;
            self.clear_candidate();
            return Some(self.confirm(observed, dwell, bar));
        }

        self.just_changed = false;
        None
    }

    fn confirm(
        &mut self,
        state: FacilitationState,
        dwell: u32,
        bar: i64,
    ) -> FacilitationTransition {
        let transition = FacilitationTransition {
            from: self.confirmed,
            to: state,
            bar,
        };
        debug!(
            "[FACILITATION] {} -> {} at bar {}",
            transition.from, transition.to, bar
        );
        self.prior_confirmed = self.confirmed;
        self.confirmed = state;
        self.bars_in_confirmed = dwell;
        self.just_changed = true;
        self.last_transition_bar = Some(bar);
        transition
    }

    fn clear_candidate(&mut self) {
        self.candidate = FacilitationState::Unknown;
        self.bars_in_candidate = 0;
    }

    /// Keep the percentiles behind the latest classification for diagnostics
    pub fn record_percentiles(&mut self, vol_pct: Option<f64>, range_pct: Option<f64>) {
        self.last_vol_pct = vol_pct;
        self.last_range_pct = range_pct;
    }

    pub fn confirmed_state(&self) -> FacilitationState {
        self.confirmed
    }

    pub fn candidate_state(&self) -> FacilitationState {
        self.candidate
    }

    pub fn prior_confirmed_state(&self) -> FacilitationState {
        self.prior_confirmed
    }

    pub fn bars_in_confirmed(&self) -> u32 {
        self.bars_in_confirmed
    }

    pub fn bars_in_candidate(&self) -> u32 {
        self.bars_in_candidate
    }

    pub fn last_transition_bar(&self) -> Option<i64> {
        self.last_transition_bar
    }

    pub fn last_vol_percentile(&self) -> Option<f64> {
        self.last_vol_pct
    }

    pub fn last_range_percentile(&self) -> Option<f64> {
        self.last_range_pct
    }

    /// A known state has been confirmed
    pub fn is_ready(&self) -> bool {
        self.confirmed.is_known()
    }

    pub fn is_persistent(&self, min_bars: u32) -> bool {
        self.bars_in_confirmed >= min_bars
    }

    pub fn is_labored_persistent(&self) -> bool {
        self.confirmed == FacilitationState::Labored
            && self.is_persistent(LABORED_PERSISTENCE_BARS)
    }

    pub fn is_danger_state(&self) -> bool {
        self.confirmed.is_danger()
    }

    /// True only on the bar the confirmed state changed
    pub fn just_changed(&self) -> bool {
        self.just_changed
    }

    pub fn just_entered(&self, state: FacilitationState) -> bool {
        self.just_changed && self.confirmed == state
    }

    pub fn just_exited(&self, state: FacilitationState) -> bool {
        self.just_changed && self.prior_confirmed == state
    }

    /// The transition confirmed on the latest bar, if any
    pub fn transition(&self) -> Option<FacilitationTransition> {
        match (self.just_changed, self.last_transition_bar) {
            (true, Some(bar)) => Some(FacilitationTransition {
                from: self.prior_confirmed,
                to: self.confirmed,
                bar,
            }),
            _ => None,
        }
    }

    /// Confirmed state with its persistence, e.g. `LABORED(5)`
    pub fn state_label(&self) -> String {
        format!("{}({})", self.confirmed.label(), self.bars_in_confirmed)
    }
}
