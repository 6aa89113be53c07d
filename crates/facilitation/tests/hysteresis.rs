//! Asymmetric hysteresis of the facilitation tracker

use amt_facilitation::{FacilitationState::*, FacilitationTracker};

fn tracker() -> FacilitationTracker {
    let _ = env_logger::try_init();
    FacilitationTracker::new()
}

#[test]
fn test_basic_persistence() {
    let mut t = tracker();
    assert_eq!(t.confirmed_state(), Unknown);
    assert!(!t.is_ready());

    t.update(Efficient, 0);
    assert_eq!(t.confirmed_state(), Efficient);
    assert_eq!(t.bars_in_confirmed(), 1);
    assert!(t.is_ready());

    t.update(Efficient, 1);
    assert_eq!(t.bars_in_confirmed(), 2);
}

#[test]
fn test_danger_enters_on_first_bar() {
    let mut t = tracker();
    t.update(Efficient, 0);
    t.update(Efficient, 1);

    t.update(Labored, 2);
    assert_eq!(t.confirmed_state(), Labored);
    assert_eq!(t.bars_in_confirmed(), 1);
    assert!(t.just_changed());
    assert_eq!(t.prior_confirmed_state(), Efficient);
    assert_eq!(t.last_transition_bar(), Some(2));
}

#[test]
fn test_calm_needs_two_bars() {
    let mut t = tracker();
    t.update(Labored, 0);

    t.update(Efficient, 1);
    assert_eq!(t.confirmed_state(), Labored);
    assert_eq!(t.candidate_state(), Efficient);
    assert_eq!(t.bars_in_candidate(), 1);
    assert!(!t.just_changed());

    t.update(Efficient, 2);
    assert_eq!(t.confirmed_state(), Efficient);
    assert!(t.just_changed());
}

#[test]
fn test_failed_enters_fast() {
    let mut t = tracker();
    t.update(Efficient, 0);
    t.update(Efficient, 1);
    t.update(Failed, 2);
    assert_eq!(t.confirmed_state(), Failed);
}

#[test]
fn test_inefficient_enters_fast() {
    let mut t = tracker();
    t.update(Efficient, 0);
    t.update(Inefficient, 1);
    assert_eq!(t.confirmed_state(), Inefficient);
}

#[test]
fn test_persistence_counting() {
    let mut t = tracker();
    for bar in 0..10 {
        t.update(Labored, bar);
    }
    assert_eq!(t.bars_in_confirmed(), 10);
    assert!(t.is_labored_persistent());
    assert!(t.is_persistent(5));
    assert!(t.is_persistent(10));
    assert!(!t.is_persistent(11));
}

#[test]
fn test_just_entered_and_exited() {
    let mut t = tracker();
    t.update(Efficient, 0);
    t.update(Efficient, 1);

    t.update(Labored, 2);
    assert!(t.just_entered(Labored));
    assert!(t.just_exited(Efficient));
    assert!(!t.just_entered(Efficient));

    t.update(Labored, 3);
    assert!(!t.just_changed());
    assert!(!t.just_entered(Labored));
}

#[test]
fn test_danger_state_helper() {
    let mut t = tracker();
    t.update(Efficient, 0);
    assert!(!t.is_danger_state());
    t.update(Labored, 1);
    assert!(t.is_danger_state());
    t.update(Failed, 2);
    assert!(t.is_danger_state());
    t.update(Inefficient, 3);
    assert!(t.is_danger_state());
}

#[test]
fn test_state_label_with_persistence() {
    let mut t = tracker();
    for bar in 0..5 {
        t.update(Labored, bar);
    }
    assert_eq!(t.state_label(), "LABORED(5)");
}

#[test]
fn test_unknown_propagates_immediately() {
    let mut t = tracker();
    t.update(Labored, 0);
    t.update(Labored, 1);
    t.update(Labored, 2);
    assert_eq!(t.bars_in_confirmed(), 3);

    t.update(Unknown, 3);
    assert_eq!(t.confirmed_state(), Unknown);
    assert_eq!(t.bars_in_confirmed(), 0);
    assert!(!t.is_ready());
    assert!(t.just_changed());
}

#[test]
fn test_reset_clears_everything() {
    let mut t = tracker();
    t.update(Labored, 0);
    t.update(Labored, 1);
    t.record_percentiles(Some(80.0), Some(20.0));

    t.reset();
    assert_eq!(t.confirmed_state(), Unknown);
    assert_eq!(t.candidate_state(), Unknown);
    assert_eq!(t.bars_in_confirmed(), 0);
    assert_eq!(t.bars_in_candidate(), 0);
    assert!(!t.just_changed());
    assert_eq!(t.last_transition_bar(), None);
    assert_eq!(t.last_vol_percentile(), None);
    assert_eq!(t.last_range_percentile(), None);
}

#[test]
fn test_candidate_flip_flop_does_not_confirm_calm() {
    let mut t = tracker();
    t.update(Labored, 0);

    t.update(Efficient, 1);
    assert_eq!(t.confirmed_state(), Labored);

    t.update(Failed, 2);
    assert_eq!(t.confirmed_state(), Failed);

    t.update(Efficient, 3);
    assert_eq!(t.confirmed_state(), Failed);

    t.update(Labored, 4);
    assert_eq!(t.confirmed_state(), Labored);
}
