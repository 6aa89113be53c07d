//! Renormalization of the confidence score over available sub-metrics

use amt_confidence::{ConfidenceAttribute, ConfidenceWeights, compute_delta};
use approx::assert_abs_diff_eq;

fn five_equal_weights() -> ConfidenceWeights {
    ConfidenceWeights {
        dom: 0.2,
        delta: 0.2,
        profile: 0.2,
        tpo: 0.2,
        liquidity: 0.2,
        composition: 0.0,
    }
}

fn five_at_one() -> ConfidenceAttribute {
    let mut conf = ConfidenceAttribute::new();
    conf.dom_strength.set(1.0);
    conf.delta_strength.set(1.0);
    conf.volume_profile_clarity.set(1.0);
    conf.tpo_acceptance.set(1.0);
    conf.liquidity_availability.set(1.0);
    conf
}

#[test]
fn test_all_valid_scores_one() {
    let _ = env_logger::try_init();
    let score = five_at_one().calculate_score(&five_equal_weights());
    assert!(score.is_valid());
    assert_abs_diff_eq!(score.score().unwrap(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_one_invalid_renormalizes() {
    let mut conf = five_at_one();
    conf.liquidity_availability.invalidate();
    let score = conf.calculate_score(&five_equal_weights());
    assert!(score.is_valid());
    assert_abs_diff_eq!(score.score().unwrap(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_all_invalid_has_no_score() {
    let mut conf = five_at_one();
    conf.dom_strength.invalidate();
    conf.delta_strength.invalidate();
    conf.volume_profile_clarity.invalidate();
    conf.tpo_acceptance.invalidate();
    conf.liquidity_availability.invalidate();
    let score = conf.calculate_score(&five_equal_weights());
    assert!(!score.is_valid());
    assert!(score.score().is_none());
}

#[test]
fn test_mixed_values_ignore_missing_weight() {
    let weights = ConfidenceWeights::default();
    let mut conf = ConfidenceAttribute::new();
    conf.dom_strength.set(0.7);
    conf.delta_strength.set(0.7);
    conf.volume_profile_clarity.set(0.7);
    conf.liquidity_availability.set(0.7);
    // Would pull the score to 0 if counted as zero
    conf.tpo_acceptance.invalidate();

    let score = conf.calculate_score(&weights);
    assert_abs_diff_eq!(score.score().unwrap(), 0.7, epsilon = 1e-12);
}

#[test]
fn test_thin_bar_delta_leaves_score_to_others() {
    let reading = compute_delta(2.0, 1.0, 20.0);
    let mut conf = ConfidenceAttribute::new();
    conf.delta_consistency = reading.consistency;
    conf.delta_strength = reading.strength;
    conf.dom_strength.set(0.4);

    let score = conf.calculate_score(&ConfidenceWeights::default());
    assert_abs_diff_eq!(score.score().unwrap(), 0.4, epsilon = 1e-12);
}

#[test]
fn test_invalid_score_serializes_as_null() {
    let conf = ConfidenceAttribute::new();
    let json = serde_json::to_value(conf.calculate_score(&ConfidenceWeights::default())).unwrap();
    assert!(json["score"].is_null());
}
