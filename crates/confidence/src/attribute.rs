//! Confidence attribute and score

use amt_core::Metric;
use serde::{Deserialize, Serialize};

/// Weight of each sub-metric in the confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub dom: f64,
    pub delta: f64,
    pub profile: f64,
    pub tpo: f64,
    pub liquidity: f64,
    /// Market composition (average trade size)
    pub composition: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            dom: 0.35,
            delta: 0.25,
            profile: 0.20,
            tpo: 0.10,
            liquidity: 0.10,
            composition: 0.10,
        }
    }
}

impl ConfidenceWeights {
    /// Same weight for every sub-metric
    pub fn uniform(weight: f64) -> Self {
        Self {
            dom: weight,
            delta: weight,
            profile: weight,
            tpo: weight,
            liquidity: weight,
            composition: weight,
        }
    }

    /// All weights finite and non-negative
    pub fn is_valid(&self) -> bool {
        [
            self.dom,
            self.delta,
            self.profile,
            self.tpo,
            self.liquidity,
            self.composition,
        ]
        .iter()
        .all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// Renormalized confidence score, `None` when no sub-metric was available
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    score: Option<f64>,
}

impl ScoreResult {
    pub fn invalid() -> Self {
        Self { score: None }
    }

    #[inline]
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.score.is_some()
    }
}

/// Independently sourced sub-metrics feeding the confidence score
///
/// Every field starts unavailable. `delta_consistency` is a fraction
/// (0.5 = balanced); every other field is a magnitude in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAttribute {
    pub dom_strength: Metric,
    pub tpo_acceptance: Metric,
    pub volume_profile_clarity: Metric,
    /// Aggressor buy fraction; used for side checks, not for scoring
    pub delta_consistency: Metric,
    /// Direction-free delta magnitude; this is what gets scored
    pub delta_strength: Metric,
    pub liquidity_availability: Metric,
    pub market_composition: Metric,
}

impl Default for ConfidenceAttribute {
    fn default() -> Self {
        Self {
            dom_strength: Metric::magnitude(),
            tpo_acceptance: Metric::magnitude(),
            volume_profile_clarity: Metric::magnitude(),
            delta_consistency: Metric::fraction(),
            delta_strength: Metric::magnitude(),
            liquidity_availability: Metric::magnitude(),
            market_composition: Metric::magnitude(),
        }
    }
}

impl ConfidenceAttribute {
    pub fn new() -> Self {
        Self::default()
    }

    /// (metric, weight) pairs that take part in scoring
    fn scored(&self, w: &ConfidenceWeights) -> [(Metric, f64); 6] {
        [
            (self.dom_strength, w.dom),
            (self.volume_profile_clarity, w.profile),
            (self.tpo_acceptance, w.tpo),
            (self.delta_strength, w.delta),
            (self.liquidity_availability, w.liquidity),
            (self.market_composition, w.composition),
        ]
    }

    /// Weighted mean over the available sub-metrics only.
    ///
    /// Unavailable metrics contribute to neither the numerator nor the
    /// denominator. With nothing available (or only zero weights) the
    /// result is invalid.
    pub fn calculate_score(&self, weights: &ConfidenceWeights) -> ScoreResult {
        let (weighted, total_weight) = self
            .scored(weights)
            .iter()
            .filter_map(|(metric, weight)| metric.get().map(|v| (v * weight, *weight)))
            .fold((0.0, 0.0), |(s, t), (v, w)| (s + v, t + w));

        if total_weight > 0.0 {
            ScoreResult {
                score: Some(weighted / total_weight),
            }
        } else {
            ScoreResult::invalid()
        }
    }

    /// Number of sub-metrics currently available (consistency included)
    pub fn valid_count(&self) -> usize {
        [
            self.dom_strength,
            self.tpo_acceptance,
            self.volume_profile_clarity,
            self.delta_consistency,
            self.delta_strength,
            self.liquidity_availability,
            self.market_composition,
        ]
        .iter()
        .filter(|m| m.is_valid())
        .count()
    }
}
