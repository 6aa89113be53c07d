//! Order-book quality: structure hashing, staleness and DOM strength

use amt_core::Metric;
use amt_stats::clamp01;
use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 14_695_981_039_346_656_037;
const FNV_PRIME: u64 = 1_099_511_628_211;

const W_COVERAGE: f64 = 0.4;
const W_FRESHNESS: f64 = 0.4;
const W_SANITY: f64 = 0.2;

/// Coverage multiplier when only one side of the book has levels
const ONE_SIDED_PENALTY: f64 = 0.3;
/// Widest spread still considered sane, in ticks
const MAX_SANE_SPREAD_TICKS: f64 = 100.0;

/// FNV-1a hash over the coarse book structure.
///
/// Prices are hashed at two-decimal precision.
pub fn structure_hash(
    bid_levels: u32,
    ask_levels: u32,
    best_bid: f64,
    best_ask: f64,
    bid_non_zero: u32,
    ask_non_zero: u32,
) -> u64 {
    [
        u64::from(bid_levels),
        u64::from(ask_levels),
        (best_bid * 100.0) as u64,
        (best_ask * 100.0) as u64,
        u64::from(bid_non_zero),
        u64::from(ask_non_zero),
    ]
    .iter()
    .fold(FNV_OFFSET, |hash, v| (hash ^ v).wrapping_mul(FNV_PRIME))
}

/// Coarse view of the order book for one bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomQualitySnapshot {
    pub bid_levels: u32,
    pub ask_levels: u32,
    pub bid_non_zero: u32,
    pub ask_non_zero: u32,
    pub best_bid: f64,
    pub best_ask: f64,
    pub structure_hash: u64,
}

impl DomQualitySnapshot {
    pub fn new(
        bid_levels: u32,
        ask_levels: u32,
        bid_non_zero: u32,
        ask_non_zero: u32,
        best_bid: f64,
        best_ask: f64,
    ) -> Self {
        Self {
            bid_levels,
            ask_levels,
            bid_non_zero,
            ask_non_zero,
            best_bid,
            best_ask,
            structure_hash: structure_hash(
                bid_levels,
                ask_levels,
                best_bid,
                best_ask,
                bid_non_zero,
                ask_non_zero,
            ),
        }
    }

    pub fn has_bid_levels(&self) -> bool {
        self.bid_levels > 0
    }

    pub fn has_ask_levels(&self) -> bool {
        self.ask_levels > 0
    }

    pub fn has_any_levels(&self) -> bool {
        self.has_bid_levels() || self.has_ask_levels()
    }

    pub fn has_both_sides(&self) -> bool {
        self.has_bid_levels() && self.has_ask_levels()
    }

    /// Both sides present, positive prices, not crossed, not absurdly wide
    pub fn has_valid_spread(&self, tick_size: f64) -> bool {
        if !self.has_both_sides() || self.best_bid <= 0.0 || self.best_ask <= 0.0 {
            return false;
        }
        let spread = self.best_ask - self.best_bid;
        spread > 0.0 && spread <= tick_size * MAX_SANE_SPREAD_TICKS
    }

    /// Spread in ticks, when the spread is sane
    pub fn spread_ticks(&self, tick_size: f64) -> Option<f64> {
        self.has_valid_spread(tick_size)
            .then(|| (self.best_ask - self.best_bid) / tick_size)
    }
}

/// Staleness thresholds for [`DomQualityTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomQualityConfig {
    /// Stale after this many bars without a structure change
    pub max_stale_bars_hard: i64,
    /// Expected structure changes per bar; 3 / cadence gives the soft limit
    pub adaptive_expected_cadence: f64,
    /// Stale once the last change is older than this
    pub stale_threshold_ms: i64,
}

impl Default for DomQualityConfig {
    fn default() -> Self {
        Self {
            max_stale_bars_hard: 10,
            adaptive_expected_cadence: 0.2,
            stale_threshold_ms: 2000,
        }
    }
}

impl DomQualityConfig {
    /// Soft staleness limit in bars, `None` when cadence is disabled
    pub fn adaptive_threshold(&self) -> Option<i64> {
        (self.adaptive_expected_cadence > 0.0)
            .then(|| (3.0 / self.adaptive_expected_cadence) as i64)
    }
}

/// Detects a frozen order book by watching its structure hash
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomQualityTracker {
    config: DomQualityConfig,
    last_hash: Option<u64>,
    last_change_bar: Option<i64>,
    bars_since_change: i64,
    stale_by_bars: bool,
    last_change_ms: Option<i64>,
    age_ms: Option<i64>,
    stale_by_ms: bool,
}

impl DomQualityTracker {
    pub fn new(config: DomQualityConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Observe this bar's book; returns true when the structure changed.
    ///
    /// `now_ms` is optional; without it only bar staleness is tracked.
    pub fn update(&mut self, snap: &DomQualitySnapshot, bar: i64, now_ms: Option<i64>) -> bool {
        let changed = self.last_hash != Some(snap.structure_hash);

        if let Some(now) = now_ms {
            if changed {
                self.last_change_ms = Some(now);
                self.age_ms = Some(0);
                self.stale_by_ms = false;
            } else if let Some(last) = self.last_change_ms {
                let age = now - last;
                self.age_ms = Some(age);
                self.stale_by_ms = age > self.config.stale_threshold_ms;
            }
        }

        if changed {
            self.last_hash = Some(snap.structure_hash);
            self.last_change_bar = Some(bar);
            self.bars_since_change = 0;
            self.stale_by_bars = false;
        } else if let Some(last) = self.last_change_bar {
            self.bars_since_change = bar - last;
            let soft = self.config.adaptive_threshold();
            if self.bars_since_change >= self.config.max_stale_bars_hard
                || soft.is_some_and(|t| self.bars_since_change >= t)
            {
                self.stale_by_bars = true;
            }
        }

        changed
    }

    pub fn is_stale(&self) -> bool {
        self.stale_by_bars || self.stale_by_ms
    }

    pub fn is_stale_by_bars(&self) -> bool {
        self.stale_by_bars
    }

    pub fn is_stale_by_ms(&self) -> bool {
        self.stale_by_ms
    }

    pub fn bars_since_change(&self) -> i64 {
        self.bars_since_change
    }

    /// Milliseconds since the last change, when timing has been supplied
    pub fn age_ms(&self) -> Option<i64> {
        self.age_ms
    }

    /// Freshness in [0, 1], decaying linearly to 0 at the hard bar limit.
    ///
    /// Unavailable until the first structure change has been observed.
    pub fn freshness(&self) -> Option<f64> {
        self.last_change_bar?;
        if self.is_stale() {
            return Some(0.0);
        }
        let limit = self.config.max_stale_bars_hard.max(1) as f64;
        Some((1.0 - self.bars_since_change as f64 / limit).max(0.0))
    }
}

/// DOM strength with its components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomStrength {
    pub coverage: f64,
    pub freshness: Option<f64>,
    pub sanity: f64,
    pub score: f64,
}

impl DomStrength {
    /// The score as a confidence sub-metric
    pub fn metric(&self) -> Metric {
        let mut m = Metric::magnitude();
        m.set(self.score);
        m
    }
}

/// Blend coverage, freshness and spread sanity into a DOM strength score.
///
/// Freshness joins the blend only once the tracker has book history; the
/// weights are renormalized over what is present.
pub fn compute_dom_strength(
    snap: &DomQualitySnapshot,
    tracker: &DomQualityTracker,
    expected_levels_per_side: u32,
    tick_size: f64,
) -> DomStrength {
    let expected_total = expected_levels_per_side * 2;
    let mut coverage = if expected_total > 0 {
        f64::from(snap.bid_non_zero + snap.ask_non_zero) / f64::from(expected_total)
    } else {
        0.0
    };
    if !snap.has_both_sides() {
        coverage *= ONE_SIDED_PENALTY;
    }
    let coverage = clamp01(coverage);

    let freshness = tracker.freshness();
    let sanity = if snap.has_valid_spread(tick_size) { 1.0 } else { 0.0 };

    let mut score = W_COVERAGE * coverage + W_SANITY * sanity;
    let mut total = W_COVERAGE + W_SANITY;
    if let Some(f) = freshness {
        score += W_FRESHNESS * f;
        total += W_FRESHNESS;
    }

    DomStrength {
        coverage,
        freshness,
        sanity,
        score: clamp01(score / total),
    }
}
