//! Auction Engine
//!
//! Owns one instance of every baseline store and the facilitation tracker
//! for a single instrument and runs one classification cycle per bar.
//!
//! Per bar:
//! 1. Reject out-of-order bars.
//! 2. Resolve the phase. A phase change closes out the phase just left;
//!    entering Globex from any other phase starts a new trading day.
//! 3. Query baselines against prior history, score, classify, track.
//! 4. Push this bar into the baselines.

use amt_baseline::{
    DomBaselineStore, EffortBaselineStore, EffortMetric, EffortSample, HistoricalProfileBaseline,
    PhaseBaseline, ProfileFeatureSnapshot, ProfileProgress, SessionDeltaBaseline,
    check_profile_maturity,
};
use amt_confidence::{
    ConfidenceAttribute, DomQualitySnapshot, DomQualityTracker, ScoreResult, TpoAcceptance,
    TpoInputs, compute_delta, compute_dom_strength, compute_tpo_acceptance,
    liquidity_availability, market_composition, volume_profile_clarity,
};
use amt_core::{
    FacilitationState, FacilitationTransition, PROGRESS_BUCKET_COUNT, ProgressBucket,
    SessionPhase,
};
use amt_facilitation::{FacilitationClassifier, FacilitationTracker, PercentileClassifier};
use chrono::NaiveTime;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, SessionBoundaryPolicy};
use crate::error::{EngineError, Result};

/// Depth-of-book aggregates for one bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthInput {
    /// Historical bars usually have no book data
    pub available: bool,
    pub stack_rate: f64,
    pub pull_rate: f64,
    pub depth_mass: f64,
    pub bid_levels: u32,
    pub ask_levels: u32,
    pub bid_non_zero: u32,
    pub ask_non_zero: u32,
    pub best_bid: f64,
    pub best_ask: f64,
}

/// Developing session profile as of this bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub minutes_into_session: i64,
    pub tpo: TpoInputs,
    pub session_high: f64,
    pub session_low: f64,
    /// Volume at the VBP POC, when known
    pub poc_volume: Option<f64>,
    pub total_volume: f64,
    pub price_levels: usize,
}

impl ProfileInput {
    /// TPO value-area width in ticks, unrounded
    pub fn va_width_ticks(&self, tick_size: f64) -> f64 {
        (self.tpo.tpo_vah - self.tpo.tpo_val) / tick_size
    }
}

/// One bar from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarInput {
    pub bar_index: i64,
    /// Explicit phase; derived from `time` when absent
    pub phase: Option<SessionPhase>,
    /// Bar start, exchange local time
    pub time: NaiveTime,
    pub duration_secs: f64,
    pub ask_volume: f64,
    pub bid_volume: f64,
    pub trades: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub depth: DepthInput,
    pub profile: Option<ProfileInput>,
    /// Wall clock in ms for sub-second DOM staleness
    pub timestamp_ms: Option<i64>,
}

/// Everything the host needs after one bar. Unavailable values are `None`
/// and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub bar_index: i64,
    pub phase: SessionPhase,
    pub dom_strength: Option<f64>,
    pub tpo_acceptance: Option<f64>,
    pub volume_profile_clarity: Option<f64>,
    pub delta_consistency: Option<f64>,
    pub delta_strength: Option<f64>,
    pub liquidity_availability: Option<f64>,
    pub market_composition: Option<f64>,
    pub score: Option<f64>,
    /// |phase delta so far| against prior sessions of this phase
    pub session_delta_percentile: Option<f64>,
    pub vol_percentile: Option<f64>,
    pub range_percentile: Option<f64>,
    /// Raw classification of this bar
    pub classified: FacilitationState,
    /// Debounced state
    pub facilitation: FacilitationState,
    pub facilitation_label: String,
    pub bars_in_state: u32,
    pub state_just_changed: bool,
    pub transition: Option<FacilitationTransition>,
    pub profile_mature: Option<bool>,
    pub dom_stale: bool,
}

impl EngineSnapshot {
    fn new(
        bar_index: i64,
        phase: SessionPhase,
        conf: &ConfidenceAttribute,
        score: ScoreResult,
    ) -> Self {
        Self {
            bar_index,
            phase,
            dom_strength: conf.dom_strength.get(),
            tpo_acceptance: conf.tpo_acceptance.get(),
            volume_profile_clarity: conf.volume_profile_clarity.get(),
            delta_consistency: conf.delta_consistency.get(),
            delta_strength: conf.delta_strength.get(),
            liquidity_availability: conf.liquidity_availability.get(),
            market_composition: conf.market_composition.get(),
            score: score.score(),
            session_delta_percentile: None,
            vol_percentile: None,
            range_percentile: None,
            classified: FacilitationState::Unknown,
            facilitation: FacilitationState::Unknown,
            facilitation_label: String::new(),
            bars_in_state: 0,
            state_just_changed: false,
            transition: None,
            profile_mature: None,
            dom_stale: false,
        }
    }
}

/// Running totals for the phase currently in progress
#[derive(Debug, Clone, Copy, Default)]
struct PhaseAccumulator {
    cum_delta: f64,
    volume: f64,
    bars: usize,
}

impl PhaseAccumulator {
    fn delta_ratio(&self) -> Option<f64> {
        (self.volume > 0.0).then(|| self.cum_delta / self.volume)
    }
}

/// Per-instrument orchestrator
pub struct AuctionEngine {
    config: EngineConfig,
    effort: EffortBaselineStore,
    session_delta: SessionDeltaBaseline,
    dom: DomBaselineStore,
    profile: HistoricalProfileBaseline,
    dom_quality: DomQualityTracker,
    tracker: FacilitationTracker,
    classifier: Box<dyn FacilitationClassifier>,
    last_bar: Option<i64>,
    phase: Option<SessionPhase>,
    phase_acc: PhaseAccumulator,
    prev_close: Option<f64>,
    session_bars: usize,
    captured: [bool; PROGRESS_BUCKET_COUNT],
    last_profile: Option<ProfileFeatureSnapshot>,
    sessions_completed: usize,
}

impl AuctionEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let mut effort = EffortBaselineStore::new(config.effort_window);
        let mut session_delta = SessionDeltaBaseline::new(config.session_delta_window);
        let mut dom = DomBaselineStore::new(config.dom_window);
        effort.set_expected_bars_per_session(config.bar_interval_secs);
        session_delta.set_expected_bars_per_session(config.bar_interval_secs);
        dom.set_expected_bars_per_session(config.bar_interval_secs);

        info!(
            "[ENGINE] Initialized: bar={}s tick={} policy={:?}",
            config.bar_interval_secs, config.tick_size, config.session_boundary
        );

        Ok(Self {
            effort,
            session_delta,
            dom,
            profile: HistoricalProfileBaseline::new(config.profile_window),
            dom_quality: DomQualityTracker::new(config.dom_quality),
            tracker: FacilitationTracker::new(),
            classifier: Box::new(PercentileClassifier::new(config.facilitation)),
            last_bar: None,
            phase: None,
            phase_acc: PhaseAccumulator::default(),
            prev_close: None,
            session_bars: 0,
            captured: [false; PROGRESS_BUCKET_COUNT],
            last_profile: None,
            sessions_completed: 0,
            config,
        })
    }

    /// Replace the facilitation classifier
    pub fn with_classifier(mut self, classifier: Box<dyn FacilitationClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn effort(&self) -> &EffortBaselineStore {
        &self.effort
    }

    pub fn session_delta(&self) -> &SessionDeltaBaseline {
        &self.session_delta
    }

    pub fn dom(&self) -> &DomBaselineStore {
        &self.dom
    }

    pub fn profile(&self) -> &HistoricalProfileBaseline {
        &self.profile
    }

    pub fn tracker(&self) -> &FacilitationTracker {
        &self.tracker
    }

    pub fn dom_quality(&self) -> &DomQualityTracker {
        &self.dom_quality
    }

    pub fn current_phase(&self) -> Option<SessionPhase> {
        self.phase
    }

    pub fn sessions_completed(&self) -> usize {
        self.sessions_completed
    }

    /// Run one cycle. Bars must arrive in non-decreasing index order; an
    /// earlier index is rejected and leaves the engine untouched.
    pub fn process_bar(&mut self, bar: &BarInput) -> Result<EngineSnapshot> {
        if let Some(last) = self.last_bar {
            if bar.bar_index < last {
                warn!("[ENGINE] Rejected bar {} after {}", bar.bar_index, last);
                return Err(EngineError::OutOfOrderBar {
                    last,
                    got: bar.bar_index,
                });
            }
        }

        let phase = bar.phase.unwrap_or_else(|| {
            SessionPhase::from_time(bar.time, self.config.rth_start_sec, self.config.rth_end_sec)
        });
        self.enter_phase(phase);

        let tick = self.config.tick_size;
        let volume = bar.ask_volume + bar.bid_volume;
        let range_ticks = (bar.high - bar.low) / tick;
        let vol_sec = (bar.duration_secs > 0.0).then(|| volume / bar.duration_secs);

        // Baselines are queried before this bar is pushed
        let mut conf = ConfidenceAttribute::new();

        let delta = compute_delta(bar.ask_volume, bar.bid_volume, self.config.thin_bar_volume);
        conf.delta_consistency = delta.consistency;
        conf.delta_strength = delta.strength;

        let dom_snapshot = bar.depth.available.then(|| {
            DomQualitySnapshot::new(
                bar.depth.bid_levels,
                bar.depth.ask_levels,
                bar.depth.bid_non_zero,
                bar.depth.ask_non_zero,
                bar.depth.best_bid,
                bar.depth.best_ask,
            )
        });
        if let Some(snap) = &dom_snapshot {
            self.dom_quality
                .update(snap, bar.bar_index, bar.timestamp_ms);
            if snap.has_any_levels() {
                let strength = compute_dom_strength(
                    snap,
                    &self.dom_quality,
                    self.config.expected_dom_levels_per_side,
                    tick,
                );
                conf.dom_strength = strength.metric();
            }
        }
        let depth = bar.depth.available.then_some(bar.depth.depth_mass);
        conf.liquidity_availability = liquidity_availability(&self.dom, phase, depth);
        conf.market_composition = market_composition(&self.effort, phase, volume, bar.trades);

        self.session_bars += 1;
        let mut profile_mature = None;
        if let Some(p) = &bar.profile {
            let tpo = compute_tpo_acceptance(&p.tpo, tick);
            conf.tpo_acceptance = TpoAcceptance::metric(tpo.as_ref());

            let bucket = ProgressBucket::from_minutes(p.minutes_into_session);
            let maturity = check_profile_maturity(
                &ProfileProgress {
                    price_levels: p.price_levels,
                    total_volume: p.total_volume,
                    session_bars: self.session_bars,
                    session_minutes: p.minutes_into_session,
                    bucket,
                },
                Some(&self.profile),
                &self.config.maturity,
            );
            profile_mature = Some(maturity.is_mature);
            if maturity.is_mature && tpo.is_some() {
                conf.volume_profile_clarity =
                    volume_profile_clarity(&self.profile, bucket, p.va_width_ticks(tick));
            }
        }

        let score = conf.calculate_score(&self.config.weights);

        let vol_pct = vol_sec.and_then(|v| self.effort.try_percentile(phase, EffortMetric::VolSec, v));
        let range_pct = self
            .effort
            .try_percentile(phase, EffortMetric::BarRange, range_ticks);
        let classified = self.classifier.classify(vol_pct, range_pct);
        self.tracker.record_percentiles(vol_pct, range_pct);
        if let Some(t) = self.tracker.update(classified, bar.bar_index) {
            info!(
                "[ENGINE] Facilitation {} -> {} at bar {} ({})",
                t.from, t.to, t.bar, phase
            );
        }

        // Push this bar. Non-tradeable phases have no bucket of their own.
        let tradeable = phase.is_tradeable();
        if !tradeable {
            debug!("[ENGINE] Bar {} in {}, baselines not updated", bar.bar_index, phase);
        } else if let Some(vol_sec) = vol_sec {
            let minutes = bar.duration_secs / 60.0;
            let sample = EffortSample {
                vol_sec,
                trades_sec: bar.trades / bar.duration_secs,
                delta_pct: delta.delta_pct.unwrap_or(0.0),
                bar_range_ticks: range_ticks,
                avg_trade_size: (bar.trades > 0.0).then(|| volume / bar.trades),
                abs_close_change_ticks: self.prev_close.map(|c| (bar.close - c).abs() / tick),
                range_velocity: range_ticks / minutes,
            };
            self.effort.push_bar(phase, &sample);
        } else {
            warn!("[ENGINE] Bar {} has no duration, effort not recorded", bar.bar_index);
        }

        if tradeable && bar.depth.available {
            self.dom
                .push(phase, bar.depth.stack_rate, bar.depth.pull_rate, bar.depth.depth_mass);
            if let Some(spread) = dom_snapshot.and_then(|s| s.spread_ticks(tick)) {
                self.dom.push_spread(phase, spread);
            }
        }

        if let Some(p) = &bar.profile {
            self.capture_profile(p);
        }

        if bar.close.is_finite() {
            self.prev_close = Some(bar.close);
        }
        self.phase_acc.volume += volume;
        self.phase_acc.cum_delta += bar.ask_volume - bar.bid_volume;
        self.phase_acc.bars += 1;
        self.last_bar = Some(bar.bar_index);

        let mut snapshot = EngineSnapshot::new(bar.bar_index, phase, &conf, score);
        snapshot.session_delta_percentile = self
            .phase_acc
            .delta_ratio()
            .and_then(|r| self.session_delta.try_percentile(phase, r));
        snapshot.vol_percentile = vol_pct;
        snapshot.range_percentile = range_pct;
        snapshot.classified = classified;
        snapshot.facilitation = self.tracker.confirmed_state();
        snapshot.facilitation_label = self.tracker.state_label();
        snapshot.bars_in_state = self.tracker.bars_in_confirmed();
        snapshot.state_just_changed = self.tracker.just_changed();
        snapshot.transition = self.tracker.transition();
        snapshot.profile_mature = profile_mature;
        snapshot.dom_stale = dom_snapshot.is_some() && self.dom_quality.is_stale();
        Ok(snapshot)
    }

    /// Close the current phase and run the session boundary now
    pub fn end_session(&mut self) {
        if let Some(phase) = self.phase.take() {
            self.close_phase(phase);
        }
        self.session_boundary();
    }

    fn enter_phase(&mut self, phase: SessionPhase) {
        match self.phase {
            Some(prev) if prev == phase => {}
            Some(prev) => {
                self.close_phase(prev);
                debug!("[ENGINE] Phase {} -> {}", prev, phase);
                if phase == SessionPhase::Globex {
                    self.session_boundary();
                }
                self.phase = Some(phase);
            }
            None => self.phase = Some(phase),
        }
    }

    /// One session's worth of history for the phase just left
    fn close_phase(&mut self, phase: SessionPhase) {
        let acc = std::mem::take(&mut self.phase_acc);
        if !phase.is_tradeable() {
            return;
        }
        if let Some(ratio) = acc.delta_ratio() {
            self.session_delta.record_session(phase, ratio);
        }
        if acc.bars > 0 {
            self.effort.increment_session_count(phase);
            self.dom.increment_session_count(phase);
        }
        debug!(
            "[ENGINE] Closed {}: bars={} volume={} delta={}",
            phase, acc.bars, acc.volume, acc.cum_delta
        );
    }

    fn session_boundary(&mut self) {
        if let Some(mut eod) = self.last_profile.take() {
            eod.bucket = ProgressBucket::Eod;
            self.profile.push_snapshot(&eod);
            self.profile.mark_session_complete();
        }
        self.captured = [false; PROGRESS_BUCKET_COUNT];
        self.session_bars = 0;
        self.sessions_completed += 1;

        match self.config.session_boundary {
            SessionBoundaryPolicy::CarryForward => {}
            SessionBoundaryPolicy::ResetSessionState => {
                self.tracker.reset();
                self.dom_quality.reset();
            }
        }
        info!(
            "[ENGINE] Session boundary #{} ({:?}), effort ready: {:?}",
            self.sessions_completed,
            self.config.session_boundary,
            self.effort.ready_phases()
        );
    }

    /// Record a profile snapshot into the current progress bucket, once per
    /// session, after its minute threshold is reached. Buckets already passed
    /// are left empty for this session.
    fn capture_profile(&mut self, p: &ProfileInput) {
        let tick = self.config.tick_size;
        let bucket = ProgressBucket::from_minutes(p.minutes_into_session);
        let snap = ProfileFeatureSnapshot::from_raw(
            bucket,
            p.minutes_into_session,
            p.va_width_ticks(tick),
            (p.session_high - p.session_low) / tick,
            p.poc_volume,
            p.total_volume,
        );
        if !snap.valid {
            return;
        }

        let reached = p.minutes_into_session >= i64::from(bucket.minutes());
        if reached && !self.captured[bucket.index()] {
            self.captured[bucket.index()] = true;
            self.profile.push_snapshot(&snap);
        }
        self.last_profile = Some(snap);
    }
}
