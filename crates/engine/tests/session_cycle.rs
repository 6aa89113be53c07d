//! Multi-session runs through the engine

use amt_confidence::TpoInputs;
use amt_core::{FacilitationState, ProgressBucket, SessionPhase};
use amt_engine::{
    AuctionEngine, BarInput, DepthInput, EngineConfig, EngineError, ProfileInput,
    SessionBoundaryPolicy,
};
use approx::assert_abs_diff_eq;
use chrono::NaiveTime;

const GLOBEX_BARS: i64 = 5;
const IB_BARS: i64 = 25;

fn bar(index: i64, phase: SessionPhase, ask: f64, bid: f64, range: f64) -> BarInput {
    BarInput {
        bar_index: index,
        phase: Some(phase),
        time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        duration_secs: 60.0,
        ask_volume: ask,
        bid_volume: bid,
        trades: (ask + bid) / (3 + index % 3) as f64,
        high: 5000.0 + range,
        low: 5000.0,
        close: 5000.0 + range / 2.0,
        depth: DepthInput::default(),
        profile: None,
        timestamp_ms: None,
    }
}

fn ib_profile(day: i64, minute: i64, total_volume: f64) -> ProfileInput {
    let half_width = 0.25 * (5 + day) as f64;
    ProfileInput {
        minutes_into_session: minute,
        tpo: TpoInputs {
            tpo_poc: 5000.0,
            tpo_vah: 5000.0 + half_width,
            tpo_val: 5000.0 - half_width,
            vbp_poc: 5000.25,
        },
        session_high: 5010.0,
        session_low: 4990.0,
        poc_volume: Some(total_volume / 10.0),
        total_volume,
        price_levels: 40,
    }
}

/// Globex then IB bars for one day; returns the next bar index
fn run_day(engine: &mut AuctionEngine, day: i64, mut index: i64) -> i64 {
    let d = day as f64;
    for i in 0..GLOBEX_BARS {
        let k = i as f64;
        let b = bar(index, SessionPhase::Globex, 30.0 + 5.0 * k + d, 25.0 + 3.0 * k, 0.5 + 0.25 * k);
        engine.process_bar(&b).unwrap();
        index += 1;
    }
    let mut total = 0.0;
    for i in 0..IB_BARS {
        let ask = 50.0 + ((i % 7) * 10) as f64 + d;
        let bid = 40.0 + ((i % 5) * 5) as f64;
        let range = 1.0 + (i % 4) as f64 * 0.5;
        total += ask + bid;
        let mut b = bar(index, SessionPhase::InitialBalance, ask, bid, range);
        b.profile = Some(ib_profile(day, i, total));
        engine.process_bar(&b).unwrap();
        index += 1;
    }
    index
}

/// A full trading day: Globex, IB, then PostClose and the maintenance halt
fn run_full_day(engine: &mut AuctionEngine, day: i64, index: i64) -> i64 {
    let mut index = run_day(engine, day, index);
    for phase in [SessionPhase::PostClose, SessionPhase::Maintenance] {
        for _ in 0..3 {
            engine
                .process_bar(&bar(index, phase, 45.0, 30.0 + day as f64, 1.0))
                .unwrap();
            index += 1;
        }
    }
    index
}

/// Two median bars so the tracker sits in EFFICIENT
fn settle(engine: &mut AuctionEngine, index: i64) -> i64 {
    for i in 0..2 {
        let snap = engine
            .process_bar(&bar(index + i, SessionPhase::InitialBalance, 80.0, 50.0, 1.5))
            .unwrap();
        assert_eq!(snap.classified, FacilitationState::Efficient);
    }
    assert_eq!(engine.tracker().confirmed_state(), FacilitationState::Efficient);
    index + 2
}

fn engine_with(policy: SessionBoundaryPolicy) -> AuctionEngine {
    let _ = env_logger::try_init();
    let config = EngineConfig {
        session_boundary: policy,
        ..Default::default()
    };
    AuctionEngine::new(config).unwrap()
}

fn warmed_engine(policy: SessionBoundaryPolicy, days: i64) -> (AuctionEngine, i64) {
    let mut engine = engine_with(policy);
    let mut index = 0;
    for day in 0..days {
        index = run_day(&mut engine, day, index);
    }
    (engine, index)
}

#[test]
fn test_first_bar_has_no_baseline_opinion() {
    let mut engine = engine_with(SessionBoundaryPolicy::CarryForward);
    let snap = engine
        .process_bar(&bar(0, SessionPhase::Globex, 38.0, 35.0, 1.0))
        .unwrap();

    assert_abs_diff_eq!(snap.delta_consistency.unwrap(), 0.5206, epsilon = 1e-4);
    assert!(snap.vol_percentile.is_none());
    assert!(snap.range_percentile.is_none());
    assert_eq!(snap.classified, FacilitationState::Unknown);
    assert_eq!(snap.facilitation_label, "UNKNOWN(0)");
    assert!(snap.session_delta_percentile.is_none());

    // Only delta is available, so the score is the delta strength
    assert_abs_diff_eq!(snap.score.unwrap(), snap.delta_strength.unwrap(), epsilon = 1e-12);

    let json = serde_json::to_value(&snap).unwrap();
    assert!(json["dom_strength"].is_null());
    assert!(json["liquidity_availability"].is_null());
    assert!(json["vol_percentile"].is_null());
    assert!(json["score"].is_number());
}

#[test]
fn test_thin_bar_has_no_score() {
    let mut engine = engine_with(SessionBoundaryPolicy::CarryForward);
    let snap = engine
        .process_bar(&bar(0, SessionPhase::Globex, 2.0, 1.0, 1.0))
        .unwrap();
    assert!(snap.delta_consistency.is_none());
    assert!(snap.score.is_none());
}

#[test]
fn test_baselines_accumulate_across_sessions() {
    let (mut engine, index) = warmed_engine(SessionBoundaryPolicy::CarryForward, 6);

    assert_eq!(engine.sessions_completed(), 5);
    assert!(engine.session_delta().is_phase_ready(SessionPhase::InitialBalance));
    assert!(!engine.session_delta().is_phase_ready(SessionPhase::MidSession));
    assert!(
        engine
            .session_delta()
            .try_percentile(SessionPhase::MidSession, 0.1)
            .is_none()
    );
    assert_eq!(
        engine
            .effort()
            .get(SessionPhase::InitialBalance)
            .sessions_contributed(),
        5
    );

    let snap = engine
        .process_bar(&bar(index, SessionPhase::InitialBalance, 80.0, 50.0, 2.0))
        .unwrap();
    assert!(snap.vol_percentile.is_some());
    assert!(snap.range_percentile.is_some());
    assert!(snap.session_delta_percentile.is_some());
    assert!(snap.market_composition.is_some());
    assert_ne!(snap.facilitation, FacilitationState::Unknown);
}

#[test]
fn test_profile_metrics_after_history() {
    let (mut engine, index) = warmed_engine(SessionBoundaryPolicy::CarryForward, 6);

    let mut b = bar(index, SessionPhase::InitialBalance, 70.0, 50.0, 1.5);
    b.profile = Some(ib_profile(5, 20, 5_000.0));
    let snap = engine.process_bar(&b).unwrap();

    assert_eq!(snap.profile_mature, Some(true));
    assert!(snap.tpo_acceptance.is_some());
    assert!(snap.volume_profile_clarity.is_some());
}

#[test]
fn test_absorption_bar_confirms_labored_immediately() {
    let (mut engine, index) = warmed_engine(SessionBoundaryPolicy::CarryForward, 3);
    let index = settle(&mut engine, index);

    let snap = engine
        .process_bar(&bar(index, SessionPhase::InitialBalance, 3000.0, 2500.0, 0.0))
        .unwrap();
    assert_eq!(snap.classified, FacilitationState::Labored);
    assert_eq!(snap.facilitation, FacilitationState::Labored);
    assert!(snap.state_just_changed);
    assert_eq!(snap.bars_in_state, 1);
    let transition = snap.transition.unwrap();
    assert_eq!(transition.from, FacilitationState::Efficient);
    assert_eq!(transition.to, FacilitationState::Labored);
    assert!(transition.is_deteriorating());
    assert_eq!(transition.bar, index);
    assert_eq!(snap.facilitation_label, "LABORED(1)");
}

#[test]
fn test_boundary_policy_controls_tracker() {
    for policy in [
        SessionBoundaryPolicy::CarryForward,
        SessionBoundaryPolicy::ResetSessionState,
    ] {
        let (mut engine, index) = warmed_engine(policy, 3);
        engine
            .process_bar(&bar(index, SessionPhase::InitialBalance, 3000.0, 2500.0, 0.0))
            .unwrap();
        assert_eq!(engine.tracker().confirmed_state(), FacilitationState::Labored);

        // No duration: no effort rates, so the bar classifies as unknown
        let mut globex = bar(index + 1, SessionPhase::Globex, 40.0, 30.0, 1.0);
        globex.duration_secs = 0.0;
        let snap = engine.process_bar(&globex).unwrap();

        assert_eq!(snap.facilitation, FacilitationState::Unknown);
        match policy {
            SessionBoundaryPolicy::CarryForward => {
                assert!(snap.state_just_changed);
                assert_eq!(snap.transition.unwrap().from, FacilitationState::Labored);
            }
            SessionBoundaryPolicy::ResetSessionState => {
                assert!(!snap.state_just_changed);
                assert!(snap.transition.is_none());
            }
        }
    }
}

#[test]
fn test_out_of_order_bar_rejected() {
    let (mut engine, index) = warmed_engine(SessionBoundaryPolicy::CarryForward, 1);
    let bars_in_confirmed = engine.tracker().bars_in_confirmed();

    let err = engine
        .process_bar(&bar(index - 10, SessionPhase::Globex, 40.0, 30.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, EngineError::OutOfOrderBar { .. }));
    assert_eq!(engine.current_phase(), Some(SessionPhase::InitialBalance));
    assert_eq!(engine.tracker().bars_in_confirmed(), bars_in_confirmed);
}

#[test]
fn test_end_session_forces_boundary() {
    let (mut engine, _) = warmed_engine(SessionBoundaryPolicy::ResetSessionState, 1);
    assert_eq!(engine.sessions_completed(), 0);

    engine.end_session();
    assert_eq!(engine.sessions_completed(), 1);
    assert_eq!(engine.current_phase(), None);
    assert_eq!(engine.tracker().confirmed_state(), FacilitationState::Unknown);
    assert_eq!(
        engine
            .session_delta()
            .get(SessionPhase::InitialBalance)
            .sessions_contributed(),
        1
    );
}

#[test]
fn test_maintenance_halt_does_not_count_as_globex_session() {
    let mut engine = engine_with(SessionBoundaryPolicy::CarryForward);
    let mut index = 0;
    for day in 0..3 {
        index = run_full_day(&mut engine, day, index);
    }
    engine
        .process_bar(&bar(index, SessionPhase::Globex, 40.0, 30.0, 1.0))
        .unwrap();

    // Three Globex sessions have closed, one is in progress
    let globex = SessionPhase::Globex;
    assert_eq!(engine.sessions_completed(), 3);
    assert_eq!(engine.effort().get(globex).sessions_contributed(), 3);
    assert_eq!(engine.session_delta().get(globex).sessions_contributed(), 3);
    assert_eq!(
        engine.effort().get(globex).total_bars_pushed(),
        3 * GLOBEX_BARS as usize + 1
    );
    assert_eq!(
        engine
            .session_delta()
            .get(SessionPhase::PostClose)
            .sessions_contributed(),
        3
    );
    assert!(!engine.session_delta().is_phase_ready(globex));
}

#[test]
fn test_late_first_profile_fills_only_its_own_bucket() {
    let mut engine = engine_with(SessionBoundaryPolicy::CarryForward);
    let mut b = bar(0, SessionPhase::MidSession, 60.0, 40.0, 1.0);
    b.profile = Some(ib_profile(0, 130, 4_000.0));
    engine.process_bar(&b).unwrap();

    let profile = engine.profile();
    for bucket in [ProgressBucket::B15m, ProgressBucket::B30m, ProgressBucket::B60m] {
        assert_eq!(profile.sample_counts(bucket), (0, 0), "{bucket}");
    }
    assert_eq!(profile.sample_counts(ProgressBucket::B120m), (1, 1));

    // Once per session
    let mut b = bar(1, SessionPhase::MidSession, 60.0, 40.0, 1.0);
    b.profile = Some(ib_profile(0, 140, 4_500.0));
    engine.process_bar(&b).unwrap();
    assert_eq!(engine.profile().sample_counts(ProgressBucket::B120m), (1, 1));

    // The next session's early snapshot lands in B15m; the previous day's
    // last profile goes to EOD
    let index = run_day(&mut engine, 1, 2);
    engine
        .process_bar(&bar(index, SessionPhase::Globex, 40.0, 30.0, 1.0))
        .unwrap();
    let profile = engine.profile();
    assert_eq!(profile.sample_counts(ProgressBucket::B15m), (1, 1));
    assert_eq!(profile.sample_counts(ProgressBucket::B30m), (0, 0));
    assert_eq!(profile.sample_counts(ProgressBucket::B120m), (1, 1));
    assert_eq!(profile.sample_counts(ProgressBucket::Eod), (2, 2));
}
