use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Number of tradeable phases, i.e. storage buckets per phase-keyed baseline
pub const EFFORT_BUCKET_COUNT: usize = 7;

/// Bucket that non-tradeable phases are routed to
pub const FALLBACK_BUCKET: usize = 0;

/// 16:15 to 17:00 ET
pub const POST_CLOSE_END_SEC: u32 = 61_200;
/// 17:00 to 18:00 ET
pub const MAINTENANCE_END_SEC: u32 = 64_800;
/// 03:00 ET
pub const LONDON_OPEN_SEC: u32 = 10_800;
/// 08:30 ET
pub const PRE_MARKET_START_SEC: u32 = 30_600;

/// Initial balance length after the RTH open
pub const IB_MINUTES: u32 = 60;
/// Closing window length before the RTH close
pub const CLOSING_WINDOW_MINUTES: u32 = 45;

const SECONDS_PER_DAY: u32 = 86_400;

/// Segment of the trading day a bar falls into
///
/// Tradeable phases are ordered by their storage bucket. `Maintenance` and
/// `Unknown` have no storage of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Overnight electronic session, 18:00 to 03:00
    Globex,
    /// 03:00 to 08:30
    LondonOpen,
    /// 08:30 to RTH open
    PreMarket,
    /// First hour of RTH
    InitialBalance,
    /// Between IB and the closing window
    MidSession,
    /// Last 45 minutes of RTH
    ClosingSession,
    /// RTH close to 17:00
    PostClose,
    /// Daily halt, 17:00 to 18:00
    Maintenance,
    /// Time could not be resolved
    #[default]
    Unknown,
}

impl SessionPhase {
    /// Tradeable phases in bucket order
    pub const TRADEABLE: [SessionPhase; EFFORT_BUCKET_COUNT] = [
        SessionPhase::Globex,
        SessionPhase::LondonOpen,
        SessionPhase::PreMarket,
        SessionPhase::InitialBalance,
        SessionPhase::MidSession,
        SessionPhase::ClosingSession,
        SessionPhase::PostClose,
    ];

    /// Dense bucket index, `None` for non-tradeable phases
    pub fn bucket_index(&self) -> Option<usize> {
        match self {
            SessionPhase::Globex => Some(0),
            SessionPhase::LondonOpen => Some(1),
            SessionPhase::PreMarket => Some(2),
            SessionPhase::InitialBalance => Some(3),
            SessionPhase::MidSession => Some(4),
            SessionPhase::ClosingSession => Some(5),
            SessionPhase::PostClose => Some(6),
            SessionPhase::Maintenance | SessionPhase::Unknown => None,
        }
    }

    /// Inverse of [`bucket_index`](Self::bucket_index)
    pub fn from_bucket_index(index: usize) -> Option<SessionPhase> {
        Self::TRADEABLE.get(index).copied()
    }

    /// Storage slot for this phase.
    ///
    /// This is the one place where non-tradeable phases are aliased onto
    /// [`FALLBACK_BUCKET`]. Every phase-keyed store resolves through here.
    #[inline]
    pub fn storage_bucket(&self) -> usize {
        self.bucket_index().unwrap_or(FALLBACK_BUCKET)
    }

    /// Returns true if the phase has its own storage bucket
    pub fn is_tradeable(&self) -> bool {
        self.bucket_index().is_some()
    }

    /// Returns true for the regular trading hours phases
    pub fn is_rth(&self) -> bool {
        matches!(
            self,
            SessionPhase::InitialBalance | SessionPhase::MidSession | SessionPhase::ClosingSession
        )
    }

    /// Nominal wall-clock length of the phase in seconds
    pub fn duration_secs(&self) -> u32 {
        match self {
            SessionPhase::Globex => 32_400,
            SessionPhase::LondonOpen => 19_800,
            SessionPhase::PreMarket => 3_600,
            SessionPhase::InitialBalance => 3_600,
            SessionPhase::MidSession => 18_000,
            SessionPhase::ClosingSession => 2_700,
            SessionPhase::PostClose => 2_700,
            SessionPhase::Maintenance | SessionPhase::Unknown => 0,
        }
    }

    /// Short label used in logs and snapshots
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Globex => "GLOBEX",
            SessionPhase::LondonOpen => "LONDON",
            SessionPhase::PreMarket => "PRE_MKT",
            SessionPhase::InitialBalance => "IB",
            SessionPhase::MidSession => "MID_SESS",
            SessionPhase::ClosingSession => "CLOSING",
            SessionPhase::PostClose => "POST_CLOSE",
            SessionPhase::Maintenance => "MAINT",
            SessionPhase::Unknown => "UNKNOWN",
        }
    }

    /// Resolve the phase from seconds since midnight (exchange time).
    ///
    /// RTH is the half-open interval `[rth_start_sec, rth_end_sec)`. Out of
    /// range inputs and inverted RTH windows yield `Unknown`.
    pub fn from_time_of_day(t_sec: u32, rth_start_sec: u32, rth_end_sec: u32) -> SessionPhase {
        if t_sec >= SECONDS_PER_DAY || rth_start_sec >= rth_end_sec {
            return SessionPhase::Unknown;
        }

        if t_sec >= rth_start_sec && t_sec < rth_end_sec {
            let ib_end = rth_start_sec + IB_MINUTES * 60;
            let closing_start = rth_end_sec.saturating_sub(CLOSING_WINDOW_MINUTES * 60);

            if t_sec < ib_end {
                return SessionPhase::InitialBalance;
            }
            if t_sec >= closing_start {
                return SessionPhase::ClosingSession;
            }
            return SessionPhase::MidSession;
        }

        if t_sec >= rth_end_sec && t_sec < POST_CLOSE_END_SEC {
            return SessionPhase::PostClose;
        }
        if (POST_CLOSE_END_SEC..MAINTENANCE_END_SEC).contains(&t_sec) {
            return SessionPhase::Maintenance;
        }
        if t_sec >= MAINTENANCE_END_SEC || t_sec < LONDON_OPEN_SEC {
            return SessionPhase::Globex;
        }
        if (LONDON_OPEN_SEC..PRE_MARKET_START_SEC).contains(&t_sec) {
            return SessionPhase::LondonOpen;
        }
        if t_sec >= PRE_MARKET_START_SEC && t_sec < rth_start_sec {
            return SessionPhase::PreMarket;
        }

        SessionPhase::Unknown
    }

    /// Same as [`from_time_of_day`](Self::from_time_of_day) for a clock time
    pub fn from_time(time: NaiveTime, rth_start_sec: u32, rth_end_sec: u32) -> SessionPhase {
        Self::from_time_of_day(time.num_seconds_from_midnight(), rth_start_sec, rth_end_sec)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Expected bar count for a phase at the given bar interval
///
/// Zero for non-tradeable phases and non-positive intervals.
pub fn expected_bars_in_phase(phase: SessionPhase, bar_interval_secs: i64) -> usize {
    if bar_interval_secs <= 0 || !phase.is_tradeable() {
        return 0;
    }
    (phase.duration_secs() as i64 / bar_interval_secs) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const RTH_START: u32 = 34_200;
    const RTH_END: u32 = 58_500;

    #[test]
    fn test_bucket_round_trip() {
        for index in 0..EFFORT_BUCKET_COUNT {
            let phase = SessionPhase::from_bucket_index(index).unwrap();
            assert_eq!(phase.bucket_index(), Some(index));
        }
        assert_eq!(SessionPhase::from_bucket_index(EFFORT_BUCKET_COUNT), None);
    }

    #[test]
    fn test_non_tradeable_phases_route_to_fallback() {
        assert_eq!(SessionPhase::Maintenance.bucket_index(), None);
        assert_eq!(SessionPhase::Unknown.bucket_index(), None);
        assert_eq!(SessionPhase::Maintenance.storage_bucket(), FALLBACK_BUCKET);
        assert_eq!(SessionPhase::Unknown.storage_bucket(), FALLBACK_BUCKET);
        assert!(!SessionPhase::Maintenance.is_tradeable());
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(SessionPhase::default(), SessionPhase::Unknown);
        assert_eq!(SessionPhase::default().storage_bucket(), FALLBACK_BUCKET);
    }

    #[test]
    fn test_rth_partition() {
        assert_eq!(
            SessionPhase::from_time_of_day(RTH_START, RTH_START, RTH_END),
            SessionPhase::InitialBalance
        );
        assert_eq!(
            SessionPhase::from_time_of_day(RTH_START + 3_599, RTH_START, RTH_END),
            SessionPhase::InitialBalance
        );
        assert_eq!(
            SessionPhase::from_time_of_day(RTH_START + 3_600, RTH_START, RTH_END),
            SessionPhase::MidSession
        );
        assert_eq!(
            SessionPhase::from_time_of_day(55_800, RTH_START, RTH_END),
            SessionPhase::ClosingSession
        );
        assert_eq!(
            SessionPhase::from_time_of_day(RTH_END - 1, RTH_START, RTH_END),
            SessionPhase::ClosingSession
        );
    }

    #[test]
    fn test_evening_and_overnight_phases() {
        let phase = |t| SessionPhase::from_time_of_day(t, RTH_START, RTH_END);
        assert_eq!(phase(RTH_END), SessionPhase::PostClose);
        assert_eq!(phase(POST_CLOSE_END_SEC), SessionPhase::Maintenance);
        assert_eq!(phase(MAINTENANCE_END_SEC), SessionPhase::Globex);
        assert_eq!(phase(0), SessionPhase::Globex);
        assert_eq!(phase(LONDON_OPEN_SEC - 1), SessionPhase::Globex);
        assert_eq!(phase(LONDON_OPEN_SEC), SessionPhase::LondonOpen);
        assert_eq!(phase(PRE_MARKET_START_SEC), SessionPhase::PreMarket);
        assert_eq!(phase(RTH_START - 1), SessionPhase::PreMarket);
        assert_eq!(phase(SECONDS_PER_DAY), SessionPhase::Unknown);
    }

    #[test]
    fn test_from_naive_time() {
        let t = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        assert_eq!(
            SessionPhase::from_time(t, RTH_START, RTH_END),
            SessionPhase::MidSession
        );
    }

    #[test]
    fn test_expected_bars() {
        assert_eq!(expected_bars_in_phase(SessionPhase::InitialBalance, 60), 60);
        assert_eq!(expected_bars_in_phase(SessionPhase::MidSession, 60), 300);
        assert_eq!(expected_bars_in_phase(SessionPhase::Globex, 300), 108);
        assert_eq!(expected_bars_in_phase(SessionPhase::Maintenance, 60), 0);
        assert_eq!(expected_bars_in_phase(SessionPhase::MidSession, 0), 0);
        assert_eq!(expected_bars_in_phase(SessionPhase::MidSession, -60), 0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(SessionPhase::InitialBalance.to_string(), "IB");
        assert_eq!(SessionPhase::Maintenance.label(), "MAINT");
        assert!(SessionPhase::MidSession.is_rth());
        assert!(!SessionPhase::Globex.is_rth());
    }
}
