use serde::{Deserialize, Serialize};

/// Number of progress buckets
pub const PROGRESS_BUCKET_COUNT: usize = 5;

/// Elapsed-session band used to condition profile baselines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressBucket {
    /// +15 minutes, also catches the opening minutes
    B15m,
    /// +30 minutes
    B30m,
    /// +60 minutes
    B60m,
    /// +120 minutes onwards
    B120m,
    /// Full session profile
    Eod,
}

impl ProgressBucket {
    pub const ALL: [ProgressBucket; PROGRESS_BUCKET_COUNT] = [
        ProgressBucket::B15m,
        ProgressBucket::B30m,
        ProgressBucket::B60m,
        ProgressBucket::B120m,
        ProgressBucket::Eod,
    ];

    /// Select the bucket for the given minutes into the session.
    ///
    /// Values below the finest threshold fall back to `B15m`. `Eod` is only
    /// produced explicitly by the caller at session end.
    pub fn from_minutes(minutes_into_session: i64) -> ProgressBucket {
        if minutes_into_session >= 120 {
            ProgressBucket::B120m
        } else if minutes_into_session >= 60 {
            ProgressBucket::B60m
        } else if minutes_into_session >= 30 {
            ProgressBucket::B30m
        } else {
            ProgressBucket::B15m
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Minutes threshold for the bucket
    pub fn minutes(&self) -> u32 {
        match self {
            ProgressBucket::B15m => 15,
            ProgressBucket::B30m => 30,
            ProgressBucket::B60m => 60,
            ProgressBucket::B120m => 120,
            ProgressBucket::Eod => 9_999,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProgressBucket::B15m => "15m",
            ProgressBucket::B30m => "30m",
            ProgressBucket::B60m => "60m",
            ProgressBucket::B120m => "120m",
            ProgressBucket::Eod => "EOD",
        }
    }
}

impl std::fmt::Display for ProgressBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
