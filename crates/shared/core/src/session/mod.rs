mod phase;
mod progress;

pub use phase::{
    CLOSING_WINDOW_MINUTES, EFFORT_BUCKET_COUNT, FALLBACK_BUCKET, IB_MINUTES, LONDON_OPEN_SEC,
    MAINTENANCE_END_SEC, POST_CLOSE_END_SEC, PRE_MARKET_START_SEC, SessionPhase,
    expected_bars_in_phase,
};
pub use progress::{PROGRESS_BUCKET_COUNT, ProgressBucket};
