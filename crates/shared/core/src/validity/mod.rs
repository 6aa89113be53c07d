mod metric;
mod readiness;

pub use metric::{Metric, MetricKind, NEUTRAL_FRACTION, NEUTRAL_MAGNITUDE};
pub use readiness::{BaselineReadiness, BucketBaselineState, min_samples};
