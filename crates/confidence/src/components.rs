//! Baseline-relative sub-metrics: profile clarity, liquidity, composition

use amt_baseline::{DomBaselineStore, EffortBaselineStore, EffortMetric, HistoricalProfileBaseline};
use amt_core::{Metric, ProgressBucket, SessionPhase};

fn from_percentile(percentile: Option<f64>, invert: bool) -> Metric {
    let mut m = Metric::magnitude();
    m.assign(percentile.map(|p| {
        let unit = (p / 100.0).clamp(0.0, 1.0);
        if invert { 1.0 - unit } else { unit }
    }));
    m
}

/// Narrow value area relative to history at the same progress reads as clear.
///
/// Unavailable until that progress bucket of the profile baseline is ready.
pub fn volume_profile_clarity(
    baseline: &HistoricalProfileBaseline,
    bucket: ProgressBucket,
    va_width_ticks: f64,
) -> Metric {
    from_percentile(baseline.try_va_width_percentile(bucket, va_width_ticks), true)
}

/// Resting depth relative to this phase's history.
///
/// `depth` is `None` on bars without book data.
pub fn liquidity_availability(
    dom: &DomBaselineStore,
    phase: SessionPhase,
    depth: Option<f64>,
) -> Metric {
    let percentile = depth.and_then(|d| {
        dom.get(phase)
            .is_ready()
            .then(|| dom.try_depth_percentile(phase, d))
            .flatten()
    });
    from_percentile(percentile, false)
}

/// Average trade size relative to this phase's history.
///
/// Needs at least one trade this bar and enough history in the bucket.
pub fn market_composition(
    effort: &EffortBaselineStore,
    phase: SessionPhase,
    volume: f64,
    trades: f64,
) -> Metric {
    if !(trades > 0.0) || !volume.is_finite() {
        return Metric::magnitude();
    }
    let metric = EffortMetric::AvgTradeSize;
    let dist = effort.get(phase).dist(metric);
    if dist.len() < metric.min_samples() {
        return Metric::magnitude();
    }
    from_percentile(dist.try_percentile(volume / trades), false)
}
