//! TPO acceptance: how well the market has accepted its value area

use amt_core::Metric;
use amt_stats::clamp01;
use serde::{Deserialize, Serialize};

const W_BALANCE: f64 = 0.40;
const W_ALIGNMENT: f64 = 0.35;
const W_COMPACTNESS: f64 = 0.25;

/// TPO/VBP POC divergence at which alignment reaches zero
pub const ALIGNMENT_MAX_DIVERGENCE_TICKS: f64 = 12.0;
/// Value-area width at which compactness reaches zero
pub const COMPACTNESS_MAX_WIDTH_TICKS: f64 = 100.0;

/// TPO value area plus the volume POC, in price units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpoInputs {
    pub tpo_poc: f64,
    pub tpo_vah: f64,
    pub tpo_val: f64,
    /// Volume-by-price POC; non-positive when unavailable
    pub vbp_poc: f64,
}

/// Acceptance score with its components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpoAcceptance {
    pub acceptance: f64,
    /// 1 when the POC sits mid value area, 0 at either edge
    pub balance: f64,
    /// Present only when the VBP POC was available
    pub alignment: Option<f64>,
    pub compactness: f64,
    pub va_width_ticks: i64,
    pub poc_divergence_ticks: Option<i64>,
}

impl TpoAcceptance {
    pub fn metric(result: Option<&TpoAcceptance>) -> Metric {
        let mut m = Metric::magnitude();
        m.assign(result.map(|r| r.acceptance));
        m
    }
}

fn is_price(p: f64) -> bool {
    p.is_finite() && p > 0.0
}

/// Score value-area balance, TPO/VBP POC alignment and compactness.
///
/// Returns `None` for a non-positive tick size, a missing price or an
/// inverted value area. Alignment is left out of the blend when the VBP POC
/// is unavailable.
pub fn compute_tpo_acceptance(inputs: &TpoInputs, tick_size: f64) -> Option<TpoAcceptance> {
    let TpoInputs {
        tpo_poc,
        tpo_vah,
        tpo_val,
        vbp_poc,
    } = *inputs;

    if tick_size <= 0.0 || !is_price(tpo_poc) || !is_price(tpo_vah) || !is_price(tpo_val) {
        return None;
    }
    if tpo_vah <= tpo_val {
        return None;
    }

    let width = tpo_vah - tpo_val;
    let va_width_ticks = (width / tick_size) as i64;

    let rel = clamp01((tpo_poc - tpo_val) / width);
    let balance = 1.0 - (rel - 0.5).abs() * 2.0;

    let (alignment, poc_divergence_ticks) = if is_price(vbp_poc) {
        let divergence = (tpo_poc - vbp_poc).abs() / tick_size;
        (
            Some(clamp01(1.0 - divergence / ALIGNMENT_MAX_DIVERGENCE_TICKS)),
            Some(divergence as i64),
        )
    } else {
        (None, None)
    };

    let compactness = clamp01(1.0 - va_width_ticks as f64 / COMPACTNESS_MAX_WIDTH_TICKS);

    let mut score = W_BALANCE * balance + W_COMPACTNESS * compactness;
    let mut total = W_BALANCE + W_COMPACTNESS;
    if let Some(a) = alignment {
        score += W_ALIGNMENT * a;
        total += W_ALIGNMENT;
    }

    Some(TpoAcceptance {
        acceptance: clamp01(score / total),
        balance,
        alignment,
        compactness,
        va_width_ticks,
        poc_divergence_ticks,
    })
}
