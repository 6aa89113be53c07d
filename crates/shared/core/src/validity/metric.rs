use serde::{Deserialize, Serialize};

/// Neutral placeholder for fraction-style metrics (buy/sell proportion)
pub const NEUTRAL_FRACTION: f64 = 0.5;
/// Neutral placeholder for magnitude-style metrics
pub const NEUTRAL_MAGNITUDE: f64 = 0.0;

/// How a metric's scale is centred when it carries no signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    /// Centred at 0.5 (e.g. aggressor fraction)
    Fraction,
    /// Zero at no signal (e.g. strength, availability)
    Magnitude,
}

impl MetricKind {
    pub fn neutral(&self) -> f64 {
        match self {
            MetricKind::Fraction => NEUTRAL_FRACTION,
            MetricKind::Magnitude => NEUTRAL_MAGNITUDE,
        }
    }
}

/// A computed value that is either available or explicitly unavailable.
///
/// The value and its validity are a single field, so they cannot drift apart.
/// The numeric value can only be read through [`get`](Self::get), which forces
/// the caller to handle the unavailable case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    kind: MetricKind,
    value: Option<f64>,
}

impl Metric {
    /// Unavailable fraction-style metric
    pub const fn fraction() -> Self {
        Self {
            kind: MetricKind::Fraction,
            value: None,
        }
    }

    /// Unavailable magnitude-style metric
    pub const fn magnitude() -> Self {
        Self {
            kind: MetricKind::Magnitude,
            value: None,
        }
    }

    /// Store a value computed from sufficient data.
    ///
    /// Non-finite values are treated as unavailable.
    #[inline]
    pub fn set(&mut self, value: f64) {
        self.value = value.is_finite().then_some(value);
    }

    /// Write value and validity together from an optional computation
    #[inline]
    pub fn assign(&mut self, value: Option<f64>) {
        match value {
            Some(v) => self.set(v),
            None => self.invalidate(),
        }
    }

    /// Mark unavailable and drop any previous value
    #[inline]
    pub fn invalidate(&mut self) {
        self.value = None;
    }

    #[inline]
    pub fn get(&self) -> Option<f64> {
        self.value
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Value for display only; unavailable metrics read as the kind's neutral point.
    ///
    /// Never feed this into scoring.
    pub fn display_value(&self) -> f64 {
        self.value.unwrap_or_else(|| self.kind.neutral())
    }
}
