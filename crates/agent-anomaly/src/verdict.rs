//! Per-metric verdicts and the deviation classifier shared by both detectors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative classification of one metric under one detection method
///
/// Serialized as the human-readable labels handed to the analysis agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Higher than expected")]
    HigherThanExpected,
    #[serde(rename = "Lower than expected")]
    LowerThanExpected,
    #[serde(rename = "Changes within the tolerable range")]
    WithinTolerance,
    #[serde(rename = "No historical data")]
    NoHistoricalData,
    #[serde(rename = "Model not valid")]
    ModelNotValid,
    #[serde(rename = "Undetermined")]
    Undetermined,
}

impl Verdict {
    /// Wire label for this verdict
    pub fn label(self) -> &'static str {
        match self {
            Self::HigherThanExpected => "Higher than expected",
            Self::LowerThanExpected => "Lower than expected",
            Self::WithinTolerance => "Changes within the tolerable range",
            Self::NoHistoricalData => "No historical data",
            Self::ModelNotValid => "Model not valid",
            Self::Undetermined => "Undetermined",
        }
    }

    /// Whether the metric deviates beyond the tolerance band
    pub fn is_anomalous(self) -> bool {
        matches!(self, Self::HigherThanExpected | Self::LowerThanExpected)
    }

    /// Whether the detector produced a comparison at all
    pub fn has_signal(self) -> bool {
        matches!(
            self,
            Self::HigherThanExpected | Self::LowerThanExpected | Self::WithinTolerance
        )
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of comparing an observed value with an expected one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub verdict: Verdict,
    /// `(actual - expected) / |expected|`, absent when it could not be computed
    pub deviation: Option<f64>,
}

/// Compare `actual` against `expected` using a symmetric relative threshold
///
/// The deviation ratio is undefined when `|expected|` is below `zero_epsilon`, and
/// meaningless when either value is not finite; both cases yield
/// [`Verdict::Undetermined`].
pub fn compare(actual: f64, expected: f64, threshold: f64, zero_epsilon: f64) -> Comparison {
    if !actual.is_finite() || !expected.is_finite() || expected.abs() < zero_epsilon {
        return Comparison {
            verdict: Verdict::Undetermined,
            deviation: None,
        };
    }

    let deviation = (actual - expected) / expected.abs();
    Comparison {
        verdict: classify(deviation, threshold),
        deviation: Some(deviation),
    }
}

/// Map a deviation ratio onto the tri-state tolerance verdict
pub fn classify(deviation: f64, threshold: f64) -> Verdict {
    if deviation > threshold {
        Verdict::HigherThanExpected
    } else if deviation < -threshold {
        Verdict::LowerThanExpected
    } else {
        Verdict::WithinTolerance
    }
}
