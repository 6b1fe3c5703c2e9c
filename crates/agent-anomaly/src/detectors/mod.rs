//! Anomaly detectors
//!
//! Each detector looks at every metric of the current period and produces one
//! [`Assessment`] per metric. Detectors are stateless and independent of each
//! other, so they can run in any order or concurrently over the same split.

pub mod linear_trend;
pub mod regression;
pub mod simple_average;

pub use linear_trend::LinearTrendDetector;
pub use regression::LinearFit;
pub use simple_average::SimpleAverageDetector;

use crate::series::SplitSeries;
use crate::verdict::Verdict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-metric assessments keyed by metric name
pub type Assessments = BTreeMap<String, Assessment>;

/// One detector's judgement of one metric, with the numbers behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub verdict: Verdict,
    /// Value in the current period
    pub actual: f64,
    /// Historical average or trend projection, when one was computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<f64>,
    /// Relative deviation of `actual` from `expected`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation: Option<f64>,
    /// Goodness of fit of the trend line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
    /// Historical periods that contributed
    pub history_points: usize,
}

impl Assessment {
    /// Assessment for a metric with nothing usable in its history
    pub fn without_history(actual: f64, history_points: usize) -> Self {
        Self {
            verdict: Verdict::NoHistoricalData,
            actual,
            expected: None,
            deviation: None,
            r_squared: None,
            history_points,
        }
    }
}

/// A method for judging the current period against its history
pub trait Detector: Send + Sync {
    /// Key under which this detector's verdicts appear in the report
    fn name(&self) -> &'static str;

    /// Assess every metric present in the current period
    fn assess(&self, split: &SplitSeries<'_>) -> Assessments;
}
