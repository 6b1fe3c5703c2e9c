//! Merging detector output into a single report

use crate::detectors::{Assessment, Assessments, LinearTrendDetector, SimpleAverageDetector};
use crate::period::Period;
use crate::verdict::Verdict;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Verdicts for every current-period metric under both detection methods
///
/// Serializes to the two-level verdict mapping consumed by the analysis agent:
///
/// ```json
/// {"simpleAverages": {"revenue": "Higher than expected"},
///  "linearRegression": {"revenue": "Model not valid"}}
/// ```
///
/// The full [`Assessment`]s stay available through [`AnomalyReport::simple_averages`],
/// [`AnomalyReport::linear_regression`] and [`AnomalyReport::details`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyReport {
    current_period: Period,
    historical_periods: usize,
    simple_averages: Assessments,
    linear_regression: Assessments,
}

impl AnomalyReport {
    /// Combine the two detectors' assessments
    ///
    /// Every metric either detector assessed is kept, whatever its verdict.
    pub fn aggregate(
        current_period: Period,
        historical_periods: usize,
        simple_averages: Assessments,
        linear_regression: Assessments,
    ) -> Self {
        Self {
            current_period,
            historical_periods,
            simple_averages,
            linear_regression,
        }
    }

    /// The period whose metrics were judged
    pub fn current_period(&self) -> Period {
        self.current_period
    }

    /// Number of periods before the current one
    pub fn historical_periods(&self) -> usize {
        self.historical_periods
    }

    pub fn simple_averages(&self) -> &Assessments {
        &self.simple_averages
    }

    pub fn linear_regression(&self) -> &Assessments {
        &self.linear_regression
    }

    /// Detector name → metric → verdict
    pub fn verdicts(&self) -> BTreeMap<&'static str, BTreeMap<&str, Verdict>> {
        BTreeMap::from([
            (SimpleAverageDetector::NAME, verdicts_of(&self.simple_averages)),
            (LinearTrendDetector::NAME, verdicts_of(&self.linear_regression)),
        ])
    }

    /// Metric → detector name → verdict
    pub fn by_metric(&self) -> BTreeMap<&str, BTreeMap<&'static str, Verdict>> {
        let mut out: BTreeMap<&str, BTreeMap<&'static str, Verdict>> = BTreeMap::new();
        for (detector, assessments) in self.detectors() {
            for (metric, assessment) in assessments {
                out.entry(metric.as_str())
                    .or_default()
                    .insert(detector, assessment.verdict);
            }
        }
        out
    }

    /// Verdict for `metric` under the named detector
    pub fn verdict(&self, detector: &str, metric: &str) -> Option<Verdict> {
        self.detectors()
            .into_iter()
            .find(|(name, _)| *name == detector)
            .and_then(|(_, assessments)| assessments.get(metric))
            .map(|assessment| assessment.verdict)
    }

    /// Metrics flagged higher or lower than expected by at least one detector
    pub fn flagged_metrics(&self) -> Vec<&str> {
        self.by_metric()
            .into_iter()
            .filter(|(_, verdicts)| verdicts.values().any(|v| v.is_anomalous()))
            .map(|(metric, _)| metric)
            .collect()
    }

    /// Number of (detector, metric) assessments that produced no comparison
    ///
    /// Counts missing history, rejected fits and undetermined deviations.
    pub fn unresolved_count(&self) -> usize {
        self.detectors()
            .iter()
            .flat_map(|(_, assessments)| assessments.values())
            .filter(|assessment| !assessment.verdict.has_signal())
            .count()
    }

    /// Full assessments as JSON, keyed like the verdict mapping
    pub fn details(&self) -> serde_json::Value {
        serde_json::json!({
            "currentPeriod": self.current_period,
            "historicalPeriods": self.historical_periods,
            (SimpleAverageDetector::NAME): self.simple_averages,
            (LinearTrendDetector::NAME): self.linear_regression,
        })
    }

    fn detectors(&self) -> [(&'static str, &Assessments); 2] {
        [
            (SimpleAverageDetector::NAME, &self.simple_averages),
            (LinearTrendDetector::NAME, &self.linear_regression),
        ]
    }
}

fn verdicts_of(assessments: &Assessments) -> BTreeMap<&str, Verdict> {
    assessments
        .iter()
        .map(|(metric, Assessment { verdict, .. })| (metric.as_str(), *verdict))
        .collect()
}

impl Serialize for AnomalyReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(SimpleAverageDetector::NAME, &verdicts_of(&self.simple_averages))?;
        map.serialize_entry(LinearTrendDetector::NAME, &verdicts_of(&self.linear_regression))?;
        map.end()
    }
}
