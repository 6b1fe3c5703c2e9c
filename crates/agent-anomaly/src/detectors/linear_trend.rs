//! Comparison against a linear trend projected from history

use super::{Assessment, Assessments, Detector, LinearFit};
use crate::config::AnomalyConfig;
use crate::series::SplitSeries;
use crate::verdict::{Verdict, compare};
use std::sync::Arc;

/// Flags metrics whose current value strays from their historical trend
///
/// Fits `value ~ period index` by least squares over the periods where the metric
/// was reported, then projects to the current period's index. Histories shorter
/// than `min_trend_points` are treated as having no usable data, and fits with R²
/// below `min_r_squared` are rejected as too weak to project.
pub struct LinearTrendDetector {
    config: Arc<AnomalyConfig>,
}

impl LinearTrendDetector {
    /// Report key for this detector
    pub const NAME: &'static str = "linearRegression";

    pub fn new(config: Arc<AnomalyConfig>) -> Self {
        Self { config }
    }

    fn assess_metric(&self, split: &SplitSeries<'_>, metric: &str, actual: f64) -> Assessment {
        let points = split.metric_points(metric);
        if points.len() < self.config.min_trend_points {
            return Assessment::without_history(actual, points.len());
        }

        let Some(fit) = LinearFit::fit(&points) else {
            // Distinct periods guarantee distinct x values, so this needs < 2 points
            return Assessment::without_history(actual, points.len());
        };

        if fit.r_squared < self.config.min_r_squared {
            return Assessment {
                verdict: Verdict::ModelNotValid,
                actual,
                expected: None,
                deviation: None,
                r_squared: Some(fit.r_squared),
                history_points: fit.points,
            };
        }

        let predicted = fit.predict(split.current.period.index());
        let comparison = compare(
            actual,
            predicted,
            self.config.deviation_threshold,
            self.config.zero_epsilon,
        );

        Assessment {
            verdict: comparison.verdict,
            actual,
            expected: Some(predicted),
            deviation: comparison.deviation,
            r_squared: Some(fit.r_squared),
            history_points: fit.points,
        }
    }
}

impl Detector for LinearTrendDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn assess(&self, split: &SplitSeries<'_>) -> Assessments {
        split
            .current
            .metrics
            .iter()
            .map(|(metric, &actual)| {
                let assessment = self.assess_metric(split, metric, actual);
                tracing::debug!(
                    detector = Self::NAME,
                    metric = %metric,
                    verdict = %assessment.verdict,
                    expected = ?assessment.expected,
                    r_squared = ?assessment.r_squared,
                    "Assessed metric"
                );
                (metric.clone(), assessment)
            })
            .collect()
    }
}
