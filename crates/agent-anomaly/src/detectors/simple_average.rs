//! Comparison against the unweighted historical mean

use super::{Assessment, Assessments, Detector};
use crate::config::AnomalyConfig;
use crate::series::SplitSeries;
use crate::verdict::compare;
use std::sync::Arc;

/// Flags metrics whose current value strays from their historical average
///
/// Periods where a metric was not reported are left out of that metric's average;
/// nothing is imputed.
pub struct SimpleAverageDetector {
    config: Arc<AnomalyConfig>,
}

impl SimpleAverageDetector {
    /// Report key for this detector
    pub const NAME: &'static str = "simpleAverages";

    pub fn new(config: Arc<AnomalyConfig>) -> Self {
        Self { config }
    }

    fn assess_metric(&self, split: &SplitSeries<'_>, metric: &str, actual: f64) -> Assessment {
        let values: Vec<f64> = split
            .history
            .iter()
            .filter_map(|entry| entry.value(metric))
            .collect();

        if values.is_empty() {
            return Assessment::without_history(actual, 0);
        }

        let average = values.iter().sum::<f64>() / values.len() as f64;
        let comparison = compare(
            actual,
            average,
            self.config.deviation_threshold,
            self.config.zero_epsilon,
        );

        Assessment {
            verdict: comparison.verdict,
            actual,
            expected: Some(average),
            deviation: comparison.deviation,
            r_squared: None,
            history_points: values.len(),
        }
    }
}

impl Detector for SimpleAverageDetector {
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
                    deviation = ?assessment.deviation,
                    "Assessed metric"
                );
                (metric.clone(), assessment)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{LabeledHistory, MetricSnapshot, TimeSeries};
    use crate::verdict::Verdict;

    fn series(entries: &[(&str, &[(&str, f64)])]) -> TimeSeries {
        let history: LabeledHistory = entries
            .iter()
            .map(|(label, metrics)| {
                let snapshot: MetricSnapshot =
                    metrics.iter().map(|(k, v)| ((*k).to_string(), *v)).collect();
                ((*label).to_string(), snapshot)
            })
            .collect();
        TimeSeries::from_labeled(history).unwrap()
    }

    fn detector() -> SimpleAverageDetector {
        SimpleAverageDetector::new(Arc::new(AnomalyConfig::default()))
    }

    #[test]
    fn test_constant_history_within_tolerance() {
        let series = series(&[
            ("Q1 2023", &[("margin", 0.25)]),
            ("Q2 2023", &[("margin", 0.25)]),
            ("Q3 2023", &[("margin", 0.25)]),
            ("Q4 2023", &[("margin", 0.25)]),
        ]);
        let result = detector().assess(&series.split().unwrap());

        let margin = &result["margin"];
        assert_eq!(margin.verdict, Verdict::WithinTolerance);
        assert_eq!(margin.deviation, Some(0.0));
        assert_eq!(margin.history_points, 3);
    }

    #[test]
    fn test_higher_and_lower() {
        let series = series(&[
            ("Q1 2019", &[("revenueGrowth", 0.1), ("operatingMargin", 0.2)]),
            ("Q1 2020", &[("revenueGrowth", 0.2), ("operatingMargin", 0.4)]),
            ("Q1 2021", &[("revenueGrowth", 0.1), ("operatingMargin", 0.1)]),
            ("Q1 2022", &[("revenueGrowth", 0.5), ("operatingMargin", 0.05)]),
        ]);
        let result = detector().assess(&series.split().unwrap());

        assert_eq!(result["revenueGrowth"].verdict, Verdict::HigherThanExpected);
        assert_eq!(result["operatingMargin"].verdict, Verdict::LowerThanExpected);
    }

    #[test]
    fn test_missing_periods_excluded_from_denominator() {
        let series = series(&[
            ("Q1 2024", &[("eps", 2.0)]),
            ("Q2 2024", &[("dividend", 0.3)]),
            ("Q3 2024", &[("eps", 4.0)]),
            ("Q4 2024", &[("eps", 3.0)]),
        ]);
        let result = detector().assess(&series.split().unwrap());

        assert_eq!(result["eps"].expected, Some(3.0));
        assert_eq!(result["eps"].history_points, 2);
        assert_eq!(result["eps"].verdict, Verdict::WithinTolerance);
    }

    #[test]
    fn test_metric_absent_from_history() {
        let series = series(&[
            ("Q1 2024", &[("revenue", 100.0)]),
            ("Q2 2024", &[("revenue", 110.0), ("ebitda", 1.0e9)]),
        ]);
        let result = detector().assess(&series.split().unwrap());

        assert_eq!(result["ebitda"].verdict, Verdict::NoHistoricalData);
        assert_eq!(result["ebitda"].expected, None);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_zero_average_is_undetermined() {
        let series = series(&[
            ("Q1 2024", &[("netIncome", -5.0)]),
            ("Q2 2024", &[("netIncome", 5.0)]),
            ("Q3 2024", &[("netIncome", 7.0)]),
        ]);
        let result = detector().assess(&series.split().unwrap());

        assert_eq!(result["netIncome"].verdict, Verdict::Undetermined);
        assert_eq!(result["netIncome"].expected, Some(0.0));
        assert_eq!(result["netIncome"].deviation, None);
    }
}
