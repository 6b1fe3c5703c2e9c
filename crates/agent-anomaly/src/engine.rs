//! Anomaly Detection Engine
//!
//! Normalizes a snapshot history, splits off the current period and runs both
//! detectors over it. The engine holds only immutable configuration, so one
//! instance can serve any number of threads or tasks concurrently.

use crate::config::AnomalyConfig;
use crate::detectors::{Detector, LinearTrendDetector, SimpleAverageDetector};
use crate::error::Result;
use crate::report::AnomalyReport;
use crate::series::{MetricSnapshot, TimeSeries};
use std::sync::Arc;

/// Runs the simple-average and linear-trend detectors over a company's history
pub struct AnomalyEngine {
    config: Arc<AnomalyConfig>,
    simple_average: SimpleAverageDetector,
    linear_trend: LinearTrendDetector,
}

impl AnomalyEngine {
    /// Create an engine, rejecting invalid configuration up front
    pub fn new(config: Arc<AnomalyConfig>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            simple_average: SimpleAverageDetector::new(Arc::clone(&config)),
            linear_trend: LinearTrendDetector::new(Arc::clone(&config)),
            config,
        })
    }

    /// Engine with the default thresholds
    pub fn with_defaults() -> Self {
        let config = Arc::new(AnomalyConfig::default());
        Self {
            simple_average: SimpleAverageDetector::new(Arc::clone(&config)),
            linear_trend: LinearTrendDetector::new(Arc::clone(&config)),
            config,
        }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Judge the latest period of `series` against everything before it
    pub fn detect(&self, series: &TimeSeries) -> Result<AnomalyReport> {
        let split = series.split()?;

        let simple_averages = self.simple_average.assess(&split);
        let linear_regression = self.linear_trend.assess(&split);

        let report = AnomalyReport::aggregate(
            split.current.period,
            split.history.len(),
            simple_averages,
            linear_regression,
        );

        tracing::info!(
            current_period = %report.current_period(),
            historical_periods = report.historical_periods(),
            metrics = split.current.metrics.len(),
            flagged = report.flagged_metrics().len(),
            unresolved = report.unresolved_count(),
            "Anomaly detection complete"
        );

        Ok(report)
    }

    /// Normalize a label-keyed history and run detection on it
    pub fn detect_labeled<I, K>(&self, history: I) -> Result<AnomalyReport>
    where
        I: IntoIterator<Item = (K, MetricSnapshot)>,
        K: AsRef<str>,
    {
        let series = TimeSeries::from_labeled(history)?;
        self.detect(&series)
    }
}

impl Default for AnomalyEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
