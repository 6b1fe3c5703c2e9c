//! Financial anomaly detection for quarterly company metrics
//!
//! Given a company's per-quarter financial metrics, this crate decides for the
//! most recent quarter whether each metric is higher than expected, lower than
//! expected, or within tolerance. Two independent detectors produce the
//! expectation:
//!
//! - `simpleAverages`: the mean of the metric over all prior quarters
//! - `linearRegression`: an ordinary least-squares trend projected to the
//!   current quarter, rejected when its R² falls below the configured floor
//!
//! # Architecture
//!
//! [`AnomalyEngine`] is synchronous and pure: it takes a [`TimeSeries`] (or a
//! period-labeled map) and returns an [`AnomalyReport`]. The
//! [`AnomalyDetectionTool`] wraps the engine for agents, pulling history from
//! a [`HistorySource`] through a TTL [`HistoryCache`].
//!
//! # Example
//!
//! ```rust
//! use agent_anomaly::{AnomalyEngine, LabeledHistory, Verdict};
//!
//! let history: LabeledHistory = serde_json::from_str(r#"{
//!     "Q1 2024": {"revenueGrowth": 1.0},
//!     "Q2 2024": {"revenueGrowth": 1.0},
//!     "Q3 2024": {"revenueGrowth": 1.25}
//! }"#).unwrap();
//!
//! let report = AnomalyEngine::default().detect_labeled(history).unwrap();
//! assert_eq!(
//!     report.verdict("simpleAverages", "revenueGrowth"),
//!     Some(Verdict::HigherThanExpected)
//! );
//! ```

pub mod cache;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod period;
pub mod report;
pub mod series;
pub mod source;
pub mod tools;
pub mod verdict;

pub use cache::{CacheKey, HistoryCache};
pub use config::{AnomalyConfig, AnomalyConfigBuilder};
pub use detectors::{
    Assessment, Assessments, Detector, LinearFit, LinearTrendDetector, SimpleAverageDetector,
};
pub use engine::AnomalyEngine;
pub use error::{AnomalyError, Result};
pub use period::{Period, Quarter};
pub use report::AnomalyReport;
pub use series::{LabeledHistory, MetricSnapshot, PeriodSnapshot, SplitSeries, TimeSeries};
pub use source::{HistorySource, InMemoryHistorySource};
pub use tools::AnomalyDetectionTool;
pub use verdict::{Comparison, Verdict, compare, classify};
