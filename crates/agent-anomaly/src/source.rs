//! History sources: where the engine's input comes from
//!
//! The engine never touches storage. Callers inject a [`HistorySource`] that
//! returns a ticker's labeled snapshots strictly before a cutoff period.

use crate::error::{AnomalyError, Result};
use crate::period::Period;
use crate::series::{LabeledHistory, MetricSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Supplier of per-period metric snapshots for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Snapshots for `ticker` in every period strictly before `cutoff`
    ///
    /// An unknown ticker yields an empty history, not an error.
    async fn fetch_history(&self, ticker: &str, cutoff: Period) -> Result<LabeledHistory>;
}

/// History source backed by an in-process map
///
/// Tickers are matched case-insensitively. Stored rows whose period label does not
/// parse are skipped with a warning, the same way a database-backed source would
/// skip malformed rows.
#[derive(Debug, Default)]
pub struct InMemoryHistorySource {
    histories: RwLock<HashMap<String, LabeledHistory>>,
}

impl InMemoryHistorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one period's snapshot for a ticker
    pub fn insert(&self, ticker: &str, period_label: impl Into<String>, metrics: MetricSnapshot) {
        let mut histories = self.histories.write().unwrap_or_else(PoisonError::into_inner);
        histories
            .entry(ticker.to_uppercase())
            .or_default()
            .insert(period_label.into(), metrics);
    }

    /// Builder-style variant of [`insert`](Self::insert) for a whole history
    pub fn with_history(self, ticker: &str, history: LabeledHistory) -> Self {
        for (label, metrics) in history {
            self.insert(ticker, label, metrics);
        }
        self
    }

    /// Load `{ticker: {period: {metric: value}}}` JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: HashMap<String, LabeledHistory> = serde_json::from_str(json)?;
        let source = Self::new();
        for (ticker, history) in parsed {
            for (label, metrics) in history {
                source.insert(&ticker, label, metrics);
            }
        }
        Ok(source)
    }

    /// Number of tickers held
    pub fn len(&self) -> usize {
        self.histories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistorySource for InMemoryHistorySource {
    async fn fetch_history(&self, ticker: &str, cutoff: Period) -> Result<LabeledHistory> {
        let histories = self.histories.read().unwrap_or_else(PoisonError::into_inner);
        let Some(stored) = histories.get(&ticker.to_uppercase()) else {
            tracing::debug!(ticker = %ticker, "No stored history for ticker");
            return Ok(LabeledHistory::new());
        };

        let mut selected = LabeledHistory::new();
        for (label, metrics) in stored {
            match Period::parse(label) {
                Ok(period) if period < cutoff => {
                    selected.insert(label.clone(), metrics.clone());
                }
                Ok(_) => {}
                Err(AnomalyError::MalformedPeriod { reason, .. }) => {
                    tracing::warn!(ticker = %ticker, label = %label, %reason, "Skipping stored row with malformed period");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(pairs: &[(&str, f64)]) -> MetricSnapshot {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    fn sample_source() -> InMemoryHistorySource {
        let source = InMemoryHistorySource::new();
        source.insert("AAPL", "Q1 2024", metrics(&[("revenue", 100.0)]));
        source.insert("AAPL", "Q2 2024", metrics(&[("revenue", 110.0)]));
        source.insert("AAPL", "Q3 2024", metrics(&[("revenue", 120.0)]));
        source.insert("AAPL", "Q4 2023", metrics(&[("revenue", 90.0)]));
        source
    }

    #[tokio::test]
    async fn test_only_periods_before_cutoff() {
        let source = sample_source();
        let cutoff = Period::parse("Q3 2024").unwrap();

        let history = source.fetch_history("AAPL", cutoff).await.unwrap();
        let labels: Vec<&str> = history.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["Q1 2024", "Q2 2024", "Q4 2023"]);
    }

    #[tokio::test]
    async fn test_ticker_is_case_insensitive() {
        let source = sample_source();
        let cutoff = Period::parse("Q1 2025").unwrap();

        let history = source.fetch_history("aapl", cutoff).await.unwrap();
        assert_eq!(history.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_empty() {
        let source = sample_source();
        let cutoff = Period::parse("Q1 2025").unwrap();
        assert!(source.fetch_history("MSFT", cutoff).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_stored_rows_skipped() {
        let source = sample_source();
        source.insert("AAPL", "FY 2024", metrics(&[("revenue", 1.0)]));
        let cutoff = Period::parse("Q1 2025").unwrap();

        let history = source.fetch_history("AAPL", cutoff).await.unwrap();
        assert!(!history.contains_key("FY 2024"));
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_from_json() {
        let source = InMemoryHistorySource::from_json(
            r#"{"nvda": {"Q1 2024": {"revenue": 26.0}, "Q2 2024": {"revenue": 30.0}}}"#,
        )
        .unwrap();
        assert_eq!(source.len(), 1);

        let cutoff = Period::parse("Q3 2024").unwrap();
        let history = tokio_test::block_on(source.fetch_history("NVDA", cutoff)).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            InMemoryHistorySource::from_json("not json"),
            Err(AnomalyError::JsonError(_))
        ));
    }
}
