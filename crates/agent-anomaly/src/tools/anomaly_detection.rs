//! Tool exposing the anomaly engine to analysis agents
//!
//! The agent supplies a ticker and a period; the tool fetches every earlier
//! quarter from the configured [`HistorySource`], treats the latest of them as
//! the current period, and returns the verdict mapping.

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::cache::{CacheKey, HistoryCache};
use crate::engine::AnomalyEngine;
use crate::error::{AnomalyError, Result};
use crate::period::Period;
use crate::report::AnomalyReport;
use crate::source::HistorySource;

/// Parameters accepted by the anomaly detection tool
#[derive(Debug, Deserialize)]
struct AnomalyParams {
    /// Company ticker symbol
    ticker: String,
    /// Cutoff period, `"Q<1-4> YYYY"`
    period: String,
    /// Attach expected values, deviations and fit quality
    #[serde(default)]
    include_details: bool,
}

/// Tool for detecting anomalies in a company's quarterly metrics
pub struct AnomalyDetectionTool {
    engine: Arc<AnomalyEngine>,
    source: Arc<dyn HistorySource>,
    cache: HistoryCache,
}

impl AnomalyDetectionTool {
    /// Create a new anomaly detection tool
    ///
    /// Histories are cached for the engine's configured `cache_ttl`.
    pub fn new(engine: Arc<AnomalyEngine>, source: Arc<dyn HistorySource>) -> Self {
        let cache = HistoryCache::new(engine.config().cache_ttl);
        Self {
            engine,
            source,
            cache,
        }
    }

    /// Share an existing cache instead of the tool's own
    pub fn with_cache(mut self, cache: HistoryCache) -> Self {
        self.cache = cache;
        self
    }

    /// Run detection for `ticker` over every period before `period`
    pub async fn analyze(&self, ticker: &str, period: &str) -> Result<AnomalyReport> {
        let ticker = ticker.trim();
        let cutoff = Period::parse(period)?;
        let key = CacheKey::new(ticker, cutoff);

        let history = self
            .cache
            .get_or_fetch(key, || self.source.fetch_history(ticker, cutoff))
            .await?;

        if history.is_empty() {
            return Err(AnomalyError::DataUnavailable {
                ticker: ticker.to_uppercase(),
                period: cutoff.to_string(),
            });
        }

        tracing::debug!(ticker = %ticker, cutoff = %cutoff, periods = history.len(), "Fetched history");
        self.engine.detect_labeled(history)
    }

    async fn run(&self, params: AnomalyParams) -> Result<Value> {
        let report = self.analyze(&params.ticker, &params.period).await?;

        let mut result = serde_json::to_value(&report)?;
        if params.include_details {
            result["details"] = report.details();
        }
        Ok(result)
    }
}

#[async_trait]
impl Tool for AnomalyDetectionTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let mut params: AnomalyParams = serde_json::from_value(params)
            .map_err(|e| agent_core::Error::InvalidInput(format!("Invalid parameters: {e}")))?;

        params.ticker = params.ticker.trim().to_string();
        if params.ticker.is_empty() {
            return Err(agent_core::Error::InvalidInput(
                "ticker must not be empty (e.g. 'AAPL')".to_string(),
            ));
        }

        self.run(params).await.map_err(agent_core::Error::from)
    }

    fn name(&self) -> &str {
        "anomaly_detection"
    }

    fn description(&self) -> &str {
        "Detects financial anomalies using simple average and regression trend analysis. \
         REQUIRES both ticker (e.g., 'AAPL') and period (e.g., 'Q3 2024') parameters. \
         Returns 'simpleAverages' (current quarter vs historical averages) and \
         'linearRegression' (current quarter vs projected trend), each mapping metric names to \
         'Higher than expected', 'Lower than expected', 'Changes within the tolerable range', \
         'No historical data', 'Model not valid' or 'Undetermined'."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Company ticker symbol, e.g. 'AAPL'"
                },
                "period": {
                    "type": "string",
                    "pattern": "^Q[1-4] \\d{4}$",
                    "description": "Analysis period in the format 'Q<1-4> YYYY'; only earlier quarters are used"
                },
                "include_details": {
                    "type": "boolean",
                    "description": "Include expected values, deviations and fit quality (default false)"
                }
            },
            "required": ["ticker", "period"]
        })
    }
}
