//! Anomaly detection example
//!
//! Runs both detectors over a small in-memory history, first directly through
//! the engine and then through the agent-facing tool.
//!
//! To run this example:
//! ```bash
//! # Optional: tighten the tolerance band
//! export ANOMALY_DEVIATION_THRESHOLD=0.05
//!
//! cargo run --example detect_anomalies "Q1 2025"
//! ```

use agent_anomaly::{
    AnomalyConfig, AnomalyDetectionTool, AnomalyEngine, InMemoryHistorySource, LabeledHistory,
};
use agent_tools::{Tool, ToolRegistry};
use serde_json::json;
use std::env;
use std::sync::Arc;

const SAMPLE_HISTORY: &str = r#"{
    "AAPL": {
        "Q1 2024": {"total revenue": 90753.0, "net income": 23636.0, "basic eps": 1.53, "gross margin": 0.466},
        "Q2 2024": {"total revenue": 85777.0, "net income": 21448.0, "basic eps": 1.40, "gross margin": 0.463},
        "Q3 2024": {"total revenue": 94930.0, "net income": 14736.0, "basic eps": 0.97, "gross margin": 0.462},
        "Q4 2024": {"total revenue": 124300.0, "net income": 36330.0, "basic eps": 2.41, "gross margin": 0.469}
    },
    "MSFT": {
        "Q2 2024": {"total revenue": 64727.0, "net income": 22036.0},
        "Q3 2024": {"total revenue": 65585.0, "net income": 24667.0},
        "Q4 2024": {"total revenue": 69632.0, "net income": 24108.0}
    }
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agent_utils::init_tracing_with("info,agent_anomaly=debug");

    let period = env::args().nth(1).unwrap_or_else(|| "Q1 2025".to_string());

    println!("=== Financial Anomaly Detection ===\n");

    let config = Arc::new(AnomalyConfig::builder().with_env()?.build()?);
    println!("Configuration:");
    println!("  - Deviation threshold: {}", config.deviation_threshold);
    println!("  - Minimum R²: {}", config.min_r_squared);
    println!("  - Cache TTL: {:?}\n", config.cache_ttl);

    let engine = Arc::new(AnomalyEngine::new(Arc::clone(&config))?);

    // Direct engine call on a labeled history
    let history: LabeledHistory = serde_json::from_value(json!({
        "Q1 2024": {"revenueGrowth": 1.0},
        "Q2 2024": {"revenueGrowth": 1.0},
        "Q3 2024": {"revenueGrowth": 1.25}
    }))?;
    let report = engine.detect_labeled(history)?;
    println!("Engine report for {}:", report.current_period());
    println!("{}\n", serde_json::to_string_pretty(&report)?);

    // Agent-facing tool backed by an in-memory source
    let source = Arc::new(InMemoryHistorySource::from_json(SAMPLE_HISTORY)?);
    let tool = AnomalyDetectionTool::new(Arc::clone(&engine), source);

    let registry = ToolRegistry::new();
    registry.register(Arc::new(tool));

    for definition in registry.definitions() {
        println!("Registered tool: {}", definition.name);
    }
    println!();

    for ticker in ["AAPL", "MSFT", "TSLA"] {
        println!("--- {ticker} before {period} ---");
        let params = json!({"ticker": ticker, "period": period, "include_details": true});
        match registry.execute("anomaly_detection", params).await {
            Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
            Err(e) => println!("Analysis failed: {e}"),
        }
        println!();
    }

    // The tool can also be driven directly, bypassing the registry
    if let Some(tool) = registry.get("anomaly_detection") {
        println!("Tool description: {}", tool.description());
    }

    Ok(())
}
