//! Anomaly detection tools for LLM agents

pub mod anomaly_detection;

pub use anomaly_detection::AnomalyDetectionTool;
