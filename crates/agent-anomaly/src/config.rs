//! Configuration for anomaly detection

use crate::error::{AnomalyError, Result};
use agent_utils::parse_var;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding [`AnomalyConfig::deviation_threshold`]
pub const ENV_DEVIATION_THRESHOLD: &str = "ANOMALY_DEVIATION_THRESHOLD";
/// Environment variable overriding [`AnomalyConfig::min_r_squared`]
pub const ENV_MIN_R_SQUARED: &str = "ANOMALY_MIN_R_SQUARED";
/// Environment variable overriding [`AnomalyConfig::min_trend_points`]
pub const ENV_MIN_TREND_POINTS: &str = "ANOMALY_MIN_TREND_POINTS";
/// Environment variable overriding [`AnomalyConfig::zero_epsilon`]
pub const ENV_ZERO_EPSILON: &str = "ANOMALY_ZERO_EPSILON";
/// Environment variable overriding [`AnomalyConfig::cache_ttl`], in seconds
pub const ENV_CACHE_TTL_SECS: &str = "ANOMALY_CACHE_TTL_SECS";

/// Configuration for anomaly detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Relative deviation beyond which a metric is flagged
    ///
    /// A deviation of `(current - expected) / |expected|` above `+threshold` is
    /// "higher than expected", below `-threshold` "lower than expected".
    pub deviation_threshold: f64,

    /// Minimum coefficient of determination for the trend fit
    ///
    /// Fits explaining less of the historical variance than this are reported as
    /// "model not valid" instead of being projected.
    pub min_r_squared: f64,

    /// Minimum number of historical points required before fitting a trend
    pub min_trend_points: usize,

    /// Expected values with a magnitude below this are treated as zero
    pub zero_epsilon: f64,

    /// How long fetched histories stay cached
    pub cache_ttl: Duration,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            deviation_threshold: 0.10,
            min_r_squared: 0.70,
            min_trend_points: 2,
            zero_epsilon: 1e-9,
            cache_ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl AnomalyConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnomalyConfigBuilder {
        AnomalyConfigBuilder::default()
    }

    /// Tighter gate: smaller deviations flagged, better fits required
    pub fn strict() -> Self {
        Self {
            deviation_threshold: 0.05,
            min_r_squared: 0.85,
            min_trend_points: 3,
            ..Self::default()
        }
    }

    /// Looser gate: only large deviations flagged, weaker fits accepted
    pub fn permissive() -> Self {
        Self {
            deviation_threshold: 0.20,
            min_r_squared: 0.50,
            ..Self::default()
        }
    }

    /// Load the default configuration with overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.deviation_threshold.is_finite() || self.deviation_threshold < 0.0 {
            return Err(AnomalyError::ConfigError(format!(
                "deviation_threshold must be a non-negative number, got {}",
                self.deviation_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.min_r_squared) {
            return Err(AnomalyError::ConfigError(format!(
                "min_r_squared must be in [0, 1], got {}",
                self.min_r_squared
            )));
        }

        if self.min_trend_points < 2 {
            return Err(AnomalyError::ConfigError(format!(
                "min_trend_points must be >= 2 for a regression fit, got {}",
                self.min_trend_points
            )));
        }

        if !self.zero_epsilon.is_finite() || self.zero_epsilon < 0.0 {
            return Err(AnomalyError::ConfigError(format!(
                "zero_epsilon must be a non-negative number, got {}",
                self.zero_epsilon
            )));
        }

        Ok(())
    }
}

/// Builder for AnomalyConfig
#[derive(Debug, Default)]
pub struct AnomalyConfigBuilder {
    deviation_threshold: Option<f64>,
    min_r_squared: Option<f64>,
    min_trend_points: Option<usize>,
    zero_epsilon: Option<f64>,
    cache_ttl: Option<Duration>,
}

impl AnomalyConfigBuilder {
    /// Set the deviation threshold
    pub fn deviation_threshold(mut self, threshold: f64) -> Self {
        self.deviation_threshold = Some(threshold);
        self
    }

    /// Set the minimum R² for trend projection
    pub fn min_r_squared(mut self, r_squared: f64) -> Self {
        self.min_r_squared = Some(r_squared);
        self
    }

    /// Set the minimum number of historical points for a trend fit
    pub fn min_trend_points(mut self, points: usize) -> Self {
        self.min_trend_points = Some(points);
        self
    }

    /// Set the zero-denominator epsilon
    pub fn zero_epsilon(mut self, epsilon: f64) -> Self {
        self.zero_epsilon = Some(epsilon);
        self
    }

    /// Set the history cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> Result<Self> {
        self.with_lookup(agent_utils::env_lookup)
    }

    /// Apply overrides read through `lookup`
    ///
    /// Variables that are unset keep whatever the builder already holds.
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, ENV_DEVIATION_THRESHOLD)? {
            self.deviation_threshold = Some(v);
        }
        if let Some(v) = parse_var(&lookup, ENV_MIN_R_SQUARED)? {
            self.min_r_squared = Some(v);
        }
        if let Some(v) = parse_var(&lookup, ENV_MIN_TREND_POINTS)? {
            self.min_trend_points = Some(v);
        }
        if let Some(v) = parse_var(&lookup, ENV_ZERO_EPSILON)? {
            self.zero_epsilon = Some(v);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_CACHE_TTL_SECS)? {
            self.cache_ttl = Some(Duration::from_secs(secs));
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnomalyConfig> {
        let defaults = AnomalyConfig::default();

        let config = AnomalyConfig {
            deviation_threshold: self.deviation_threshold.unwrap_or(defaults.deviation_threshold),
            min_r_squared: self.min_r_squared.unwrap_or(defaults.min_r_squared),
            min_trend_points: self.min_trend_points.unwrap_or(defaults.min_trend_points),
            zero_epsilon: self.zero_epsilon.unwrap_or(defaults.zero_epsilon),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}
