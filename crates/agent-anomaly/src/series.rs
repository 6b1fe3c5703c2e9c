//! Time-series normalization and the current/history split

use crate::error::{AnomalyError, Result};
use crate::period::Period;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All observed metric values for one reporting period, keyed by metric name
pub type MetricSnapshot = BTreeMap<String, f64>;

/// Raw input: period label → snapshot, in no particular order
pub type LabeledHistory = BTreeMap<String, MetricSnapshot>;

/// One period's snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub period: Period,
    pub metrics: MetricSnapshot,
}

impl PeriodSnapshot {
    pub fn new(period: Period, metrics: MetricSnapshot) -> Self {
        Self { period, metrics }
    }

    /// Value of `metric` in this period, if observed
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.metrics.get(metric).copied()
    }
}

/// Chronologically ordered snapshots for a single ticker
///
/// Non-empty, sorted ascending, with no two entries sharing a period.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    entries: Vec<PeriodSnapshot>,
}

impl TimeSeries {
    /// Build a series from already-typed snapshots
    pub fn new(mut entries: Vec<PeriodSnapshot>) -> Result<Self> {
        if entries.is_empty() {
            return Err(AnomalyError::InsufficientHistory { found: 0 });
        }

        entries.sort_by_key(|entry| entry.period);
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].period == pair[1].period) {
            return Err(AnomalyError::DuplicatePeriod(pair[0].period.to_string()));
        }

        Ok(Self { entries })
    }

    /// Normalize a label-keyed history into a series
    ///
    /// Fails on the first label that is not a valid `"Q<1-4> <year>"` period.
    pub fn from_labeled<I, K>(history: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, MetricSnapshot)>,
        K: AsRef<str>,
    {
        let entries = history
            .into_iter()
            .map(|(label, metrics)| Ok(PeriodSnapshot::new(Period::parse(label.as_ref())?, metrics)))
            .collect::<Result<Vec<_>>>()?;

        Self::new(entries)
    }

    /// Snapshots in ascending period order
    pub fn entries(&self) -> &[PeriodSnapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split off the latest period from everything before it
    ///
    /// Requires at least two periods so both detectors have a history to work with.
    pub fn split(&self) -> Result<SplitSeries<'_>> {
        let Some((current, history)) = self.entries.split_last() else {
            return Err(AnomalyError::InsufficientHistory { found: 0 });
        };
        if history.is_empty() {
            return Err(AnomalyError::InsufficientHistory {
                found: self.entries.len(),
            });
        }

        Ok(SplitSeries { current, history })
    }
}

/// A series partitioned into the current period and its history
#[derive(Debug, Clone, Copy)]
pub struct SplitSeries<'a> {
    /// The chronologically last period
    pub current: &'a PeriodSnapshot,
    /// Every earlier period, ascending; never empty
    pub history: &'a [PeriodSnapshot],
}

impl SplitSeries<'_> {
    /// `(period index, value)` pairs for `metric` across the history, skipping gaps
    pub fn metric_points(&self, metric: &str) -> Vec<(f64, f64)> {
        self.history
            .iter()
            .filter_map(|entry| entry.value(metric).map(|value| (entry.period.index(), value)))
            .collect()
    }
}
