//! TimeSeries data structure for representing dated observations.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// A univariate time series with timestamps and values.
///
/// Timestamps are non-decreasing. Repeated timestamps are kept as they
/// appear in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Builder for constructing TimeSeries.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    name: Option<String>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<TimeSeries> {
        let mut series = TimeSeries::new(self.timestamps, self.values)?;
        series.name = self.name;
        Ok(series)
    }
}

impl TimeSeries {
    /// Create a new series, validating lengths and ordering.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        if let Some(i) = (1..timestamps.len()).find(|&i| timestamps[i] < timestamps[i - 1]) {
            return Err(ForecastError::TimestampError(format!(
                "timestamps must be sorted ascending (position {} precedes position {})",
                i,
                i - 1
            )));
        }

        Ok(Self {
            timestamps,
            values,
            name: None,
        })
    }

    /// Create a builder for more complex configuration.
    pub fn builder() -> TimeSeriesBuilder {
        TimeSeriesBuilder::new()
    }

    /// Build a series sharing this series' index with different values.
    pub fn with_values(&self, values: Vec<f64>) -> Result<TimeSeries> {
        let mut series = TimeSeries::new(self.timestamps.clone(), values)?;
        series.name = self.name.clone();
        Ok(series)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Name of the series (the source column header when loaded from CSV).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the series name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Last observed value.
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Last timestamp.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Extract a slice of the time series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end {
            return Err(ForecastError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }

        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            name: self.name.clone(),
        })
    }

    /// Split positionally into leading and trailing parts.
    ///
    /// The leading part holds `floor(len * fraction)` observations.
    pub fn split_at_fraction(&self, fraction: f64) -> Result<(TimeSeries, TimeSeries)> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ForecastError::InvalidParameter(format!(
                "split fraction must be in [0, 1], got {}",
                fraction
            )));
        }
        let cut = (self.len() as f64 * fraction) as usize;
        Ok((self.slice(0, cut)?, self.slice(cut, self.len())?))
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Infer frequency from timestamps.
    ///
    /// Returns the modal positive spacing. Zero spacings from repeated
    /// timestamps are ignored. Fails when the modal spacing covers less than
    /// `tolerance` of the positive spacings.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Duration> {
        if self.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            let diff = (w[1] - w[0]).num_seconds();
            if diff > 0 {
                *counts.entry(diff).or_insert(0) += 1;
            }
        }

        // Ties resolve to the shorter spacing so the result is deterministic.
        let (modal_diff, modal_count) = counts
            .iter()
            .max_by(|(d1, c1), (d2, c2)| c1.cmp(c2).then(d2.cmp(d1)))
            .map(|(&diff, &count)| (diff, count))
            .ok_or_else(|| {
                ForecastError::TimestampError("no positive spacing between timestamps".to_string())
            })?;

        let total_count: usize = counts.values().sum();
        let modal_ratio = modal_count as f64 / total_count as f64;

        if modal_ratio < tolerance {
            return Err(ForecastError::TimestampError(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Duration::seconds(modal_diff))
    }

    /// Timestamps for `horizon` steps immediately after the last observation.
    ///
    /// The step is the inferred frequency, or one day when none can be
    /// inferred.
    pub fn future_timestamps(&self, horizon: usize) -> Result<Vec<DateTime<Utc>>> {
        let last = self.last_timestamp().ok_or(ForecastError::EmptyData)?;
        let step = self.infer_frequency(0.0).unwrap_or_else(|_| Duration::days(1));

        (1..=horizon)
            .map(|h| {
                i32::try_from(h)
                    .ok()
                    .and_then(|h| step.checked_mul(h))
                    .and_then(|offset| last.checked_add_signed(offset))
                    .ok_or_else(|| {
                        ForecastError::TimestampError(format!(
                            "forecast step {} lies outside the supported date range",
                            h
                        ))
                    })
            })
            .collect()
    }
}
