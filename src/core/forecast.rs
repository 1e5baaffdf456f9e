//! Forecast containers: raw point predictions and dated, method-tagged results.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Point predictions for the steps after the fitted data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    point: Vec<f64>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { point: values }
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Point predictions.
    pub fn primary(&self) -> &[f64] {
        &self.point
    }

    pub fn into_values(self) -> Vec<f64> {
        self.point
    }
}

/// Forecasting method together with its user-chosen parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ForecastMethod {
    MovingAverage { window: usize },
    ExponentialSmoothing { alpha: f64 },
}

impl ForecastMethod {
    /// Display name used in messages and the accuracy section.
    pub fn display_name(&self) -> &'static str {
        match self {
            ForecastMethod::MovingAverage { .. } => "Simple Moving Average",
            ForecastMethod::ExponentialSmoothing { .. } => "Exponential Smoothing",
        }
    }

    /// Legend label for the forecast chart line.
    pub fn chart_label(&self) -> String {
        match self {
            ForecastMethod::MovingAverage { window } => {
                format!("SMA (Window={}) Forecast", window)
            }
            ForecastMethod::ExponentialSmoothing { alpha } => {
                format!("Exponential Smoothing (Alpha={:.2}) Forecast", alpha)
            }
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Dated forecast produced by one forecaster call.
///
/// `series` holds every charted point. Points from `out_of_sample_start`
/// onward lie strictly after the training window; anything before is an
/// in-sample estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    method: ForecastMethod,
    series: TimeSeries,
    out_of_sample_start: usize,
}

impl ForecastResult {
    /// Result holding only out-of-sample points.
    pub fn out_of_sample(
        method: ForecastMethod,
        timestamps: Vec<DateTime<Utc>>,
        forecast: Forecast,
    ) -> Result<Self> {
        let series = TimeSeries::new(timestamps, forecast.into_values())?;
        Ok(Self {
            method,
            series,
            out_of_sample_start: 0,
        })
    }

    /// Result whose first `in_sample_len` points are in-sample estimates.
    pub fn with_in_sample(
        method: ForecastMethod,
        series: TimeSeries,
        in_sample_len: usize,
    ) -> Result<Self> {
        if in_sample_len > series.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index: in_sample_len,
                size: series.len(),
            });
        }
        Ok(Self {
            method,
            series,
            out_of_sample_start: in_sample_len,
        })
    }

    pub fn method(&self) -> ForecastMethod {
        self.method
    }

    /// All charted points.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Number of out-of-sample steps.
    pub fn horizon(&self) -> usize {
        self.series.len() - self.out_of_sample_start
    }

    /// Values after the training window.
    pub fn future_values(&self) -> &[f64] {
        &self.series.values()[self.out_of_sample_start..]
    }

    /// Timestamps after the training window.
    pub fn future_timestamps(&self) -> &[DateTime<Utc>] {
        &self.series.timestamps()[self.out_of_sample_start..]
    }

    /// In-sample estimates charted ahead of the horizon.
    pub fn in_sample_values(&self) -> &[f64] {
        &self.series.values()[..self.out_of_sample_start]
    }
}
