//! Classical moving-average decomposition.
//!
//! Splits a series into three components:
//! - Trend: centred moving average over one full period
//! - Seasonal: per-phase average of the detrended series
//! - Residual: whatever trend and seasonal leave unexplained
//!
//! The components combine additively (`y = T + S + R`) or multiplicatively
//! (`y = T * S * R`).

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::utils::stats::{linear_fit, mean, variance};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seasonal period used by the pipeline.
pub const SEASONAL_PERIOD: usize = 30;

/// How the components combine into the observed series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionMode {
    #[default]
    Additive,
    Multiplicative,
}

impl DecompositionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecompositionMode::Additive => "additive",
            DecompositionMode::Multiplicative => "multiplicative",
        }
    }
}

impl fmt::Display for DecompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecompositionMode {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(DecompositionMode::Additive),
            "multiplicative" => Ok(DecompositionMode::Multiplicative),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown decomposition mode '{}' (expected additive or multiplicative)",
                other
            ))),
        }
    }
}

/// Result of a classical decomposition.
///
/// All four series share the observed series' timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompositionResult {
    pub mode: DecompositionMode,
    pub period: usize,
    pub observed: TimeSeries,
    pub trend: TimeSeries,
    pub seasonal: TimeSeries,
    pub residual: TimeSeries,
}

impl DecompositionResult {
    /// Recombine trend, seasonal and residual.
    pub fn reconstruct(&self) -> Vec<f64> {
        let parts = self
            .trend
            .values()
            .iter()
            .zip(self.seasonal.values())
            .zip(self.residual.values());
        match self.mode {
            DecompositionMode::Additive => parts.map(|((t, s), r)| t + s + r).collect(),
            DecompositionMode::Multiplicative => parts.map(|((t, s), r)| t * s * r).collect(),
        }
    }

    /// Get the seasonal strength (0 to 1).
    ///
    /// Multiplicative components are measured on the log scale; a
    /// non-positive component there yields NaN.
    pub fn seasonal_strength(&self) -> f64 {
        let (seasonal, residual) = (self.scaled(&self.seasonal), self.scaled(&self.residual));
        strength(&seasonal, &residual)
    }

    /// Get the trend strength (0 to 1).
    pub fn trend_strength(&self) -> f64 {
        let (trend, residual) = (self.scaled(&self.trend), self.scaled(&self.residual));
        strength(&trend, &residual)
    }

    fn scaled(&self, component: &TimeSeries) -> Vec<f64> {
        match self.mode {
            DecompositionMode::Additive => component.values().to_vec(),
            DecompositionMode::Multiplicative => {
                component.values().iter().map(|v| v.ln()).collect()
            }
        }
    }
}

fn strength(component: &[f64], residual: &[f64]) -> f64 {
    let combined: Vec<f64> = component
        .iter()
        .zip(residual)
        .map(|(c, r)| c + r)
        .collect();
    let var_combined = variance(&combined);
    if var_combined.is_nan() {
        return f64::NAN;
    }
    if var_combined < 1e-10 {
        return 0.0;
    }
    (1.0 - variance(residual) / var_combined).max(0.0)
}

/// Classical seasonal decomposition with a fixed period.
///
/// # Example
/// ```
/// use forecast_explorer::seasonality::{DecompositionMode, SeasonalDecomposition};
/// use forecast_explorer::core::TimeSeries;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps: Vec<_> = (0..48).map(|i| base + Duration::days(i)).collect();
/// let values: Vec<f64> = (0..48).map(|i| 10.0 + (i % 12) as f64).collect();
/// let ts = TimeSeries::new(timestamps, values).unwrap();
///
/// let result = SeasonalDecomposition::new(DecompositionMode::Additive)
///     .with_period(12)
///     .decompose(&ts)
///     .unwrap();
/// assert_eq!(result.trend.len(), 48);
/// ```
#[derive(Debug, Clone)]
pub struct SeasonalDecomposition {
    mode: DecompositionMode,
    period: usize,
}

impl SeasonalDecomposition {
    /// Create a decomposer with the default period of 30.
    pub fn new(mode: DecompositionMode) -> Self {
        Self {
            mode,
            period: SEASONAL_PERIOD,
        }
    }

    /// Set a custom seasonal period.
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    pub fn mode(&self) -> DecompositionMode {
        self.mode
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Decompose the series into trend, seasonal and residual components.
    pub fn decompose(&self, series: &TimeSeries) -> Result<DecompositionResult> {
        let period = self.period;
        if period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                period
            )));
        }

        let values = series.values();
        let n = values.len();
        if n < 2 * period {
            return Err(ForecastError::InsufficientData {
                needed: 2 * period,
                got: n,
            });
        }
        if series.has_missing_values() {
            return Err(ForecastError::MissingValues);
        }
        if self.mode == DecompositionMode::Multiplicative && values.iter().any(|&v| v <= 0.0) {
            return Err(ForecastError::NonPositiveValues);
        }

        let mut trend = centered_moving_average(values, period);
        extrapolate_edges(&mut trend, period);

        let detrended: Vec<f64> = match self.mode {
            DecompositionMode::Additive => values.iter().zip(&trend).map(|(y, t)| y - t).collect(),
            DecompositionMode::Multiplicative => {
                values.iter().zip(&trend).map(|(y, t)| y / t).collect()
            }
        };

        let mut indices: Vec<f64> = (0..period)
            .map(|phase| {
                let same_phase: Vec<f64> =
                    detrended.iter().skip(phase).step_by(period).copied().collect();
                mean(&same_phase)
            })
            .collect();

        let centre = mean(&indices);
        match self.mode {
            DecompositionMode::Additive => indices.iter_mut().for_each(|s| *s -= centre),
            DecompositionMode::Multiplicative => indices.iter_mut().for_each(|s| *s /= centre),
        }

        let seasonal: Vec<f64> = (0..n).map(|i| indices[i % period]).collect();

        let residual: Vec<f64> = match self.mode {
            DecompositionMode::Additive => (0..n)
                .map(|i| values[i] - trend[i] - seasonal[i])
                .collect(),
            DecompositionMode::Multiplicative => (0..n)
                .map(|i| values[i] / (trend[i] * seasonal[i]))
                .collect(),
        };

        Ok(DecompositionResult {
            mode: self.mode,
            period,
            observed: series.clone(),
            trend: component(series, "trend", trend)?,
            seasonal: component(series, "seasonal", seasonal)?,
            residual: component(series, "residual", residual)?,
        })
    }
}

impl Default for SeasonalDecomposition {
    fn default() -> Self {
        Self::new(DecompositionMode::Additive)
    }
}

fn component(series: &TimeSeries, name: &str, values: Vec<f64>) -> Result<TimeSeries> {
    let mut ts = series.with_values(values)?;
    ts.set_name(name);
    Ok(ts)
}

/// Centred moving average spanning one period.
///
/// Even periods use the `2 x period` filter with half weights on both ends.
/// The first and last `period / 2` positions are NaN.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0 / period as f64; period + 1];
        w[0] = 0.5 / period as f64;
        w[period] = 0.5 / period as f64;
        w
    } else {
        vec![1.0 / period as f64; period]
    };

    let n = values.len();
    let half = weights.len() / 2;
    let mut trend = vec![f64::NAN; n];
    if n < weights.len() {
        return trend;
    }

    for t in half..n - half {
        trend[t] = weights
            .iter()
            .zip(&values[t - half..])
            .map(|(w, y)| w * y)
            .sum();
    }
    trend
}

/// Replace leading and trailing NaNs with least-squares lines fitted to the
/// nearest `npoints` defined trend values on each side.
fn extrapolate_edges(trend: &mut [f64], npoints: usize) {
    let n = trend.len();
    let (front, back) = match (
        trend.iter().position(|v| !v.is_nan()),
        trend.iter().rposition(|v| !v.is_nan()),
    ) {
        (Some(front), Some(back)) => (front, back),
        _ => return,
    };

    let front_last = (front + npoints).min(back);
    let (slope, intercept) = fit_segment(trend, front, front_last);
    for i in 0..front {
        trend[i] = slope * i as f64 + intercept;
    }

    let back_first = back.saturating_sub(npoints).max(front);
    let (slope, intercept) = fit_segment(trend, back_first, back);
    for i in back + 1..n {
        trend[i] = slope * i as f64 + intercept;
    }
}

fn fit_segment(trend: &[f64], start: usize, end: usize) -> (f64, f64) {
    // Degenerate segments (a single defined point) fall back to that point.
    if end <= start {
        return (0.0, trend[start]);
    }
    let x: Vec<f64> = (start..end).map(|i| i as f64).collect();
    linear_fit(&x, &trend[start..end])
}
