//! Simple Moving Average forecaster.
//!
//! The in-sample part is a trailing rolling mean. The out-of-sample part is a
//! flat extension at the last observed value, not the last window mean.

use crate::core::{Forecast, ForecastMethod, ForecastResult, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;

/// Simple Moving Average forecaster.
///
/// `rolling_means()[t]` is the mean of `y[t - window + 1 ..= t]`, the
/// one-step-ahead estimate issued at `t`. The first `window - 1` positions
/// are undefined (NaN).
///
/// # Example
/// ```
/// use forecast_explorer::models::baseline::SimpleMovingAverage;
/// use forecast_explorer::models::Forecaster;
/// use forecast_explorer::core::TimeSeries;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps: Vec<_> = (0..5).map(|i| base + Duration::days(i)).collect();
/// let ts = TimeSeries::new(timestamps, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
///
/// let mut model = SimpleMovingAverage::new(2).unwrap();
/// let result = model.forecast(&ts, 2).unwrap();
/// assert_eq!(result.in_sample_values(), &[1.5, 2.5, 3.5, 4.5]);
/// assert_eq!(result.future_values(), &[5.0, 5.0]);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    window: usize,
    last_value: Option<f64>,
    rolling: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl SimpleMovingAverage {
    /// Create a new SMA with the given window size (at least 1).
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "moving average window must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            window,
            last_value: None,
            rolling: None,
            fitted: None,
            residuals: None,
        })
    }

    /// Get the window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Trailing rolling means indexed by the position they end at.
    pub fn rolling_means(&self) -> Option<&[f64]> {
        self.rolling.as_deref()
    }

    fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
        let mut result = vec![f64::NAN; values.len()];
        if values.len() < window {
            return result;
        }

        let mut sum: f64 = values[..window - 1].iter().sum();
        for end in window - 1..values.len() {
            sum += values[end];
            result[end] = sum / window as f64;
            sum -= values[end + 1 - window];
        }
        result
    }
}

impl Forecaster for SimpleMovingAverage {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let rolling = Self::rolling_mean(values, self.window);

        // The estimate for t is the window mean ending at t - 1.
        let fitted: Vec<f64> = std::iter::once(f64::NAN)
            .chain(rolling[..values.len() - 1].iter().copied())
            .collect();
        let residuals: Vec<f64> = values
            .iter()
            .zip(fitted.iter())
            .map(|(y, f)| y - f)
            .collect();

        self.last_value = series.last_value();
        self.rolling = Some(rolling);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let last = self.last_value.ok_or(ForecastError::FitRequired)?;
        Ok(Forecast::from_values(vec![last; horizon]))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SimpleMovingAverage"
    }

    fn method(&self) -> ForecastMethod {
        ForecastMethod::MovingAverage {
            window: self.window,
        }
    }

    /// Defined rolling means on their training dates, then the flat horizon.
    ///
    /// Each in-sample point is stamped with the date its window ends on: it is
    /// the estimate issued at `t` for `t + 1`, not a fitted value for `t`. The
    /// causal fit for `t` (the mean ending at `t - 1`) is in
    /// [`fitted_values`](Forecaster::fitted_values).
    fn forecast(&mut self, train: &TimeSeries, horizon: usize) -> Result<ForecastResult> {
        self.fit(train)?;
        let rolling = self.rolling.as_deref().ok_or(ForecastError::FitRequired)?;

        let mut timestamps = Vec::with_capacity(train.len() + horizon);
        let mut values = Vec::with_capacity(train.len() + horizon);
        for (ts, mean) in train.timestamps().iter().zip(rolling) {
            if !mean.is_nan() {
                timestamps.push(*ts);
                values.push(*mean);
            }
        }
        let in_sample_len = values.len();

        timestamps.extend(train.future_timestamps(horizon)?);
        values.extend(self.predict(horizon)?.into_values());

        let series = TimeSeries::new(timestamps, values)?;
        ForecastResult::with_in_sample(self.method(), series, in_sample_len)
    }
}
