//! Simple Exponential Smoothing (SES) forecasting model.
//!
//! SES is suitable for forecasting data with no clear trend or seasonality.

use crate::core::{Forecast, ForecastMethod, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;

/// Simple Exponential Smoothing forecaster with a fixed smoothing level.
///
/// The model equation is:
/// `level_t = α × y_t + (1-α) × level_{t-1}`
///
/// where α (alpha) is the smoothing parameter (0 < α ≤ 1). The level starts
/// at the first observation and alpha is never re-estimated.
///
/// # Example
/// ```
/// use forecast_explorer::models::exponential::SimpleExponentialSmoothing;
/// use forecast_explorer::models::Forecaster;
/// use forecast_explorer::core::TimeSeries;
/// use chrono::{TimeZone, Utc, Duration};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps: Vec<_> = (0..10).map(|i| base + Duration::days(i)).collect();
/// let values = vec![10.0, 12.0, 11.0, 13.0, 12.0, 14.0, 13.0, 15.0, 14.0, 16.0];
/// let ts = TimeSeries::new(timestamps, values).unwrap();
///
/// let mut model = SimpleExponentialSmoothing::new(0.3).unwrap();
/// model.fit(&ts).unwrap();
///
/// let forecast = model.predict(3).unwrap();
/// assert_eq!(forecast.horizon(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleExponentialSmoothing {
    /// Smoothing parameter (0 < alpha <= 1).
    alpha: f64,
    /// Current level state.
    level: Option<f64>,
    /// Fitted values.
    fitted: Option<Vec<f64>>,
    /// Residuals.
    residuals: Option<Vec<f64>>,
}

impl SimpleExponentialSmoothing {
    /// Create a new SES model with a fixed smoothing parameter.
    ///
    /// # Arguments
    /// * `alpha` - Smoothing parameter (0 < alpha <= 1)
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "smoothing level alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        Ok(Self {
            alpha,
            level: None,
            fitted: None,
            residuals: None,
        })
    }

    /// Get the smoothing parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Get the current level.
    pub fn level(&self) -> Option<f64> {
        self.level
    }

    /// Sum of squared one-step errors of the fitted model.
    pub fn sse(&self) -> Option<f64> {
        self.residuals
            .as_ref()
            .map(|r| r.iter().skip(1).map(|e| e * e).sum())
    }
}

impl Forecaster for SimpleExponentialSmoothing {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let alpha = self.alpha;
        let mut level = values[0];
        let mut fitted = Vec::with_capacity(values.len());
        let mut residuals = Vec::with_capacity(values.len());

        // First fitted value is the initial level
        fitted.push(level);
        residuals.push(0.0);

        for &y in &values[1..] {
            fitted.push(level);
            residuals.push(y - level);
            level = alpha * y + (1.0 - alpha) * level;
        }

        self.level = Some(level);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let level = self.level.ok_or(ForecastError::FitRequired)?;

        // SES produces flat forecasts at the final level
        Ok(Forecast::from_values(vec![level; horizon]))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SimpleExponentialSmoothing"
    }

    fn method(&self) -> ForecastMethod {
        ForecastMethod::ExponentialSmoothing { alpha: self.alpha }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn make_series(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..values.len())
            .map(|i| base + Duration::days(i as i64))
            .collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    #[test]
    fn ses_with_fixed_alpha_is_flat() {
        let ts = make_series(vec![
            10.0, 12.0, 11.0, 13.0, 12.0, 14.0, 13.0, 15.0, 14.0, 16.0,
        ]);

        let mut model = SimpleExponentialSmoothing::new(0.3).unwrap();
        model.fit(&ts).unwrap();

        assert_relative_eq!(model.alpha(), 0.3, epsilon = 1e-10);
        let forecast = model.predict(3).unwrap();
        let preds = forecast.primary();
        assert_relative_eq!(preds[0], preds[1], epsilon = 1e-10);
        assert_relative_eq!(preds[1], preds[2], epsilon = 1e-10);
        assert_relative_eq!(preds[0], model.level().unwrap(), epsilon = 1e-10);
    }

    #[test]
    fn ses_alpha_one_is_naive() {
        let ts = make_series(vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        let mut model = SimpleExponentialSmoothing::new(1.0).unwrap();
        model.fit(&ts).unwrap();

        let forecast = model.predict(1).unwrap();
        assert_relative_eq!(forecast.primary()[0], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn ses_known_calculation() {
        let ts = make_series(vec![10.0, 12.0, 14.0, 13.0]);

        let mut model = SimpleExponentialSmoothing::new(0.5).unwrap();
        model.fit(&ts).unwrap();

        // l_0 = 10
        // l_1 = 0.5*12 + 0.5*10 = 11
        // l_2 = 0.5*14 + 0.5*11 = 12.5
        // l_3 = 0.5*13 + 0.5*12.5 = 12.75
        assert_relative_eq!(model.level().unwrap(), 12.75, epsilon = 1e-10);

        let fitted = model.fitted_values().unwrap();
        assert_relative_eq!(fitted[0], 10.0, epsilon = 1e-10);
        assert_relative_eq!(fitted[1], 10.0, epsilon = 1e-10);
        assert_relative_eq!(fitted[2], 11.0, epsilon = 1e-10);
        assert_relative_eq!(fitted[3], 12.5, epsilon = 1e-10);

        // errors: 2, 3, 0.5
        assert_relative_eq!(model.sse().unwrap(), 4.0 + 9.0 + 0.25, epsilon = 1e-10);
    }

    #[test]
    fn ses_constant_series() {
        let ts = make_series(vec![5.0; 10]);
        let mut model = SimpleExponentialSmoothing::new(0.5).unwrap();
        model.fit(&ts).unwrap();

        for pred in model.predict(3).unwrap().primary() {
            assert_relative_eq!(*pred, 5.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn ses_rejects_alpha_outside_unit_interval() {
        assert!(matches!(
            SimpleExponentialSmoothing::new(0.0),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(SimpleExponentialSmoothing::new(1.5).is_err());
        assert!(SimpleExponentialSmoothing::new(f64::NAN).is_err());
    }

    #[test]
    fn ses_empty_data_and_unfitted_errors() {
        let ts = make_series(vec![]);
        let mut model = SimpleExponentialSmoothing::new(0.3).unwrap();
        assert!(matches!(model.fit(&ts), Err(ForecastError::EmptyData)));
        assert!(matches!(model.predict(5), Err(ForecastError::FitRequired)));
    }

    #[test]
    fn ses_high_alpha_responds_quickly() {
        let ts = make_series(vec![
            10.0, 10.0, 10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 20.0, 20.0,
        ]);

        let mut model_low = SimpleExponentialSmoothing::new(0.1).unwrap();
        let mut model_high = SimpleExponentialSmoothing::new(0.9).unwrap();
        model_low.fit(&ts).unwrap();
        model_high.fit(&ts).unwrap();

        assert!(model_high.level().unwrap() > model_low.level().unwrap());
    }

    #[test]
    fn ses_zero_horizon_returns_empty() {
        let ts = make_series(vec![1.0, 2.0, 3.0]);
        let mut model = SimpleExponentialSmoothing::new(0.3).unwrap();
        model.fit(&ts).unwrap();
        assert_eq!(model.predict(0).unwrap().horizon(), 0);
    }
}
