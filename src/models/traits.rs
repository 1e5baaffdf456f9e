//! Forecaster trait defining the common interface for all models.

use crate::core::{Forecast, ForecastMethod, ForecastResult, TimeSeries};
use crate::error::Result;

/// Common interface for all forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series data.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Generate predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Get the fitted values (in-sample predictions).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Get the residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Method tag carried by the results of this model.
    fn method(&self) -> ForecastMethod;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }

    /// Fit on `train` and project `horizon` steps onto the dates following it.
    fn forecast(&mut self, train: &TimeSeries, horizon: usize) -> Result<ForecastResult> {
        self.fit(train)?;
        let forecast = self.predict(horizon)?;
        let timestamps = train.future_timestamps(horizon)?;
        ForecastResult::out_of_sample(self.method(), timestamps, forecast)
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use forecast_explorer::models::{BoxedForecaster, Forecaster};
/// use forecast_explorer::models::baseline::SimpleMovingAverage;
///
/// let model: BoxedForecaster = Box::new(SimpleMovingAverage::new(7).unwrap());
/// assert_eq!(model.name(), "SimpleMovingAverage");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;
