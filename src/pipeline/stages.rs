//! Stage functions. Each takes the outputs of earlier stages and returns a
//! fresh value; none of them touch shared state.

use crate::core::{ForecastMethod, ForecastResult, TimeSeries};
use crate::diagnostics::LagPlot;
use crate::error::Result;
use crate::io::CsvTable;
use crate::models::baseline::SimpleMovingAverage;
use crate::models::exponential::SimpleExponentialSmoothing;
use crate::models::BoxedForecaster;
use crate::pipeline::config::TRAIN_FRACTION;
use crate::seasonality::{DecompositionMode, DecompositionResult, SeasonalDecomposition};
use crate::utils::{self, MetricsReport};

pub fn parse_table(bytes: &[u8]) -> Result<CsvTable> {
    CsvTable::from_bytes(bytes)
}

pub use crate::io::extract_series;

pub fn decompose(series: &TimeSeries, mode: DecompositionMode) -> Result<DecompositionResult> {
    SeasonalDecomposition::new(mode).decompose(series)
}

/// Positional train/test split; the test part is the forecast horizon.
pub fn split(series: &TimeSeries) -> Result<(TimeSeries, TimeSeries)> {
    series.split_at_fraction(TRAIN_FRACTION)
}

/// Forecaster configured for `method`.
pub fn build_forecaster(method: ForecastMethod) -> Result<BoxedForecaster> {
    Ok(match method {
        ForecastMethod::MovingAverage { window } => Box::new(SimpleMovingAverage::new(window)?),
        ForecastMethod::ExponentialSmoothing { alpha } => {
            Box::new(SimpleExponentialSmoothing::new(alpha)?)
        }
    })
}

pub fn forecast(method: ForecastMethod, train: &TimeSeries, horizon: usize) -> Result<ForecastResult> {
    build_forecaster(method)?.forecast(train, horizon)
}

pub fn lag_plot(series: &TimeSeries, lag: usize) -> Result<LagPlot> {
    LagPlot::compute(series, lag)
}

pub fn evaluate(result: &ForecastResult, test: &TimeSeries) -> Result<MetricsReport> {
    utils::evaluate(result, test)
}
