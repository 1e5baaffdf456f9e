//! # forecast-explorer
//!
//! Explore a CSV time series: classical seasonal decomposition, naive
//! forecasts (simple moving average, simple exponential smoothing) scored
//! against a held-out tail, and a lag-plot diagnostic.
//!
//! The [`pipeline`] module ties the stages together and produces a
//! [`report::PipelineReport`] holding messages, tables and chart data.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod diagnostics;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod seasonality;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, ForecastMethod, ForecastResult, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::Forecaster;
    pub use crate::pipeline::{run, MethodKind, PipelineConfig, ReactivePipeline};
    pub use crate::report::PipelineReport;
    pub use crate::seasonality::{DecompositionMode, SeasonalDecomposition};
    pub use crate::utils::{calculate_metrics, MetricsReport};
}
