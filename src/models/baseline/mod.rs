//! Baseline forecasting models.

mod sma;

pub use sma::SimpleMovingAverage;
