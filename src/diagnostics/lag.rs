//! Lag plot: each observation against the one `lag` steps later.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::utils::stats::mean;
use serde::Serialize;

/// Scatter data for a lag plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagPlot {
    pub lag: usize,
    /// `(y_t, y_{t+lag})` for every `t` with a partner.
    pub pairs: Vec<(f64, f64)>,
    /// Sample autocorrelation at `lag`.
    pub autocorrelation: f64,
}

impl LagPlot {
    /// Build the lag plot over the whole series.
    ///
    /// # Example
    /// ```
    /// use forecast_explorer::diagnostics::LagPlot;
    /// use forecast_explorer::core::TimeSeries;
    /// use chrono::{Duration, TimeZone, Utc};
    ///
    /// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let timestamps: Vec<_> = (0..4).map(|i| base + Duration::days(i)).collect();
    /// let ts = TimeSeries::new(timestamps, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    ///
    /// let plot = LagPlot::compute(&ts, 2).unwrap();
    /// assert_eq!(plot.pairs, vec![(1.0, 3.0), (2.0, 4.0)]);
    /// ```
    pub fn compute(series: &TimeSeries, lag: usize) -> Result<Self> {
        if lag == 0 {
            return Err(ForecastError::InvalidParameter(
                "lag must be at least 1".to_string(),
            ));
        }

        let values = series.values();
        if values.len() <= lag {
            return Err(ForecastError::InsufficientData {
                needed: lag + 1,
                got: values.len(),
            });
        }

        let pairs = values
            .iter()
            .zip(&values[lag..])
            .map(|(&a, &b)| (a, b))
            .collect();

        Ok(Self {
            lag,
            pairs,
            autocorrelation: autocorrelation(values, lag),
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Chart title.
    pub fn title(&self) -> String {
        format!("Lag Plot (Lag={})", self.lag)
    }
}

/// Returns the autocorrelation at a specific lag.
///
/// A constant series has zero autocorrelation; a series no longer than
/// `lag` yields NaN.
pub fn autocorrelation(series: &[f64], lag: usize) -> f64 {
    if series.len() <= lag {
        return f64::NAN;
    }

    let m = mean(series);

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &x) in series.iter().enumerate() {
        denominator += (x - m).powi(2);
        if i >= lag {
            numerator += (x - m) * (series[i - lag] - m);
        }
    }

    if denominator < 1e-10 {
        return 0.0;
    }

    numerator / denominator
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
    fn lag_one_pairs_consecutive_values() {
        let plot = LagPlot::compute(&make_series(vec![5.0, 6.0, 8.0]), 1).unwrap();
        assert_eq!(plot.pairs, vec![(5.0, 6.0), (6.0, 8.0)]);
        assert_eq!(plot.len(), 2);
        assert_eq!(plot.title(), "Lag Plot (Lag=1)");
    }

    #[test]
    fn lag_must_be_positive_and_shorter_than_series() {
        let ts = make_series(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            LagPlot::compute(&ts, 0),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            LagPlot::compute(&ts, 3),
            Err(ForecastError::InsufficientData { needed: 4, got: 3 })
        ));
    }

    #[test]
    fn autocorrelation_of_trend_is_high() {
        let values: Vec<f64> = (0..50).map(f64::from).collect();
        assert!(autocorrelation(&values, 1) > 0.9);
    }

    #[test]
    fn autocorrelation_of_alternating_series_is_negative() {
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert_relative_eq!(autocorrelation(&values, 1), -0.95, epsilon = 1e-10);
    }

    #[test]
    fn autocorrelation_edge_cases() {
        assert_eq!(autocorrelation(&[3.0; 10], 2), 0.0);
        assert!(autocorrelation(&[1.0, 2.0], 2).is_nan());
    }
}
