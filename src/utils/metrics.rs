//! Accuracy metrics for forecast evaluation.

use crate::core::{ForecastMethod, ForecastResult, TimeSeries};
use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Accuracy metrics for one forecast against held-out actuals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Absolute Percentage Error (None if zeros in actual)
    pub mape: Option<f64>,
    /// Mean Squared Error
    pub mse: f64,
}

/// Calculate accuracy metrics between actual and predicted values.
///
/// # Arguments
/// * `actual` - Actual observed values
/// * `predicted` - Predicted/forecast values, index-aligned with `actual`
///
/// # Example
/// ```
/// use forecast_explorer::utils::calculate_metrics;
///
/// let metrics = calculate_metrics(&[2.0, 4.0, 6.0], &[2.0, 4.0, 8.0]).unwrap();
/// assert!((metrics.rmse - 1.1547).abs() < 1e-3);
/// assert!((metrics.mape.unwrap() - 11.11).abs() < 1e-2);
/// ```
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<MetricsReport> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let mse = mse(actual, predicted);

    Ok(MetricsReport {
        rmse: mse.sqrt(),
        mae: mae(actual, predicted),
        mape: mape(actual, predicted),
        mse,
    })
}

/// Select the predictions that line up with a test split of `test_len`.
///
/// Moving-average results mix in-sample and future points, so only the
/// trailing `test_len` entries are compared. Exponential-smoothing results
/// are purely out-of-sample and are used as they are.
pub fn align_predictions(result: &ForecastResult, test_len: usize) -> Result<&[f64]> {
    match result.method() {
        ForecastMethod::MovingAverage { .. } => {
            let values = result.series().values();
            if values.len() < test_len {
                return Err(ForecastError::DimensionMismatch {
                    expected: test_len,
                    got: values.len(),
                });
            }
            Ok(&values[values.len() - test_len..])
        }
        ForecastMethod::ExponentialSmoothing { .. } => {
            let values = result.future_values();
            if values.len() != test_len {
                return Err(ForecastError::DimensionMismatch {
                    expected: test_len,
                    got: values.len(),
                });
            }
            Ok(values)
        }
    }
}

/// Align a forecast with the test split and compute its metrics.
pub fn evaluate(result: &ForecastResult, test: &TimeSeries) -> Result<MetricsReport> {
    let predicted = align_predictions(result, test.len())?;
    calculate_metrics(test.values(), predicted)
}

/// Calculate MAE between two slices.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Calculate MSE between two slices.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

/// Calculate RMSE between two slices.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Calculate MAPE (in percent) between two slices.
///
/// Returns `None` when any actual value is zero.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() != predicted.len() || actual.is_empty() || actual.contains(&0.0) {
        return None;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| ((a - p) / a).abs())
        .sum();
    Some(100.0 * sum / actual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Forecast;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn dates(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    #[test]
    fn calculate_metrics_known_values() {
        let metrics = calculate_metrics(&[2.0, 4.0, 6.0], &[2.0, 4.0, 8.0]).unwrap();

        assert_relative_eq!(metrics.rmse, 1.1547, epsilon = 1e-3);
        assert_relative_eq!(metrics.mae, 0.6667, epsilon = 1e-3);
        assert_relative_eq!(metrics.mape.unwrap(), 11.11, epsilon = 1e-2);
        assert_relative_eq!(metrics.mse, 1.3333, epsilon = 1e-3);
    }

    #[test]
    fn calculate_metrics_perfect_prediction() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let metrics = calculate_metrics(&actual, &actual).unwrap();

        assert_relative_eq!(metrics.mae, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mse, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mape.unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn calculate_metrics_mape_with_zeros() {
        let metrics = calculate_metrics(&[0.0, 1.0, 2.0], &[0.1, 1.1, 2.1]).unwrap();

        assert!(metrics.mape.is_none());
        assert!(metrics.rmse.is_finite());
    }

    #[test]
    fn calculate_metrics_dimension_mismatch() {
        let result = calculate_metrics(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn calculate_metrics_empty_data() {
        assert!(matches!(
            calculate_metrics(&[], &[]),
            Err(ForecastError::EmptyData)
        ));
    }

    #[test]
    fn moving_average_alignment_takes_trailing_points() {
        let series = TimeSeries::new(dates(5), vec![1.5, 2.5, 3.5, 5.0, 5.0]).unwrap();
        let result =
            ForecastResult::with_in_sample(ForecastMethod::MovingAverage { window: 2 }, series, 3)
                .unwrap();

        assert_eq!(align_predictions(&result, 2).unwrap(), &[5.0, 5.0]);
        assert!(matches!(
            align_predictions(&result, 6),
            Err(ForecastError::DimensionMismatch {
                expected: 6,
                got: 5
            })
        ));
    }

    #[test]
    fn smoothing_alignment_requires_exact_horizon() {
        let result = ForecastResult::out_of_sample(
            ForecastMethod::ExponentialSmoothing { alpha: 0.2 },
            dates(2),
            Forecast::from_values(vec![3.0, 3.0]),
        )
        .unwrap();

        assert_eq!(align_predictions(&result, 2).unwrap(), &[3.0, 3.0]);
        assert!(align_predictions(&result, 3).is_err());
    }

    #[test]
    fn evaluate_uses_test_values() {
        let result = ForecastResult::out_of_sample(
            ForecastMethod::ExponentialSmoothing { alpha: 0.2 },
            dates(3),
            Forecast::from_values(vec![2.0, 4.0, 8.0]),
        )
        .unwrap();
        let test = TimeSeries::new(dates(3), vec![2.0, 4.0, 6.0]).unwrap();

        let metrics = evaluate(&result, &test).unwrap();
        assert_relative_eq!(metrics.mse, 4.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn standalone_metrics() {
        assert_relative_eq!(
            mae(&[1.0, 2.0, 3.0], &[1.5, 2.5, 3.5]),
            0.5,
            epsilon = 1e-10
        );
        assert_relative_eq!(
            rmse(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]),
            1.0,
            epsilon = 1e-10
        );
        assert!(mse(&[1.0], &[]).is_nan());
        assert_eq!(mape(&[1.0, 0.0], &[1.0, 1.0]), None);
    }
}
