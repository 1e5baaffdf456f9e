//! Statistical utility functions.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Least-squares line through `(x, y)` pairs.
///
/// Returns `(slope, intercept)`. With fewer than two distinct `x` values the
/// slope is zero and the intercept is the mean of `y`.
pub fn linear_fit(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len().min(y.len());
    if n == 0 {
        return (0.0, f64::NAN);
    }

    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        sxy += dx * (y[i] - my);
        sxx += dx * dx;
    }

    if sxx < 1e-12 {
        return (0.0, my);
    }

    let slope = sxy / sxx;
    (slope, my - slope * mx)
}
