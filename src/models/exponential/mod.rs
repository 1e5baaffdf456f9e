//! Exponential smoothing with a fixed smoothing level.

mod ses;

pub use ses::SimpleExponentialSmoothing;
