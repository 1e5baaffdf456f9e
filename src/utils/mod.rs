//! Utility functions for evaluation and numerics.

pub mod metrics;
pub mod stats;

pub use metrics::{align_predictions, calculate_metrics, evaluate, MetricsReport};
