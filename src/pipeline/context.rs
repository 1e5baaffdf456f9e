//! Run-scoped state threaded through the stages.

use crate::core::ForecastMethod;
use crate::error::ForecastError;
use crate::pipeline::config::MethodKind;
use crate::report::{Notice, PipelineReport, Section};
use tracing::warn;

/// Collects stage outputs and user messages for one evaluation.
#[derive(Debug, Default)]
pub struct PipelineContext {
    report: PipelineReport,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &PipelineReport {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut PipelineReport {
        &mut self.report
    }

    pub fn finish(self) -> PipelineReport {
        self.report
    }

    pub fn loaded(&mut self) {
        self.report.notices.push(Notice::success(
            Section::Load,
            "Data loaded and processed successfully!",
        ));
    }

    /// The input could not be read or parsed; later sections are skipped.
    pub fn load_failed(&mut self, err: &ForecastError) {
        let message = match err {
            ForecastError::FileRead(_) => format!("Error reading CSV file: {}", err),
            _ => format!(
                "Error processing date or value columns: {}. Please ensure the date format is \
                 DD-MM-YYYY and the value column contains numbers.",
                err
            ),
        };
        warn!(error = %err, "load failed");
        self.report.notices.push(Notice::error(Section::Load, message));
    }

    pub fn decomposition_failed(&mut self, err: &ForecastError) {
        warn!(error = %err, "decomposition failed");
        self.report.notices.push(Notice::error(
            Section::Decomposition,
            format!(
                "Error performing decomposition: {}. Ensure your data has enough points for \
                 meaningful decomposition.",
                err
            ),
        ));
    }

    pub fn split_failed(&mut self, err: &ForecastError) {
        warn!(error = %err, "train/test split failed");
        self.report.notices.push(Notice::error(
            Section::Forecast,
            format!("Error splitting data for forecasting: {}", err),
        ));
    }

    /// One selected method failed; the others still run.
    pub fn method_failed(&mut self, method: MethodKind, err: &ForecastError) {
        warn!(method = %method, error = %err, "forecast method failed");
        self.report.notices.push(Notice::warning(
            Section::Forecast,
            format!("Error with {}: {}", method, err),
        ));
    }

    pub fn evaluation_failed(&mut self, method: ForecastMethod, err: &ForecastError) {
        warn!(method = %method, error = %err, "evaluation failed");
        let message = match (method, err) {
            (ForecastMethod::MovingAverage { .. }, ForecastError::DimensionMismatch { .. }) => {
                "Could not align SMA predictions for evaluation.".to_string()
            }
            (ForecastMethod::ExponentialSmoothing { .. }, ForecastError::DimensionMismatch { .. }) => {
                format!("Not enough predictions from {} to evaluate.", method)
            }
            _ => format!("Could not evaluate {}: {}", method, err),
        };
        self.report
            .notices
            .push(Notice::warning(Section::Accuracy, message));
    }
}
