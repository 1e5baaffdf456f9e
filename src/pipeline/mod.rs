//! Load, decompose, forecast and evaluate one uploaded CSV.
//!
//! [`run`] evaluates everything from scratch. [`ReactivePipeline`] keeps
//! stage results between calls and recomputes only what a parameter change
//! invalidates. Both produce the same [`PipelineReport`].
//!
//! [`PipelineReport`]: crate::report::PipelineReport

mod config;
mod context;
mod reactive;
pub mod stages;

pub use config::{
    MethodKind, PipelineConfig, LAG_RANGE, PREVIEW_ROWS, SES_ALPHA_RANGE, SMA_WINDOW_RANGE,
    TRAIN_FRACTION,
};
pub use context::PipelineContext;
pub use reactive::{ReactivePipeline, Stage};

use crate::error::Result;
use crate::report::PipelineReport;

/// Evaluate the whole pipeline for `bytes` from scratch.
///
/// Returns an error only for out-of-range parameters; every other failure
/// is reported inside the returned report.
///
/// # Example
/// ```
/// use forecast_explorer::pipeline::{run, MethodKind, PipelineConfig};
///
/// let csv = "date,value\n01-01-2024,1\n02-01-2024,2\n03-01-2024,3\n\
///            04-01-2024,4\n05-01-2024,5\n";
/// let config = PipelineConfig {
///     methods: vec![MethodKind::Ses],
///     ..Default::default()
/// };
///
/// let report = run(csv.as_bytes(), &config).unwrap();
/// assert!(!report.load_failed());
/// assert_eq!(report.accuracy.len(), 1);
/// ```
pub fn run(bytes: &[u8], config: &PipelineConfig) -> Result<PipelineReport> {
    ReactivePipeline::new(bytes.to_vec()).update(config)
}
