//! Visual diagnostics computed over the full series.

mod lag;

pub use lag::{autocorrelation, LagPlot};
