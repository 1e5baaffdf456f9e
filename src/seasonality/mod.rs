//! Seasonal decomposition.
//!
//! Classical moving-average decomposition into trend, seasonal and residual
//! components, in additive or multiplicative form.

mod classical;

pub use classical::{DecompositionMode, DecompositionResult, SeasonalDecomposition, SEASONAL_PERIOD};
