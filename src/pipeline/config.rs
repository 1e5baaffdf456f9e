//! Run parameters.

use crate::error::{ForecastError, Result};
use crate::seasonality::DecompositionMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Share of observations used for training.
pub const TRAIN_FRACTION: f64 = 0.8;

/// Rows shown in the data preview.
pub const PREVIEW_ROWS: usize = 5;

pub const SMA_WINDOW_RANGE: RangeInclusive<usize> = 2..=30;
pub const SES_ALPHA_RANGE: RangeInclusive<f64> = 0.01..=0.99;
pub const LAG_RANGE: RangeInclusive<usize> = 1..=20;

/// A forecasting section entry the user can select.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Sma,
    Ses,
    Lag,
}

impl MethodKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            MethodKind::Sma => "Simple Moving Average",
            MethodKind::Ses => "Exponential Smoothing",
            MethodKind::Lag => "Lag Plot",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for MethodKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sma" | "simple moving average" => Ok(MethodKind::Sma),
            "ses" | "es" | "exponential smoothing" => Ok(MethodKind::Ses),
            "lag" | "lag plot" => Ok(MethodKind::Lag),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown method '{}' (expected sma, ses or lag)",
                other
            ))),
        }
    }
}

/// Parameters for one pipeline evaluation.
///
/// Column names left unset are resolved against the CSV header, see
/// [`PipelineConfig::resolve_columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub date_column: Option<String>,
    pub value_column: Option<String>,
    pub mode: DecompositionMode,
    pub methods: Vec<MethodKind>,
    pub sma_window: usize,
    pub ses_alpha: f64,
    pub lag: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            date_column: None,
            value_column: None,
            mode: DecompositionMode::Additive,
            methods: Vec::new(),
            sma_window: 7,
            ses_alpha: 0.2,
            lag: 1,
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ForecastError::InvalidParameter(format!("invalid config: {}", e)))
    }

    /// Check slider ranges.
    pub fn validate(&self) -> Result<()> {
        if !SMA_WINDOW_RANGE.contains(&self.sma_window) {
            return Err(ForecastError::InvalidParameter(format!(
                "SMA window must be in {}..={}, got {}",
                SMA_WINDOW_RANGE.start(),
                SMA_WINDOW_RANGE.end(),
                self.sma_window
            )));
        }
        if !SES_ALPHA_RANGE.contains(&self.ses_alpha) {
            return Err(ForecastError::InvalidParameter(format!(
                "smoothing alpha must be in {}..={}, got {}",
                SES_ALPHA_RANGE.start(),
                SES_ALPHA_RANGE.end(),
                self.ses_alpha
            )));
        }
        if !LAG_RANGE.contains(&self.lag) {
            return Err(ForecastError::InvalidParameter(format!(
                "lag must be in {}..={}, got {}",
                LAG_RANGE.start(),
                LAG_RANGE.end(),
                self.lag
            )));
        }
        Ok(())
    }

    pub fn has(&self, method: MethodKind) -> bool {
        self.methods.contains(&method)
    }

    /// Date and value column names for a table with these headers.
    ///
    /// The date column defaults to the first header. The value column
    /// defaults to the first other header, or the date column itself when
    /// the table has a single column.
    pub fn resolve_columns(&self, headers: &[String]) -> Result<(String, String)> {
        let date = match &self.date_column {
            Some(name) => name.clone(),
            None => headers
                .first()
                .cloned()
                .ok_or_else(|| ForecastError::FileRead("no header row".to_string()))?,
        };
        let value = match &self.value_column {
            Some(name) => name.clone(),
            None => headers
                .iter()
                .find(|h| **h != date)
                .cloned()
                .unwrap_or_else(|| date.clone()),
        };
        Ok((date, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_match_widget_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.sma_window, 7);
        assert_eq!(config.ses_alpha, 0.2);
        assert_eq!(config.lag, 1);
        assert_eq!(config.mode, DecompositionMode::Additive);
        assert!(config.methods.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let config = PipelineConfig {
            sma_window: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ForecastError::InvalidParameter(_))
        ));

        let config = PipelineConfig {
            ses_alpha: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            lag: 21,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config =
            PipelineConfig::from_json(r#"{"mode": "multiplicative", "methods": ["sma", "lag"]}"#)
                .unwrap();
        assert_eq!(config.mode, DecompositionMode::Multiplicative);
        assert_eq!(config.methods, vec![MethodKind::Sma, MethodKind::Lag]);
        assert_eq!(config.sma_window, 7);
        assert!(config.has(MethodKind::Lag));
        assert!(!config.has(MethodKind::Ses));
    }

    #[test]
    fn json_rejects_unknown_fields() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{"window": 3}"#),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn columns_default_to_header_order() {
        let config = PipelineConfig::default();
        let (date, value) = config
            .resolve_columns(&headers(&["date", "sales", "units"]))
            .unwrap();
        assert_eq!(date, "date");
        assert_eq!(value, "sales");

        let config = PipelineConfig {
            date_column: Some("units".to_string()),
            ..Default::default()
        };
        let (date, value) = config
            .resolve_columns(&headers(&["date", "sales", "units"]))
            .unwrap();
        assert_eq!(date, "units");
        assert_eq!(value, "date");
    }

    #[test]
    fn single_column_uses_it_for_both() {
        let (date, value) = PipelineConfig::default()
            .resolve_columns(&headers(&["only"]))
            .unwrap();
        assert_eq!(date, "only");
        assert_eq!(value, "only");
    }

    #[test]
    fn method_names_parse() {
        assert_eq!("SMA".parse::<MethodKind>().unwrap(), MethodKind::Sma);
        assert_eq!(
            "Exponential Smoothing".parse::<MethodKind>().unwrap(),
            MethodKind::Ses
        );
        assert_eq!("lag".parse::<MethodKind>().unwrap(), MethodKind::Lag);
        assert!("arima".parse::<MethodKind>().is_err());
        assert_eq!(MethodKind::Lag.to_string(), "Lag Plot");
    }
}
