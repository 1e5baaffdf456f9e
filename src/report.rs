//! User-facing output of a pipeline run: messages, tables, chart data and
//! the plain-text rendering of all of it.

use crate::core::{ForecastMethod, ForecastResult, TimeSeries};
use crate::diagnostics::LagPlot;
use crate::io::TablePreview;
use crate::seasonality::DecompositionResult;
use crate::utils::MetricsReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Severity of a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
    Error,
}

/// Output section a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Load,
    Decomposition,
    Forecast,
    Accuracy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: Level,
    pub section: Section,
    pub message: String,
}

impl Notice {
    pub fn success(section: Section, message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            section,
            message: message.into(),
        }
    }

    pub fn warning(section: Section, message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            section,
            message: message.into(),
        }
    }

    pub fn error(section: Section, message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            section,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            Level::Success => "ok",
            Level::Warning => "warning",
            Level::Error => "error",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

/// Train/test split with every forecast that succeeded on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSection {
    pub train: TimeSeries,
    pub test: TimeSeries,
    pub forecasts: Vec<ForecastResult>,
    pub lag_plot: Option<LagPlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodAccuracy {
    pub method: ForecastMethod,
    pub metrics: MetricsReport,
}

/// Everything a run produced, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub preview: Option<TablePreview>,
    pub date_column: Option<String>,
    pub value_column: Option<String>,
    pub series: Option<TimeSeries>,
    pub decomposition: Option<DecompositionResult>,
    pub forecast: Option<ForecastSection>,
    pub accuracy: Vec<MethodAccuracy>,
    pub notices: Vec<Notice>,
}

impl PipelineReport {
    /// True when the input could not be turned into a series.
    pub fn load_failed(&self) -> bool {
        self.series.is_none()
    }

    pub fn notices_in(&self, section: Section) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.section == section)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(|n| n.level == Level::Warning)
    }

    pub fn accuracy_for(&self, method: ForecastMethod) -> Option<&MetricsReport> {
        self.accuracy
            .iter()
            .find(|a| a.method == method)
            .map(|a| &a.metrics)
    }

    /// Chart data for every section that produced output.
    pub fn charts(&self) -> Vec<Chart> {
        let mut charts = Vec::new();

        if let Some(decomposition) = &self.decomposition {
            let panels = [
                ("Observed", &decomposition.observed),
                ("Trend", &decomposition.trend),
                ("Seasonal", &decomposition.seasonal),
                ("Residual", &decomposition.residual),
            ];
            for (title, series) in panels {
                charts.push(Chart {
                    title: title.to_string(),
                    x_label: None,
                    y_label: None,
                    series: vec![ChartSeries::line(title, series)],
                });
            }
        }

        if let Some(forecast) = &self.forecast {
            let mut series = vec![
                ChartSeries::line("Training Data", &forecast.train),
                ChartSeries::line("Testing Data", &forecast.test),
            ];
            series.extend(
                forecast
                    .forecasts
                    .iter()
                    .map(|r| ChartSeries::line(r.method().chart_label(), r.series())),
            );
            charts.push(Chart {
                title: "Forecast Visualization".to_string(),
                x_label: Some("Date".to_string()),
                y_label: Some("Value".to_string()),
                series,
            });

            if let Some(lag) = &forecast.lag_plot {
                charts.push(Chart {
                    title: lag.title(),
                    x_label: Some("t".to_string()),
                    y_label: Some(format!("t+{}", lag.lag)),
                    series: vec![ChartSeries::scatter(lag)],
                });
            }
        }

        charts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartAxis {
    Dates(Vec<DateTime<Utc>>),
    Values(Vec<f64>),
}

impl ChartAxis {
    pub fn len(&self) -> usize {
        match self {
            ChartAxis::Dates(d) => d.len(),
            ChartAxis::Values(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub kind: ChartKind,
    pub x: ChartAxis,
    pub y: Vec<f64>,
}

impl ChartSeries {
    fn line(label: impl Into<String>, series: &TimeSeries) -> Self {
        Self {
            label: label.into(),
            kind: ChartKind::Line,
            x: ChartAxis::Dates(series.timestamps().to_vec()),
            y: series.values().to_vec(),
        }
    }

    fn scatter(lag: &LagPlot) -> Self {
        let (x, y) = lag.pairs.iter().copied().unzip();
        Self {
            label: lag.title(),
            kind: ChartKind::Scatter,
            x: ChartAxis::Values(x),
            y,
        }
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart: {}", self.title)?;
        if let (Some(x), Some(y)) = (&self.x_label, &self.y_label) {
            write!(f, " (x: {}, y: {})", x, y)?;
        }
        writeln!(f)?;
        for s in &self.series {
            write!(f, "  - {}: {} points", s.label, s.y.len())?;
            if let ChartAxis::Dates(dates) = &s.x {
                if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
                    write!(
                        f,
                        ", {} .. {}",
                        first.format(crate::io::DATE_FORMAT),
                        last.format(crate::io::DATE_FORMAT)
                    )?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_notices(f: &mut fmt::Formatter<'_>, report: &PipelineReport, section: Section) -> fmt::Result {
    for notice in report.notices_in(section) {
        writeln!(f, "{}", notice)?;
    }
    Ok(())
}

fn write_heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "== {} ==", title)
}

fn write_table(f: &mut fmt::Formatter<'_>, table: &TablePreview) -> fmt::Result {
    let widths: Vec<usize> = (0..table.headers.len())
        .map(|c| {
            table
                .rows
                .iter()
                .filter_map(|r| r.get(c))
                .chain(std::iter::once(&table.headers[c]))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    writeln!(f, "{}", render(table.headers.as_slice()))?;
    for row in &table.rows {
        writeln!(f, "{}", render(row.as_slice()))?;
    }
    Ok(())
}

/// Metric values rounded to two decimals, MAPE with a percent sign.
pub fn format_metrics(method: ForecastMethod, metrics: &MetricsReport) -> String {
    let mape = match metrics.mape {
        Some(m) => format!("{:.2}%", m),
        None => "undefined".to_string(),
    };
    format!(
        "{} Accuracy:\n  - RMSE: {:.2}\n  - MAE: {:.2}\n  - MAPE: {}\n  - MSE: {:.2}",
        method.display_name(),
        metrics.rmse,
        metrics.mae,
        mape,
        metrics.mse
    )
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(preview) = &self.preview {
            write_heading(f, "Uploaded Data Preview")?;
            write_table(f, preview)?;
        }
        write_notices(f, self, Section::Load)?;

        if self.load_failed() {
            return Ok(());
        }

        let charts = self.charts();

        write_heading(f, "Time Series Decomposition")?;
        if let Some(decomposition) = &self.decomposition {
            writeln!(
                f,
                "mode: {}, period: {}, seasonal strength: {:.2}, trend strength: {:.2}",
                decomposition.mode,
                decomposition.period,
                decomposition.seasonal_strength(),
                decomposition.trend_strength()
            )?;
            for chart in charts.iter().take(4) {
                write!(f, "{}", chart)?;
            }
        }
        write_notices(f, self, Section::Decomposition)?;

        if self.forecast.is_some() {
            write_heading(f, "Forecast Visualization")?;
            let skip = if self.decomposition.is_some() { 4 } else { 0 };
            for chart in charts.iter().skip(skip) {
                write!(f, "{}", chart)?;
            }
            if let Some(lag) = self.forecast.as_ref().and_then(|s| s.lag_plot.as_ref()) {
                writeln!(f, "lag-{} autocorrelation: {:.2}", lag.lag, lag.autocorrelation)?;
            }
        }
        write_notices(f, self, Section::Forecast)?;

        let accuracy_notices = self.notices_in(Section::Accuracy).count();
        if !self.accuracy.is_empty() || accuracy_notices > 0 {
            write_heading(f, "Forecasting Accuracy")?;
            for entry in &self.accuracy {
                writeln!(f, "{}", format_metrics(entry.method, &entry.metrics))?;
            }
            write_notices(f, self, Section::Accuracy)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Forecast;
    use chrono::{Duration, TimeZone};

    fn series(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..values.len())
            .map(|i| base + Duration::days(i as i64))
            .collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    #[test]
    fn metrics_are_formatted_to_two_decimals() {
        let metrics = MetricsReport {
            rmse: 1.154_700_5,
            mae: 0.666_666,
            mape: Some(11.111_11),
            mse: 1.333_333,
        };
        let text = format_metrics(ForecastMethod::MovingAverage { window: 7 }, &metrics);
        assert_eq!(
            text,
            "Simple Moving Average Accuracy:\n  - RMSE: 1.15\n  - MAE: 0.67\n  - MAPE: 11.11%\n  - MSE: 1.33"
        );
    }

    #[test]
    fn undefined_mape_is_spelled_out() {
        let metrics = MetricsReport {
            rmse: 1.0,
            mae: 1.0,
            mape: None,
            mse: 1.0,
        };
        let text = format_metrics(ForecastMethod::ExponentialSmoothing { alpha: 0.2 }, &metrics);
        assert!(text.contains("MAPE: undefined"));
    }

    #[test]
    fn failed_load_renders_preview_and_error_only() {
        let report = PipelineReport {
            preview: Some(TablePreview {
                headers: vec!["d".into(), "v".into()],
                rows: vec![vec!["2024-01-01".into(), "1".into()]],
            }),
            notices: vec![Notice::error(Section::Load, "bad date")],
            ..Default::default()
        };
        assert!(report.load_failed());

        let text = report.to_string();
        assert!(text.contains("== Uploaded Data Preview =="));
        assert!(text.contains("[error] bad date"));
        assert!(!text.contains("Time Series Decomposition"));
        assert!(report.charts().is_empty());
    }

    #[test]
    fn forecast_chart_lists_training_testing_and_methods() {
        let full = series(vec![1.0, 2.0, 3.0, 4.0]);
        let train = full.slice(0, 3).unwrap();
        let test = full.slice(3, 4).unwrap();
        let result = ForecastResult::out_of_sample(
            ForecastMethod::ExponentialSmoothing { alpha: 0.5 },
            test.timestamps().to_vec(),
            Forecast::from_values(vec![2.5]),
        )
        .unwrap();

        let report = PipelineReport {
            series: Some(full.clone()),
            forecast: Some(ForecastSection {
                train,
                test,
                forecasts: vec![result],
                lag_plot: None,
            }),
            ..Default::default()
        };

        let charts = report.charts();
        assert_eq!(charts.len(), 1);
        let labels: Vec<&str> = charts[0].series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Training Data",
                "Testing Data",
                "Exponential Smoothing (Alpha=0.50) Forecast"
            ]
        );
        assert_eq!(charts[0].x_label.as_deref(), Some("Date"));
        assert!(report.to_string().contains("== Forecast Visualization =="));
    }

    #[test]
    fn lag_chart_is_a_scatter() {
        let ts = series(vec![1.0, 2.0, 3.0]);
        let lag_plot = LagPlot::compute(&ts, 1).unwrap();
        let report = PipelineReport {
            series: Some(ts.clone()),
            forecast: Some(ForecastSection {
                train: ts.slice(0, 2).unwrap(),
                test: ts.slice(2, 3).unwrap(),
                forecasts: vec![],
                lag_plot: Some(lag_plot),
            }),
            ..Default::default()
        };

        let charts = report.charts();
        let lag = &charts[1];
        assert_eq!(lag.title, "Lag Plot (Lag=1)");
        assert_eq!(lag.y_label.as_deref(), Some("t+1"));
        assert_eq!(lag.series[0].kind, ChartKind::Scatter);
        assert_eq!(lag.series[0].x, ChartAxis::Values(vec![1.0, 2.0]));
        assert_eq!(lag.series[0].y, vec![2.0, 3.0]);
    }

    #[test]
    fn notices_filter_by_section() {
        let report = PipelineReport {
            notices: vec![
                Notice::success(Section::Load, "loaded"),
                Notice::warning(Section::Forecast, "sma failed"),
            ],
            ..Default::default()
        };
        assert_eq!(report.notices_in(Section::Forecast).count(), 1);
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(
            Notice::warning(Section::Accuracy, "x").to_string(),
            "[warning] x"
        );
    }
}
