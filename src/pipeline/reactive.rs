//! Pipeline that keeps stage results between parameter changes.

use crate::core::{ForecastMethod, ForecastResult, TimeSeries};
use crate::diagnostics::LagPlot;
use crate::error::Result;
use crate::io::CsvTable;
use crate::pipeline::config::{MethodKind, PipelineConfig, PREVIEW_ROWS};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::stages;
use crate::report::{ForecastSection, MethodAccuracy, PipelineReport};
use crate::seasonality::{DecompositionMode, DecompositionResult};
use crate::utils::MetricsReport;
use serde::Serialize;
use tracing::debug;

/// Pipeline stage names, as reported by [`ReactivePipeline::recomputed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Table,
    Series,
    Decomposition,
    Split,
    Sma,
    Ses,
    Lag,
    SmaMetrics,
    SesMetrics,
}

type Columns = (String, String);

/// Stored result of one stage with the inputs it was computed from.
#[derive(Debug)]
struct Memo<K, V> {
    entry: Option<(K, V)>,
}

impl<K: PartialEq, V> Memo<K, V> {
    fn new() -> Self {
        Self { entry: None }
    }

    fn get_or_compute(
        &mut self,
        key: K,
        stage: Stage,
        recomputed: &mut Vec<Stage>,
        compute: impl FnOnce() -> V,
    ) -> &V {
        let entry = match self.entry.take() {
            Some((cached, value)) if cached == key => (cached, value),
            _ => {
                debug!(?stage, "recomputing stage");
                recomputed.push(stage);
                (key, compute())
            }
        };
        &self.entry.insert(entry).1
    }
}

/// Owns one uploaded file and re-evaluates it for changing parameters.
///
/// Every stage result is cached together with the parameters that produced
/// it. [`update`](Self::update) only recomputes stages whose parameters
/// differ from the cached ones; the resulting report is identical to a
/// from-scratch [`run`](crate::pipeline::run).
#[derive(Debug)]
pub struct ReactivePipeline {
    bytes: Vec<u8>,
    recomputed: Vec<Stage>,
    table: Memo<(), Result<CsvTable>>,
    series: Memo<Columns, Result<TimeSeries>>,
    decomposition: Memo<(Columns, DecompositionMode), Result<DecompositionResult>>,
    split: Memo<Columns, Result<(TimeSeries, TimeSeries)>>,
    sma: Memo<(Columns, usize), Result<ForecastResult>>,
    ses: Memo<(Columns, u64), Result<ForecastResult>>,
    lag: Memo<(Columns, usize), Result<LagPlot>>,
    sma_metrics: Memo<(Columns, usize), Result<MetricsReport>>,
    ses_metrics: Memo<(Columns, u64), Result<MetricsReport>>,
}

impl ReactivePipeline {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            recomputed: Vec::new(),
            table: Memo::new(),
            series: Memo::new(),
            decomposition: Memo::new(),
            split: Memo::new(),
            sma: Memo::new(),
            ses: Memo::new(),
            lag: Memo::new(),
            sma_metrics: Memo::new(),
            ses_metrics: Memo::new(),
        }
    }

    /// Stages recomputed by the last [`update`](Self::update), in order.
    pub fn recomputed(&self) -> &[Stage] {
        &self.recomputed
    }

    /// Evaluate the pipeline for `config`.
    ///
    /// Fails only for out-of-range parameters. Load, decomposition and
    /// per-method failures are reported as notices in the returned report.
    pub fn update(&mut self, config: &PipelineConfig) -> Result<PipelineReport> {
        config.validate()?;
        self.recomputed.clear();
        let mut ctx = PipelineContext::new();

        let bytes = &self.bytes;
        let table = match self.table.get_or_compute((), Stage::Table, &mut self.recomputed, || {
            stages::parse_table(bytes)
        }) {
            Ok(table) => table,
            Err(err) => {
                ctx.load_failed(err);
                return Ok(ctx.finish());
            }
        };
        ctx.report_mut().preview = Some(table.preview(PREVIEW_ROWS));

        let columns = match config.resolve_columns(table.headers()) {
            Ok(columns) => columns,
            Err(err) => {
                ctx.load_failed(&err);
                return Ok(ctx.finish());
            }
        };
        ctx.report_mut().date_column = Some(columns.0.clone());
        ctx.report_mut().value_column = Some(columns.1.clone());

        let series = match self.series.get_or_compute(
            columns.clone(),
            Stage::Series,
            &mut self.recomputed,
            || stages::extract_series(table, &columns.0, &columns.1),
        ) {
            Ok(series) => series,
            Err(err) => {
                ctx.load_failed(err);
                return Ok(ctx.finish());
            }
        };
        ctx.loaded();
        ctx.report_mut().series = Some(series.clone());

        match self.decomposition.get_or_compute(
            (columns.clone(), config.mode),
            Stage::Decomposition,
            &mut self.recomputed,
            || stages::decompose(series, config.mode),
        ) {
            Ok(decomposition) => ctx.report_mut().decomposition = Some(decomposition.clone()),
            Err(err) => ctx.decomposition_failed(err),
        }

        if config.methods.is_empty() {
            return Ok(ctx.finish());
        }

        let (train, test) = match self.split.get_or_compute(
            columns.clone(),
            Stage::Split,
            &mut self.recomputed,
            || stages::split(series),
        ) {
            Ok((train, test)) => (train, test),
            Err(err) => {
                ctx.split_failed(err);
                return Ok(ctx.finish());
            }
        };
        let horizon = test.len();

        let mut section = ForecastSection {
            train: train.clone(),
            test: test.clone(),
            forecasts: Vec::new(),
            lag_plot: None,
        };
        let mut accuracy = Vec::new();

        if config.has(MethodKind::Sma) {
            let method = ForecastMethod::MovingAverage {
                window: config.sma_window,
            };
            let key = (columns.clone(), config.sma_window);
            match self.sma.get_or_compute(key.clone(), Stage::Sma, &mut self.recomputed, || {
                stages::forecast(method, train, horizon)
            }) {
                Ok(result) => {
                    section.forecasts.push(result.clone());
                    if !test.is_empty() {
                        let metrics = self.sma_metrics.get_or_compute(
                            key,
                            Stage::SmaMetrics,
                            &mut self.recomputed,
                            || stages::evaluate(result, test),
                        );
                        collect_metrics(&mut ctx, &mut accuracy, method, metrics);
                    }
                }
                Err(err) => ctx.method_failed(MethodKind::Sma, err),
            }
        }

        if config.has(MethodKind::Ses) {
            let method = ForecastMethod::ExponentialSmoothing {
                alpha: config.ses_alpha,
            };
            let key = (columns.clone(), config.ses_alpha.to_bits());
            match self.ses.get_or_compute(key.clone(), Stage::Ses, &mut self.recomputed, || {
                stages::forecast(method, train, horizon)
            }) {
                Ok(result) => {
                    section.forecasts.push(result.clone());
                    if !test.is_empty() {
                        let metrics = self.ses_metrics.get_or_compute(
                            key,
                            Stage::SesMetrics,
                            &mut self.recomputed,
                            || stages::evaluate(result, test),
                        );
                        collect_metrics(&mut ctx, &mut accuracy, method, metrics);
                    }
                }
                Err(err) => ctx.method_failed(MethodKind::Ses, err),
            }
        }

        if config.has(MethodKind::Lag) {
            match self.lag.get_or_compute(
                (columns.clone(), config.lag),
                Stage::Lag,
                &mut self.recomputed,
                || stages::lag_plot(series, config.lag),
            ) {
                Ok(plot) => section.lag_plot = Some(plot.clone()),
                Err(err) => ctx.method_failed(MethodKind::Lag, err),
            }
        }

        let report = ctx.report_mut();
        report.forecast = Some(section);
        report.accuracy = accuracy;
        Ok(ctx.finish())
    }
}

fn collect_metrics(
    ctx: &mut PipelineContext,
    accuracy: &mut Vec<MethodAccuracy>,
    method: ForecastMethod,
    metrics: &Result<MetricsReport>,
) {
    match metrics {
        Ok(metrics) => accuracy.push(MethodAccuracy {
            method,
            metrics: *metrics,
        }),
        Err(err) => ctx.evaluation_failed(method, err),
    }
}
