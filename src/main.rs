//! forecast-explorer command line entry point.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use forecast_explorer::io::CsvTable;
use forecast_explorer::pipeline::{self, MethodKind, PipelineConfig, PREVIEW_ROWS};
use forecast_explorer::report::{Chart, PipelineReport};
use forecast_explorer::seasonality::DecompositionMode;

#[derive(Parser, Debug)]
#[command(name = "forecast-explorer")]
#[command(about = "Decompose a CSV time series and compare naive forecasts", long_about = None)]
#[command(version)]
struct Cli {
    /// CSV file with a header row, or '-' for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Date column (DD-MM-YYYY); defaults to the first column
    #[arg(long)]
    date_column: Option<String>,

    /// Value column; defaults to the first other column
    #[arg(long)]
    value_column: Option<String>,

    /// Decomposition mode: additive or multiplicative
    #[arg(long)]
    mode: Option<DecompositionMode>,

    /// Forecasting method to run (sma, ses, lag); repeatable
    #[arg(short, long = "method")]
    methods: Vec<MethodKind>,

    /// SMA window (2-30)
    #[arg(short, long)]
    window: Option<usize>,

    /// Exponential smoothing alpha (0.01-0.99)
    #[arg(short, long)]
    alpha: Option<f64>,

    /// Lag for the lag plot (1-20)
    #[arg(short, long)]
    lag: Option<usize>,

    /// JSON file with pipeline parameters; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the full report with chart data as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the column names and a data preview, then exit
    #[arg(long)]
    columns: bool,
}

impl Cli {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                PipelineConfig::from_json(&text)?
            }
            None => PipelineConfig::default(),
        };

        if let Some(name) = &self.date_column {
            config.date_column = Some(name.clone());
        }
        if let Some(name) = &self.value_column {
            config.value_column = Some(name.clone());
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if !self.methods.is_empty() {
            config.methods = self.methods.clone();
        }
        if let Some(window) = self.window {
            config.sma_window = window;
        }
        if let Some(alpha) = self.alpha {
            config.ses_alpha = alpha;
        }
        if let Some(lag) = self.lag {
            config.lag = lag;
        }
        Ok(config)
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    config: &'a PipelineConfig,
    report: &'a PipelineReport,
    charts: Vec<Chart>,
}

fn read_input(input: &str) -> anyhow::Result<Vec<u8>> {
    if input == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read stdin")?;
        Ok(bytes)
    } else {
        fs::read(input).with_context(|| format!("failed to read {}", input))
    }
}

fn write_json(path: &Path, config: &PipelineConfig, report: &PipelineReport) -> anyhow::Result<()> {
    let document = JsonDocument {
        config,
        report,
        charts: report.charts(),
    };
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(io::BufWriter::new(file), &document)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote JSON report");
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_explorer=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let bytes = read_input(&cli.input)?;

    if cli.columns {
        let table = CsvTable::from_bytes(&bytes)?;
        println!("columns: {}", table.headers().join(", "));
        let preview = table.preview(PREVIEW_ROWS);
        for row in &preview.rows {
            println!("{}", row.join(", "));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = cli.pipeline_config()?;
    let report = pipeline::run(&bytes, &config)?;
    print!("{}", report);

    if let Some(path) = &cli.json {
        write_json(path, &config, &report)?;
    }

    Ok(exit_status(&report))
}

/// Non-zero only when the data could not be loaded.
fn exit_status(report: &PipelineReport) -> ExitCode {
    if report.load_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("forecast-explorer").chain(args.iter().copied()))
            .unwrap()
    }

    fn config_file(name: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "forecast-explorer-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn defaults_without_flags() {
        let cli = parse(&[]);
        assert_eq!(cli.input, "-");
        assert_eq!(cli.pipeline_config().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn method_flag_is_repeatable() {
        let cli = parse(&["-m", "sma", "--method", "lag", "-m", "ses"]);
        let config = cli.pipeline_config().unwrap();
        assert_eq!(
            config.methods,
            vec![MethodKind::Sma, MethodKind::Lag, MethodKind::Ses]
        );
    }

    #[test]
    fn flags_override_config_file() {
        let path = config_file(
            "override",
            r#"{"value_column": "sales", "mode": "multiplicative", "methods": ["ses"],
                "sma_window": 10, "ses_alpha": 0.5, "lag": 4}"#,
        );
        let cli = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--window",
            "14",
            "--method",
            "sma",
        ]);
        let config = cli.pipeline_config().unwrap();
        fs::remove_file(&path).unwrap();

        // Overridden by flags.
        assert_eq!(config.sma_window, 14);
        assert_eq!(config.methods, vec![MethodKind::Sma]);
        // Kept from the file.
        assert_eq!(config.value_column.as_deref(), Some("sales"));
        assert_eq!(config.mode, DecompositionMode::Multiplicative);
        assert_eq!(config.ses_alpha, 0.5);
        assert_eq!(config.lag, 4);
        assert!(config.date_column.is_none());
    }

    #[test]
    fn unreadable_config_file_is_an_error() {
        let cli = parse(&["--config", "/nonexistent/forecast-explorer.json"]);
        assert!(cli.pipeline_config().is_err());
    }

    #[test]
    fn exit_status_fails_only_on_load_errors() {
        let good = "date,value\n01-01-2024,1\n02-01-2024,2\n03-01-2024,3\n";
        let short = pipeline::run(good.as_bytes(), &PipelineConfig::default()).unwrap();
        // The decomposition fails on three rows, but the data loaded.
        assert!(short.decomposition.is_none());
        assert_eq!(exit_status(&short), ExitCode::SUCCESS);

        let bad = "date,value\n2024-01-01,1\n";
        let failed = pipeline::run(bad.as_bytes(), &PipelineConfig::default()).unwrap();
        assert_eq!(exit_status(&failed), ExitCode::FAILURE);
    }
}
