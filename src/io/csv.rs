//! CSV loading for dated observations.
//!
//! The table is kept as raw strings so callers can preview it and pick
//! columns before any typed parsing happens.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// Expected format of date cells (DD-MM-YYYY).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// First rows of a table, as shown to the user before column selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A parsed CSV file: one header row and string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse raw CSV bytes.
    ///
    /// Malformed records, ragged rows, invalid UTF-8 and a missing header row
    /// all fail with [`ForecastError::FileRead`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ForecastError::FileRead(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ForecastError::FileRead("no header row".to_string()));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ForecastError::FileRead(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(columns = headers.len(), rows = rows.len(), "parsed CSV table");
        Ok(Self { headers, rows })
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Leading `n` rows of the table.
    pub fn preview(&self, n: usize) -> TablePreview {
        TablePreview {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ForecastError::ColumnNotFound(name.to_string()))
    }

    /// Build a series from a date column and a value column.
    ///
    /// Every date must match [`DATE_FORMAT`] and every value must parse as a
    /// number; the first offending cell fails the whole load. Row numbers in
    /// errors count data rows from 1. Rows are stably sorted by date, so
    /// repeated dates keep their file order.
    pub fn to_series(&self, date_column: &str, value_column: &str) -> Result<TimeSeries> {
        let date_idx = self.column_index(date_column)?;
        let value_idx = self.column_index(value_column)?;

        if self.rows.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let mut points: Vec<(DateTime<Utc>, f64)> = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let row_number = i + 1;
            let date_cell = row.get(date_idx).map(String::as_str).unwrap_or("");
            let value_cell = row.get(value_idx).map(String::as_str).unwrap_or("");

            points.push((
                parse_date(date_cell, row_number)?,
                parse_value(value_cell, row_number)?,
            ));
        }

        points.sort_by_key(|(ts, _)| *ts);
        let (timestamps, values): (Vec<_>, Vec<_>) = points.into_iter().unzip();

        TimeSeries::builder()
            .timestamps(timestamps)
            .values(values)
            .name(value_column)
            .build()
    }
}

/// Parse bytes and extract one dated series in a single step.
pub fn load_series(bytes: &[u8], date_column: &str, value_column: &str) -> Result<TimeSeries> {
    extract_series(&CsvTable::from_bytes(bytes)?, date_column, value_column)
}

/// [`CsvTable::to_series`], logging the loaded row count.
pub fn extract_series(table: &CsvTable, date_column: &str, value_column: &str) -> Result<TimeSeries> {
    let series = table.to_series(date_column, value_column)?;
    info!(
        rows = series.len(),
        date_column, value_column, "loaded time series"
    );
    Ok(series)
}

fn parse_date(cell: &str, row: usize) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(cell.trim(), DATE_FORMAT).map_err(|_| {
        ForecastError::DateFormat {
            row,
            value: cell.to_string(),
        }
    })?;
    Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

fn parse_value(cell: &str, row: usize) -> Result<f64> {
    cell.trim()
        .parse::<f64>()
        .map_err(|_| ForecastError::ValueParse {
            row,
            value: cell.to_string(),
        })
}
