//! Input parsing.

pub mod csv;

pub use self::csv::{extract_series, load_series, CsvTable, TablePreview, DATE_FORMAT};
