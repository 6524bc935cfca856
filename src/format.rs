//! Output formats for the CLI.
//!
//! This module provides functionality for rendering command results as a
//! terminal table, JSON or CSV.

use comfy_table::{presets::ASCII_FULL, ContentArrangement, Table};
use csv::Writer;
use serde::Serialize;
use std::str::FromStr;
use strum::EnumIter;

pub const TABLE: &str = "table";
pub const JSON: &str = "json";
pub const CSV: &str = "csv";

/// Error types that can occur during formatting operations
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    /// Error when an unsupported output format is requested
    #[error("invalid output format {0}")]
    UnsupportedOutputFormat(String),
    /// Error specific to CSV operations
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Error when converting bytes to UTF-8 string
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),

    #[error("CSV writer into inner error: {0}")]
    CsvIntoInnerError(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
}

#[derive(Debug, Clone, Default, PartialEq, PartialOrd)]
pub struct OutputFormatOptions {
    pub with_headers: bool,
    pub pretty: bool,
}

/// Enum representing the supported output formats
#[derive(Debug, Clone, PartialEq, PartialOrd, EnumIter)]
pub enum OutputFormat {
    /// Human readable table
    Table(OutputFormatOptions),
    /// JSON (JavaScript Object Notation) format
    Json(OutputFormatOptions),
    /// CSV (Comma-Separated Values) format
    Csv(OutputFormatOptions),
}

impl OutputFormat {
    /// Returns a vector of all supported format names as strings
    pub fn names() -> Vec<&'static str> {
        vec![TABLE, JSON, CSV]
    }

    pub fn from_string_with_options(
        format_str: &str,
        options: OutputFormatOptions,
    ) -> Result<OutputFormat, FormattingError> {
        let normalized_format = format_str.to_lowercase();
        match normalized_format.as_str() {
            TABLE => Ok(OutputFormat::Table(options)),
            JSON => Ok(OutputFormat::Json(options)),
            CSV => Ok(OutputFormat::Csv(options)),
            _ => Err(FormattingError::UnsupportedOutputFormat(normalized_format)),
        }
    }

    pub fn options(&self) -> &OutputFormatOptions {
        match self {
            OutputFormat::Table(options) | OutputFormat::Json(options) | OutputFormat::Csv(options) => {
                options
            }
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table(OutputFormatOptions::default())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OutputFormat::Table(_) => write!(f, "{}", TABLE),
            OutputFormat::Json(_) => write!(f, "{}", JSON),
            OutputFormat::Csv(_) => write!(f, "{}", CSV),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormattingError;

    fn from_str(format_str: &str) -> Result<OutputFormat, FormattingError> {
        Self::from_string_with_options(format_str, OutputFormatOptions::default())
    }
}

pub trait Formattable {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError>;
}

/// Serialize to JSON, pretty-printed when requested.
pub fn to_json<T: Serialize + ?Sized>(
    value: &T,
    options: &OutputFormatOptions,
) -> Result<String, FormattingError> {
    if options.pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

/// Render rows as an ASCII table.
pub fn to_table<H: ToString>(header: &[H], rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(ToString::to_string).collect::<Vec<_>>());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Render rows as CSV, with an optional header record.
pub fn to_csv<H: AsRef<str>>(
    header: &[H],
    rows: Vec<Vec<String>>,
    options: &OutputFormatOptions,
) -> Result<String, FormattingError> {
    let mut wtr = Writer::from_writer(vec![]);
    if options.with_headers {
        wtr.write_record(header.iter().map(|h| h.as_ref().to_uppercase()))?;
    }
    for row in rows {
        wtr.write_record(&row)?;
    }
    let data = wtr.into_inner()?;
    Ok(String::from_utf8(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(
            OutputFormat::from_str("json").unwrap(),
            OutputFormat::Json(OutputFormatOptions::default())
        );
        assert_eq!(
            OutputFormat::from_str("CSV").unwrap(),
            OutputFormat::Csv(OutputFormatOptions::default())
        );
        assert_eq!(OutputFormat::from_str("Table").unwrap(), OutputFormat::default());
        assert!(OutputFormat::from_str("tree").is_err());
    }

    #[test]
    fn test_format_names_round_trip_through_display() {
        for name in OutputFormat::names() {
            assert_eq!(OutputFormat::from_str(name).unwrap().to_string(), name);
        }
    }

    #[test]
    fn test_to_csv_with_headers() {
        let options = OutputFormatOptions {
            with_headers: true,
            pretty: false,
        };
        let csv = to_csv(
            &["id", "name"],
            vec![vec!["1".to_string(), "vm, one".to_string()]],
            &options,
        )
        .unwrap();
        assert_eq!(csv, "ID,NAME\n1,\"vm, one\"\n");
    }

    #[test]
    fn test_to_table_contains_cells() {
        let table = to_table(&["Property", "Value"], vec![vec!["id".to_string(), "42".to_string()]]);
        assert!(table.contains("Property"));
        assert!(table.contains("42"));
    }

    #[test]
    fn test_to_json_pretty() {
        let options = OutputFormatOptions {
            with_headers: false,
            pretty: true,
        };
        assert_eq!(to_json(&json!({"a": 1}), &options).unwrap(), "{\n  \"a\": 1\n}");
        assert_eq!(
            to_json(&json!({"a": 1}), &OutputFormatOptions::default()).unwrap(),
            "{\"a\":1}"
        );
    }
}
