mod cli;
mod json;

pub use cli::{format_cli_table, print_cli_table};
pub use json::{format_json, print_json};

use crate::error::Result;
use crate::model::ScanReport;

/// Output format for scan reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'table' or 'json'", s)),
        }
    }
}

pub fn print_result(report: &ScanReport, format: OutputFormat, colorize: bool) -> Result<()> {
    match format {
        OutputFormat::Table => print_cli_table(report, colorize),
        OutputFormat::Json => print_json(report),
    }
}

/// Format report to string for file output
pub fn format_result_to_string(report: &ScanReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_cli_table(report, false)),
        OutputFormat::Json => format_json(report),
    }
}
