//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    pub fn is_structured(&self) -> bool {
        !matches!(self, OutputFormat::Table)
    }
}

/// Print a value as JSON or YAML. Table output falls back to JSON.
pub fn print_single<T: Serialize + ?Sized>(data: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(data)?);
        }
    }
    Ok(())
}

pub fn print_heading(title: &str, width: usize) {
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(width));
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Format a [0, 1] score with two decimals.
pub fn score(value: f64) -> String {
    format!("{:.2}", value)
}
