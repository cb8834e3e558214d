//! Triad CLI - command-line front end for the profile engine
//!
//! - Analyze a questionnaire answer file into a three-role profile
//! - Inspect trigram-pair dynamics and archetype compatibility
//! - List the archetype table
//! - Export a precomputed compatibility matrix

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{analyze, reference, EngineOptions};
pub use error::{CliError, CliResult};

/// Triad CLI application
#[derive(Parser)]
#[command(name = "triad")]
#[command(about = "Triad - three-role archetype profiling", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json, yaml)
    #[arg(short, long, global = true, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    engine: EngineOptions,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Analyze an answer file into a profile
    Analyze(analyze::AnalyzeArgs),

    /// Show the blended dynamics of a trigram pair
    Dynamics(reference::DynamicsArgs),

    /// Evaluate the compatibility of two archetypes
    Compat {
        /// First archetype id (1-64)
        a: u8,
        /// Second archetype id (1-64)
        b: u8,
    },

    /// List the archetype table
    Archetypes {
        /// Only archetypes carrying this keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Export the table with a precomputed compatibility matrix
    Matrix,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Logs go to stderr so structured output on stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    let engine = cli.engine.build()?;

    match cli.command {
        Commands::Analyze(args) => analyze::execute(&engine, args, cli.output),
        Commands::Dynamics(args) => reference::dynamics(&engine, args, cli.output),
        Commands::Compat { a, b } => reference::compat(&engine, a, b, cli.output),
        Commands::Archetypes { keyword } => {
            reference::archetypes(&engine, keyword.as_deref(), cli.output)
        }
        Commands::Matrix => reference::matrix(&engine, cli.output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["triad", "compat", "3", "9", "-o", "json", "-v"]).unwrap();
        assert_eq!(cli.output, output::OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Compat { a: 3, b: 9 }));
    }

    #[test]
    fn out_of_range_ids_are_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["triad", "compat", "300", "1"]).is_err());
    }
}
