//! schema-builder CLI entry point
//!
//! Commands:
//! - schema-builder infer <INPUT|->
//! - schema-builder check <SCHEMA|->
//! - schema-builder validate --schema <SCHEMA> <INPUT|->

mod commands;
mod error;
mod input;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use commands::check::{CheckArgs, handle_check};
use commands::infer::{InferArgs, OutputFormat, handle_infer};
use commands::validate::{ValidateArgs, handle_validate};

/// JSON Schema builder - infer, check and apply JSON Schemas
#[derive(Parser, Debug)]
#[command(name = "schema-builder")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Infer a JSON Schema document from a sample JSON file
    Infer {
        /// Sample JSON file, or - for stdin
        input: String,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Write the schema to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not sniff string formats (date, email, uuid, ...)
        #[arg(long)]
        no_formats: bool,

        /// Minimum array length before enum detection runs
        #[arg(long)]
        enum_min_items: Option<usize>,

        /// Maximum number of distinct values for an enum
        #[arg(long)]
        enum_max_values: Option<usize>,
    },

    /// Check a schema's keywords for internal consistency
    Check {
        /// Schema file, or - for stdin
        schema: String,

        /// JSON file with replacement issue messages
        #[arg(long)]
        messages: Option<PathBuf>,

        /// Print the full validation tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a JSON document against a schema
    Validate {
        /// Schema file
        #[arg(long)]
        schema: PathBuf,

        /// JSON document, or - for stdin
        input: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<bool, error::CliError> {
    match cli.command {
        Command::Infer {
            input,
            format,
            output,
            no_formats,
            enum_min_items,
            enum_max_values,
        } => {
            handle_infer(&InferArgs {
                input,
                format,
                output,
                detect_formats: !no_formats,
                enum_min_items,
                enum_max_values,
            })?;
            Ok(true)
        }
        Command::Check {
            schema,
            messages,
            json,
        } => handle_check(&CheckArgs {
            schema,
            messages,
            json,
        }),
        Command::Validate {
            schema,
            input,
            json,
        } => handle_validate(&ValidateArgs {
            schema,
            input,
            json,
        }),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let success = run(cli)?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
