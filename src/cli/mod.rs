//! CLI module for the throw-helper generator
//!
//! This module provides the command-line interface: a stand-in host that loads a manifest and runs one
//! generation pass over it.
//!
//! ## Commands
//!
//! - `generate <manifest>` - Run a pass and write the artifacts
//! - `check <manifest>` - Run a pass and report diagnostics only
//! - `schema` - Print the bootstrap artifact
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::backend::GeneratorConfig;
use crate::format::WriterConfig;
use crate::version::THROWGEN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a failure error from a diagnostic, rendered as a miette report.
    pub fn diagnostic<D>(diagnostic: D) -> Self
    where
        D: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(diagnostic)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate throw-helper wrappers from a declaration manifest
#[derive(Parser, Debug)]
#[command(name = "throwgen")]
#[command(version = THROWGEN_VERSION)]
#[command(about = "Generate throw-helper wrappers from a declaration manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that runs a pass.
#[derive(Args, Debug, Clone, Default)]
pub struct PassOptions {
    /// Check every marker against the schema's constructor before emission
    #[arg(long)]
    pub validate_markers: bool,

    /// Spaces per indentation level in generated sources
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub indent_width: usize,
}

impl PassOptions {
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig::new().with_indent_width(self.indent_width)
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .with_writer(self.writer_config())
            .with_validate_markers(self.validate_markers)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a generation pass and write the artifacts
    Generate {
        /// Manifest describing the declarations
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Output directory (default: print artifacts to stdout)
        #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
        output_dir: Option<PathBuf>,
        #[command(flatten)]
        options: PassOptions,
    },

    /// Run a generation pass and report diagnostics without writing anything
    Check {
        /// Manifest describing the declarations
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        #[command(flatten)]
        options: PassOptions,
    },

    /// Print the bootstrap artifact defining the marker schema
    Schema {
        /// Spaces per indentation level
        #[arg(long, value_name = "N", default_value_t = 4)]
        indent_width: usize,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate {
            manifest,
            output_dir,
            options,
        } => commands::generate(&manifest, output_dir.as_deref(), options.generator_config()),
        Command::Check { manifest, options } => commands::check(&manifest, options.generator_config()),
        Command::Schema { indent_width } => {
            commands::print_schema(&WriterConfig::new().with_indent_width(indent_width))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
