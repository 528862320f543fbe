//! CLI module for solver-oracle
//!
//! ## Commands
//!
//! - `fixtures` - Check one solver against the fixture catalog (fixed-answer oracle)
//! - `random <A> <B>` - Differential testing of two solvers on generated instances
//! - `generate` - Write one generated instance, e.g. to reproduce a failing case
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

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::errors::HarnessError;
use crate::instance::DEFAULT_COORDINATE_MAX;
use crate::oracle::AbnormalExitPolicy;
use crate::version::HARNESS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// A case failed, or a differential campaign halted.
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The campaign was rejected before running.
    pub const CONFIGURATION: ExitCode = ExitCode(2);
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
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::CONFIGURATION)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Harness errors are rendered through miette so malformed fixtures show the offending line.
impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        let exit_code = if err.is_configuration() {
            ExitCode::CONFIGURATION
        } else {
            ExitCode::FAILURE
        };
        let message = format!("{:?}", miette::Report::new(err));
        CliError::new(message, exit_code)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Correctness oracle for black-box point-set solvers
#[derive(Parser, Debug)]
#[command(name = "solver-oracle")]
#[command(version = HARNESS_VERSION)]
#[command(about = "Differential and regression testing for black-box point-set solvers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Report format shared by the campaign commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// How to treat a solver that exits with a non-zero status
    #[arg(long = "on-abnormal-exit", value_enum, default_value_t = AbnormalExitPolicy::Inconclusive)]
    pub on_abnormal_exit: AbnormalExitPolicy,
    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,
    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a solver against fixtures with known answers
    Fixtures {
        /// Solver binary under test
        #[arg(short, long, value_name = "BIN")]
        binary: PathBuf,
        /// Directory holding the built-in fixture files
        #[arg(long, value_name = "DIR", default_value = "testing/cases/assertion", conflicts_with = "manifest")]
        fixture_dir: PathBuf,
        /// Fixture manifest replacing the built-in catalog (`<name> <path> <expected>` per line)
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,
        /// Only run fixtures whose name contains this keyword
        #[arg(short = 'k', long, value_name = "KEYWORD")]
        filter: Option<String>,
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Compare two solvers on randomly generated instances, stopping at the first disagreement
    Random {
        /// First solver binary
        #[arg(value_name = "BIN_A")]
        first: PathBuf,
        /// Second solver binary
        #[arg(value_name = "BIN_B")]
        second: PathBuf,
        /// Repetitions of the whole terminal range
        #[arg(short = 'n', long, value_name = "N")]
        repetitions: usize,
        /// Smallest terminal count
        #[arg(long = "min-terminals", value_name = "MIN")]
        min_terminals: usize,
        /// Largest terminal count
        #[arg(long = "max-terminals", value_name = "MAX")]
        max_terminals: usize,
        /// Inclusive upper bound for coordinates
        #[arg(long, value_name = "C", default_value_t = DEFAULT_COORDINATE_MAX)]
        coordinate_max: u32,
        /// Seed for instance generation (random if omitted; always reported)
        #[arg(long)]
        seed: Option<u64>,
        /// Scratch instance file shared by all cases
        #[arg(long, value_name = "PATH")]
        instance_file: Option<PathBuf>,
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Write one generated instance
    Generate {
        /// Number of terminals
        #[arg(short = 't', long, value_name = "N")]
        terminals: usize,
        /// Inclusive upper bound for coordinates
        #[arg(long, value_name = "C", default_value_t = DEFAULT_COORDINATE_MAX)]
        coordinate_max: u32,
        /// Seed for generation
        #[arg(long)]
        seed: Option<u64>,
        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
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
        Command::Fixtures {
            binary,
            fixture_dir,
            manifest,
            filter,
            report,
        } => commands::run_fixture_campaign(&binary, &fixture_dir, manifest.as_deref(), filter.as_deref(), &report),
        Command::Random {
            first,
            second,
            repetitions,
            min_terminals,
            max_terminals,
            coordinate_max,
            seed,
            instance_file,
            report,
        } => {
            let matrix = crate::campaign::RandomMatrix::new(repetitions, min_terminals, max_terminals)
                .with_coordinate_max(coordinate_max);
            commands::run_random_campaign(&first, &second, matrix, seed, instance_file, &report)
        }
        Command::Generate {
            terminals,
            coordinate_max,
            seed,
            output,
        } => commands::generate_instance(terminals, coordinate_max, seed, output.as_deref()),
    }
}

// ============================================================================
// Tests
// ============================================================================
