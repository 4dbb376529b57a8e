//! CLI module for fieldbind
//!
//! Provides command-line interface for:
//! - validate: Bind a JSON record to a model spec and validate it
//! - types: List registered field types

mod args;
mod commands;
mod errors;
mod io;
mod logging;

pub use args::{Cli, Command};
pub use commands::{check_record, run, run_command, types, validate, Verdict};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_record, read_record, write_error, write_response, write_validation_errors};
