//! CLI argument definitions using clap
//!
//! Commands:
//! - fieldbind validate --spec <path> [--record <path>]
//! - fieldbind types

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fieldbind - validate JSON records against declarative field specs
#[derive(Parser, Debug)]
#[command(name = "fieldbind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bind one JSON record to a model and validate it
    Validate {
        /// Path to the model spec file
        #[arg(long)]
        spec: PathBuf,

        /// Path to the record; stdin when absent
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// List the registered field types
    Types,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["fieldbind", "-v", "validate", "--spec", "m.json"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Validate { spec, record } => {
                assert_eq!(spec, PathBuf::from("m.json"));
                assert!(record.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_spec_required() {
        assert!(Cli::try_parse_from(["fieldbind", "validate"]).is_err());
    }
}
