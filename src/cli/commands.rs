//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::fields::{registry, FieldValue};
use crate::model::{ErrorReport, ModelSpec};
use crate::store::{Document, MemoryStore, ID_KEY};

use super::args::Command;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_record, write_error, write_response, write_validation_errors};

/// Parse arguments, set up logging and run the command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    super::logging::init(cli.verbose);

    let result = run_command(cli.command);
    if let Err(e) = &result {
        // Validation failures already wrote their report
        if e.code() != &CliErrorCode::ValidationFailed {
            write_error(e.code_str(), e.message())?;
        }
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate { spec, record } => validate(&spec, record.as_deref()),
        Command::Types => types(),
    }
}

/// Outcome of checking one record
#[derive(Debug)]
pub enum Verdict {
    Valid(Document),
    Invalid(ErrorReport),
}

/// Bind `record` to a fresh model for `spec` and validate it.
///
/// Keys are set one by one so the implicit fields keep their construction
/// values unless the record provides them.
pub fn check_record(spec: &ModelSpec, record: &Document) -> CliResult<Verdict> {
    let mut model = spec.build(Arc::new(MemoryStore::new()))?;

    for (name, value) in record {
        if name == ID_KEY {
            continue;
        }
        model.set(name, FieldValue::from_json(value))?;
    }

    if model.is_valid() {
        Ok(Verdict::Valid(model.to_document()))
    } else {
        Ok(Verdict::Invalid(model.errors().clone()))
    }
}

/// Validate one record against a model spec
///
/// Writes the cleaned document, or the error report and fails.
pub fn validate(spec_path: &Path, record_path: Option<&Path>) -> CliResult<()> {
    let spec = ModelSpec::load(spec_path)?;
    debug!(collection = %spec.collection, fields = spec.fields.len(), "model spec loaded");

    let record = read_record(record_path)?;

    match check_record(&spec, &record)? {
        Verdict::Valid(document) => {
            info!(collection = %spec.collection, "record valid");
            write_response(document)
        }
        Verdict::Invalid(report) => {
            let failure = CliError::validation_failed(report.len());
            write_validation_errors(failure.code_str(), &report)?;
            Err(failure)
        }
    }
}

/// List the registered field types
pub fn types() -> CliResult<()> {
    write_response(registry().tags())
}
