//! JSON I/O handling for CLI
//!
//! - Input: one JSON object from a file or stdin
//! - Output: one JSON object on stdout
//! - Logs go to stderr

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};
use crate::store::Document;

/// Read a JSON record from `path`, or from stdin when `None`
pub fn read_record(path: Option<&Path>) -> CliResult<Document> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read '{}': {}", path.display(), e)))?,
        None => {
            let mut text = String::new();
            io::stdin().lock().read_to_string(&mut text)?;
            text
        }
    };
    parse_record(&text)
}

/// Parse a record, which must be a JSON object
pub fn parse_record(text: &str) -> CliResult<Document> {
    if text.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    match serde_json::from_str::<Value>(text)? {
        Value::Object(document) => Ok(document),
        other => Err(CliError::invalid_record(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Write a success response to stdout
pub fn write_response(data: impl Serialize) -> CliResult<()> {
    write_json(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write a validation failure to stdout
pub fn write_validation_errors(code: &str, errors: impl Serialize) -> CliResult<()> {
    write_json(&serde_json::json!({
        "status": "error",
        "code": code,
        "errors": errors
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

fn write_json(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
