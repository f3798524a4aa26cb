//! The seam to the external IML parser
//!
//! Lexing and parsing are not done here. A separate parser executable reads
//! IML source text on stdin and writes the parsed tree as JSON on stdout;
//! this module runs it and decodes that JSON into the [`crate::language`]
//! types. The JSON is the usual encoding of an ML parsetree: variants as
//! `["Tag", args...]` arrays, records as objects, options as `null` or the
//! value.

use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::language::Program;

mod decode;

/// The collaborator that turns IML source text into a syntax tree.
pub trait Parse {
    fn parse(&self, source: &str) -> Result<Program, ParsingError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    CommandUnavailable(String, String),
    Io(String),
    ParserFailure(String),
    InvalidJson(String),
    MissingField(&'static str),
    UnexpectedShape(String),
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsingError::CommandUnavailable(command, error) => {
                write!(f, "unable to run parser '{}': {}", command, error)
            }
            ParsingError::Io(error) => write!(f, "parser i/o failure: {}", error),
            ParsingError::ParserFailure(message) => {
                if message.is_empty() {
                    write!(f, "parser rejected the input")
                } else {
                    write!(f, "parser rejected the input: {}", message)
                }
            }
            ParsingError::InvalidJson(error) => {
                write!(f, "parser produced invalid JSON: {}", error)
            }
            ParsingError::MissingField(field) => {
                write!(f, "parse tree is missing '{}'", field)
            }
            ParsingError::UnexpectedShape(what) => {
                write!(f, "unexpected parse tree shape: {}", what)
            }
        }
    }
}

/// Decode a parsetree that is already in JSON form.
pub fn parse_json(json: &str) -> Result<Program, ParsingError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|error| ParsingError::InvalidJson(error.to_string()))?;
    decode::program(&value)
}

/// Runs a parser executable, feeding it source text on stdin and reading
/// the parsetree JSON from its stdout.
#[derive(Debug, Clone)]
pub struct ExternalParser {
    command: String,
}

impl ExternalParser {
    pub fn new(command: impl Into<String>) -> ExternalParser {
        ExternalParser {
            command: command.into(),
        }
    }
}

impl Parse for ExternalParser {
    fn parse(&self, source: &str) -> Result<Program, ParsingError> {
        debug!("running parser '{}'", self.command);
        let mut child = Command::new(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| {
                ParsingError::CommandUnavailable(self.command.clone(), error.to_string())
            })?;

        // stdin is piped, so take() always succeeds; dropping it closes the
        // pipe and lets the parser see end of input.
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|error| ParsingError::Io(error.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|error| ParsingError::Io(error.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ParsingError::ParserFailure(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_json(&stdout)
    }
}
