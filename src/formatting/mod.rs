//! Turning syntax trees into formatted IML source text

use std::fmt;

use crate::language::Program;
use crate::parsing::{Parse, ParsingError};

mod options;
mod printer;
mod sugar;

pub use options::{Options, Semicolons, CONFIG_FILENAME};
pub use printer::Printer;

/// The layout document the printer produces; rendering it at a width is the
/// renderer's job, not ours.
pub type Document = pretty::RcDoc<'static, ()>;

/// A failure to print a single node. These are caught at phrase granularity
/// and downgraded to verbatim substitution; only [`PrintError::EmptyPhrase`]
/// escapes, because there is no source location to fall back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintError {
    Unsupported(&'static str),
    Malformed(String),
    EmptyPhrase,
}

impl fmt::Display for PrintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintError::Unsupported(what) => write!(f, "unsupported construct: {}", what),
            PrintError::Malformed(tag) => write!(f, "malformed node: {}", tag),
            PrintError::EmptyPhrase => write!(f, "empty phrase with no source location"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    Parse(ParsingError),
    Print(PrintError),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Parse(error) => write!(f, "{}", error),
            FormatError::Print(error) => write!(f, "{}", error),
        }
    }
}

impl From<ParsingError> for FormatError {
    fn from(error: ParsingError) -> FormatError {
        FormatError::Parse(error)
    }
}

impl From<PrintError> for FormatError {
    fn from(error: PrintError) -> FormatError {
        FormatError::Print(error)
    }
}

/// Lay out a parsed program as a document. The original source text is
/// consulted for preserved numeric literals, the declaration-keyword scan,
/// and verbatim recovery of unprintable phrases.
pub fn print(program: &Program, source: &str, options: &Options) -> Result<Document, PrintError> {
    Printer::new(source, *options).program(program)
}

/// Render a parsed program at the configured width, with a trailing newline.
pub fn format(program: &Program, source: &str, options: &Options) -> Result<String, PrintError> {
    let document = print(program, source, options)?;
    let mut rendered = document.pretty(options.width).to_string();
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Parse and format in one step. Parse failures are fatal; there is no
/// partial output for a file the parser rejects.
pub fn format_source(
    parser: &dyn Parse,
    source: &str,
    options: &Options,
) -> Result<String, FormatError> {
    let program = parser.parse(source)?;
    let formatted = format(&program, source, options)?;
    Ok(formatted)
}
