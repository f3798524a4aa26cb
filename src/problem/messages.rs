use crate::formatting::{FormatError, PrintError};
use crate::parsing::ParsingError;

/// Generate problem and detail messages for formatting failures
pub fn generate_error_message(error: &FormatError) -> (String, String) {
    match error {
        FormatError::Parse(error) => parsing_error_message(error),
        FormatError::Print(error) => printing_error_message(error),
    }
}

fn parsing_error_message(error: &ParsingError) -> (String, String) {
    match error {
        ParsingError::CommandUnavailable(command, details) => (
            format!("Unable to run parser '{}'", command),
            format!(
                r#"
The parser executable could not be started: {}.

Formatting relies on an external parser that reads IML source on standard
input and writes the parsed tree as JSON on standard output. Make sure the
command is installed and on your PATH, or name a different one with the
--parser option.
                "#,
                details
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::Io(details) => (
            "Parser input/output failure".to_string(),
            format!("Communicating with the parser failed: {}.", details),
        ),
        ParsingError::ParserFailure(message) => (
            "Syntax error".to_string(),
            if message.is_empty() {
                "The parser rejected the input without further explanation.".to_string()
            } else {
                message.clone()
            },
        ),
        ParsingError::InvalidJson(details) => (
            "Unreadable parser output".to_string(),
            format!(
                "The parser exited successfully but its output was not valid JSON: {}.",
                details
            ),
        ),
        ParsingError::MissingField(field) => (
            "Unexpected parse tree".to_string(),
            format!(
                "The parse tree is missing the '{}' field. The parser and the \
                 formatter probably disagree about the tree encoding.",
                field
            ),
        ),
        ParsingError::UnexpectedShape(what) => (
            "Unexpected parse tree".to_string(),
            format!(
                "The parse tree had an unexpected shape: {}. The parser and the \
                 formatter probably disagree about the tree encoding.",
                what
            ),
        ),
    }
}

fn printing_error_message(error: &PrintError) -> (String, String) {
    match error {
        PrintError::Unsupported(what) => (
            "Unsupported construct".to_string(),
            format!(
                "The input uses {} which the formatter does not lay out.",
                what
            ),
        ),
        PrintError::Malformed(tag) => (
            "Malformed parse tree".to_string(),
            format!("The parse tree contains an unrecognized '{}' node.", tag),
        ),
        PrintError::EmptyPhrase => (
            "Empty phrase".to_string(),
            "A phrase in the parse tree has no definitions and no source \
             location, so there is nothing to print and nothing to fall back to."
                .to_string(),
        ),
    }
}
