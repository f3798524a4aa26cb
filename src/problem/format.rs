use super::messages::generate_error_message;
use crate::formatting::FormatError;
use owo_colors::OwoColorize;
use std::path::Path;

/// Format a formatting failure with the full details
pub fn full_format_error(error: &FormatError, filename: &Path) -> String {
    let (problem, details) = generate_error_message(error);

    format!(
        r#"
{}: {} {}

{}
        "#,
        "error".bright_red(),
        filename.to_string_lossy(),
        problem.bold(),
        details
    )
    .trim_ascii()
    .to_string()
}

/// Format a formatting failure with concise single-line output
pub fn concise_format_error(error: &FormatError, filename: &Path) -> String {
    let (problem, _) = generate_error_message(error);

    format!(
        "{}: {} {}",
        "error".bright_red(),
        filename.to_string_lossy(),
        problem.bold(),
    )
}

/// Format a file loading failure with concise single-line output
pub fn concise_io_error(error: &std::io::Error, filename: &Path) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        filename.to_string_lossy(),
        error.to_string().bold()
    )
}
