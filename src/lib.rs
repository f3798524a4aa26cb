//! A code formatter for the IML modeling language.
//!
//! The pipeline is a straight line: an external parser turns IML source text
//! into a syntax tree, the printer in [`formatting`] turns that tree into a
//! layout document, and the document renderer emits the formatted text. A
//! phrase that cannot be printed is kept verbatim from the original source,
//! so one problematic declaration never spoils the rest of the file.

pub mod formatting;
pub mod language;
pub mod parsing;
pub mod problem;
