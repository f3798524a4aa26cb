// Types representing the IML abstract syntax tree

mod types;

// Re-export all public symbols
pub use types::*;
