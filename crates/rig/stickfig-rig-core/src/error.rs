//! Error types for the skeleton description language.

use serde::{Deserialize, Serialize};

/// A failed parse of description-language text.
///
/// Always fatal to the parse call and never partially applied: a failed
/// parse constructs no tree at all. Every variant carries the line/column
/// where the failure was detected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ScriptError {
    #[error("line {line}, column {column}: expected 'stick', found '{found}'")]
    ExpectedStick {
        found: String,
        line: u32,
        column: u32,
    },

    #[error("line {line}, column {column}: expected {expected}, found '{found}'")]
    UnexpectedChar {
        expected: String,
        found: char,
        line: u32,
        column: u32,
    },

    #[error("line {line}, column {column}: unexpected end of input while reading {context}")]
    UnexpectedEnd {
        context: String,
        line: u32,
        column: u32,
    },

    #[error("line {line}, column {column}: malformed number")]
    MalformedNumber { line: u32, column: u32 },

    #[error("line {line}, column {column}: unterminated string")]
    UnterminatedString { line: u32, column: u32 },

    #[error("line {line}, column {column}: stick is missing the required 'name' property")]
    MissingName { line: u32, column: u32 },
}

impl ScriptError {
    /// Line/column where the failure was detected (1-based).
    pub fn position(&self) -> (u32, u32) {
        match self {
            ScriptError::ExpectedStick { line, column, .. }
            | ScriptError::UnexpectedChar { line, column, .. }
            | ScriptError::UnexpectedEnd { line, column, .. }
            | ScriptError::MalformedNumber { line, column }
            | ScriptError::UnterminatedString { line, column }
            | ScriptError::MissingName { line, column } => (*line, *column),
        }
    }
}
