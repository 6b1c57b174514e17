//! Scene file error types.

use std::num::ParseFloatError;

/// Errors that can occur while reading or writing a scene file.
///
/// Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Reading or writing the file failed.
    #[error("scene I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required `FIELD:` line was missing or out of order.
    #[error("line {line}: expected {field} field")]
    MissingField { line: usize, field: &'static str },

    /// A component could not be parsed as a number.
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber {
        line: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// A field had the wrong number of components.
    #[error("line {line}: {field} expects {expected} components, found {found}")]
    WrongArity {
        line: usize,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// A line outside of any section.
    #[error("line {line}: unexpected content {content:?}")]
    UnexpectedLine { line: usize, content: String },
}

pub type Result<T> = std::result::Result<T, SceneError>;
