//! Error types for record parsing and mode selection.

use thiserror::Error;

/// A `Course:` line that could not be turned into a record.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line_number}: {kind} in {line:?}")]
pub struct ParseError {
    pub line_number: usize,
    pub line: String,
    pub kind: ParseErrorKind,
}

/// What went wrong inside a recognized line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Line did not split into the five comma-separated fields
    #[error("expected 5 fields, found {found}")]
    FieldCount { found: usize },

    /// Field has no `label: value` separator
    #[error("field {field} is missing a ':' separator")]
    MissingColon { field: usize },

    /// Field label does not match the report format
    #[error("field {field} has label {found:?}, expected {expected:?}")]
    UnexpectedLabel {
        field: usize,
        expected: &'static str,
        found: String,
    },

    #[error("course code is empty")]
    EmptyCourseCode,

    /// `Instructor:` label present with no name after it
    #[error("instructor name is empty")]
    EmptyInstructor,

    #[error("invalid taught count {value:?}")]
    InvalidCount { value: String },

    #[error("invalid percentage {value:?}")]
    InvalidPercent { value: String },
}

impl ParseError {
    pub fn new(line_number: usize, line: &str, kind: ParseErrorKind) -> Self {
        Self {
            line_number,
            line: line.to_string(),
            kind,
        }
    }
}

/// A group's summed taught count does not fit in a `u64`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("taught count total for {key:?} overflows when adding {taught_count}")]
pub struct CountOverflow {
    pub key: String,
    pub taught_count: u64,
}

/// User picked a mode outside `department | level | class`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid selection: {input:?} (expected 'department', 'level' or 'class')")]
pub struct InvalidModeSelection {
    pub input: String,
}
