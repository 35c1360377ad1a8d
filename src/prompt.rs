//! Interactive query selection.
//!
//! Works over any `BufRead`/`Write` pair so the console is only touched by the
//! binary.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::error::InvalidModeSelection;
use crate::filters::{GroupingMode, Query};

const MODE_PROMPT: &str =
    "Do you want to query by department, level, or class? Enter 'department', 'level' or 'class': ";
const DEPARTMENT_PROMPT: &str = "Enter a department (e.g., 'BI'): ";
const LEVEL_PROMPT: &str = "Enter the course level (e.g., '1' for 100-level courses): ";
const CLASS_PROMPT: &str = "Enter a class code (e.g., 'BI121'): ";

#[derive(Error, Debug)]
pub enum PromptError {
    #[error(transparent)]
    InvalidMode(#[from] InvalidModeSelection),

    #[error("input closed before a query was complete")]
    EndOfInput,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Asks for a mode and its parameters, returning the assembled query.
pub fn prompt_query<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Query, PromptError> {
    let mode: GroupingMode = ask(input, output, MODE_PROMPT)?.parse()?;

    let query = match mode {
        GroupingMode::Department => Query::Department {
            department: ask(input, output, DEPARTMENT_PROMPT)?,
        },
        GroupingMode::Level => Query::Level {
            department: ask(input, output, DEPARTMENT_PROMPT)?,
            level: ask(input, output, LEVEL_PROMPT)?,
        },
        GroupingMode::Class => Query::Class {
            course_code: ask(input, output, CLASS_PROMPT)?,
        },
    };

    Ok(query)
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String, PromptError> {
    output.write_all(prompt.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::EndOfInput);
    }
    Ok(line.trim().to_string())
}
