//! Line parser for `average_grades.txt` style reports.
//!
//! Recognized lines carry five comma-separated `label: value` fields:
//!
//! ```text
//! Course: BI121, Instructor: Smith, Taught: 3, A%: 80.0%, FailRate: 5.0%
//! Course: BI121, , Taught: 12, A%: 41.2%, FailRate: 9.9%
//! ```
//!
//! Anything not starting with `Course:` is skipped.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::course::CourseCode;
use crate::error::{ParseError, ParseErrorKind};

/// Leading text that marks a line as a grade record.
pub const RECORD_MARKER: &str = "Course:";

const FIELD_COUNT: usize = 5;

/// One parsed report line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRecord {
    pub course_code: String,
    /// Empty on aggregate lines.
    pub instructor: String,
    pub taught_count: u64,
    pub a_percent: f64,
    pub fail_percent: f64,
}

impl GradeRecord {
    pub fn course(&self) -> CourseCode {
        CourseCode::decompose(&self.course_code)
    }

    /// Per-instructor lines, as opposed to course-wide aggregate lines.
    pub fn is_detail(&self) -> bool {
        !self.instructor.is_empty()
    }
}

/// How to treat recognized lines that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Stop at the first bad line.
    #[default]
    Strict,
    /// Log the bad line and keep going.
    SkipInvalid,
}

/// Result of a lenient parse: good records plus the lines that were dropped.
#[derive(Debug, Default)]
pub struct ParsedReport {
    pub records: Vec<GradeRecord>,
    pub errors: Vec<ParseError>,
}

/// Parses a single line. `line_number` is 1-based and only used for errors.
///
/// # Errors
///
/// Returns a [`ParseError`] when the line starts with `Course:` but its fields
/// do not match the report format.
pub fn parse_line(line_number: usize, line: &str) -> Result<Option<GradeRecord>, ParseError> {
    if !line.starts_with(RECORD_MARKER) {
        return Ok(None);
    }

    let fail = |kind: ParseErrorKind| ParseError::new(line_number, line, kind);

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(fail(ParseErrorKind::FieldCount {
            found: fields.len(),
        }));
    }

    let course_code = labeled_value(fields[0], 0, "Course").map_err(&fail)?;
    if course_code.is_empty() {
        return Err(fail(ParseErrorKind::EmptyCourseCode));
    }

    let instructor = if fields[1].trim().is_empty() {
        ""
    } else {
        let name = labeled_value(fields[1], 1, "Instructor").map_err(&fail)?;
        if name.is_empty() {
            return Err(fail(ParseErrorKind::EmptyInstructor));
        }
        name
    };

    let taught = labeled_value(fields[2], 2, "Taught").map_err(&fail)?;
    let taught_count = taught.parse::<u64>().map_err(|_| {
        fail(ParseErrorKind::InvalidCount {
            value: taught.to_string(),
        })
    })?;

    let a_percent = labeled_value(fields[3], 3, "A%")
        .and_then(parse_percent)
        .map_err(&fail)?;
    let fail_percent = labeled_value(fields[4], 4, "FailRate")
        .and_then(parse_percent)
        .map_err(&fail)?;

    Ok(Some(GradeRecord {
        course_code: course_code.to_string(),
        instructor: instructor.to_string(),
        taught_count,
        a_percent,
        fail_percent,
    }))
}

/// Parses every line, failing on the first bad record.
pub fn parse_report(text: &str) -> Result<Vec<GradeRecord>, ParseError> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(record) = parse_line(idx + 1, line)? {
            records.push(record);
        }
    }
    debug!(records = records.len(), "Report parsed");
    Ok(records)
}

/// Parses every line, collecting bad records instead of stopping.
pub fn parse_report_lenient(text: &str) -> ParsedReport {
    let mut parsed = ParsedReport::default();
    for (idx, line) in text.lines().enumerate() {
        match parse_line(idx + 1, line) {
            Ok(Some(record)) => parsed.records.push(record),
            Ok(None) => {}
            Err(e) => {
                warn!(line_number = e.line_number, error = %e.kind, "Skipping invalid line");
                parsed.errors.push(e);
            }
        }
    }
    debug!(
        records = parsed.records.len(),
        skipped = parsed.errors.len(),
        "Report parsed"
    );
    parsed
}

/// Reads the whole report into memory, then parses it under `policy`.
pub fn read_report(path: &Path, policy: ParsePolicy) -> Result<Vec<GradeRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;

    match policy {
        ParsePolicy::Strict => {
            let records = parse_report(&text)
                .with_context(|| format!("failed to parse report {}", path.display()))?;
            Ok(records)
        }
        ParsePolicy::SkipInvalid => Ok(parse_report_lenient(&text).records),
    }
}

fn labeled_value<'a>(
    field: &'a str,
    index: usize,
    expected: &'static str,
) -> Result<&'a str, ParseErrorKind> {
    let (label, value) = field
        .split_once(':')
        .ok_or(ParseErrorKind::MissingColon { field: index })?;

    let label = label.trim();
    if label != expected {
        return Err(ParseErrorKind::UnexpectedLabel {
            field: index,
            expected,
            found: label.to_string(),
        });
    }

    Ok(value.trim())
}

fn parse_percent(value: &str) -> Result<f64, ParseErrorKind> {
    let number = value.strip_suffix('%').unwrap_or(value).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseErrorKind::InvalidPercent {
            value: value.to_string(),
        })
}
