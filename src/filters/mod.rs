//! Grouping policies over parsed grade records.
//!
//! Every filter runs through [`crate::stats::aggregate`]; they differ only in
//! which records they accept and what they group by.

pub mod course;
pub mod department;
pub mod types;

pub use course::by_course;
pub use department::by_department;
pub use types::{GroupingMode, Query, Report};

use tracing::info;

use crate::error::CountOverflow;
use crate::parser::GradeRecord;

/// Runs `query` against `records`.
///
/// # Errors
///
/// Returns [`CountOverflow`] if a group's taught total does not fit in a `u64`.
pub fn run(records: &[GradeRecord], query: &Query) -> Result<Report, CountOverflow> {
    let stats = match query {
        Query::Department { department } => by_department(records, department, None)?,
        Query::Level { department, level } => {
            by_department(records, department, Some(level.as_str()))?
        }
        Query::Class { course_code } => by_course(records, course_code)?,
    };

    info!(mode = %query.mode(), groups = stats.len(), "Query complete");

    Ok(Report {
        mode: query.mode(),
        query: query.clone(),
        stats,
    })
}
