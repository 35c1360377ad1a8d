use crate::error::CountOverflow;
use crate::parser::GradeRecord;
use crate::stats::{GroupedStats, aggregate};

/// Per-instructor statistics for a course, keyed by instructor name.
///
/// Matching is a prefix test on the course code, so `"BI1"` also picks up
/// `BI121` and `BI10`. Only detail lines carry an instructor and take part.
pub fn by_course(
    records: &[GradeRecord],
    course_code: &str,
) -> Result<GroupedStats, CountOverflow> {
    aggregate(
        records,
        |r| r.instructor.clone(),
        |r| r.is_detail() && r.course_code.starts_with(course_code),
    )
}
