use crate::error::CountOverflow;
use crate::parser::GradeRecord;
use crate::stats::{GroupedStats, aggregate};

/// Per-course statistics for one department, keyed by full course code.
///
/// `level` is a string prefix on the course's digits, so `"1"` selects every
/// 100-level course (and a bare `"1"`). Aggregate and detail lines both count.
pub fn by_department(
    records: &[GradeRecord],
    department: &str,
    level: Option<&str>,
) -> Result<GroupedStats, CountOverflow> {
    aggregate(
        records,
        |r| r.course_code.clone(),
        |r| {
            let code = r.course();
            code.department == department && level.is_none_or(|l| code.level_starts_with(l))
        },
    )
}
