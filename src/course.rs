//! Course code decomposition.

/// Department and level pulled out of a course code.
///
/// Both parts are built by filtering characters rather than splitting at a
/// fixed offset, so letters after the digits still count toward the
/// department: `CH301L` decomposes into `CHL` / `301`. Characters that are
/// neither alphabetic nor ASCII digits are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCode {
    pub department: String,
    pub level: String,
}

impl CourseCode {
    pub fn decompose(code: &str) -> Self {
        Self {
            department: code.chars().filter(|c| c.is_alphabetic()).collect(),
            level: code.chars().filter(|c| c.is_ascii_digit()).collect(),
        }
    }

    /// String-prefix match on the level: `"1"` matches `"100"`, `"199"` and `"1"`.
    pub fn level_starts_with(&self, prefix: &str) -> bool {
        self.level.starts_with(prefix)
    }
}
