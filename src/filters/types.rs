//! Query and result types shared by the filters and the presentation layer.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::InvalidModeSelection;
use crate::stats::GroupedStats;

/// Which view of the report to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    /// Every course in a department.
    Department,
    /// Courses in a department whose level starts with a prefix.
    Level,
    /// Instructors teaching a course.
    Class,
}

impl FromStr for GroupingMode {
    type Err = InvalidModeSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "department" => Ok(Self::Department),
            "level" => Ok(Self::Level),
            "class" => Ok(Self::Class),
            _ => Err(InvalidModeSelection {
                input: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Department => "department",
            Self::Level => "level",
            Self::Class => "class",
        };
        f.write_str(name)
    }
}

/// A mode together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Query {
    Department { department: String },
    Level { department: String, level: String },
    Class { course_code: String },
}

impl Query {
    pub fn mode(&self) -> GroupingMode {
        match self {
            Self::Department { .. } => GroupingMode::Department,
            Self::Level { .. } => GroupingMode::Level,
            Self::Class { .. } => GroupingMode::Class,
        }
    }
}

/// Finalized output of one query, handed to [`crate::output`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip)]
    pub mode: GroupingMode,
    #[serde(flatten)]
    pub query: Query,
    #[serde(rename = "groups")]
    pub stats: GroupedStats,
}
