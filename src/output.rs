//! Report formatting and persistence.
//!
//! Supports the plain-text listing, JSON, and CSV. Nothing here aggregates;
//! it only formats a finalized [`Report`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::filters::{GroupingMode, Query, Report};

/// Decimal places used for percentages unless configured otherwise.
pub const DEFAULT_PRECISION: usize = 2;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a Report,
}

/// Renders the human-readable listing.
///
/// Department and level views print one `Course:` line per course; the class
/// view prints a `Data for Course:` header followed by one tab-indented line
/// per instructor.
pub fn render_text(report: &Report, precision: usize) -> String {
    let mut lines = Vec::with_capacity(report.stats.len() + 1);

    if let Query::Class { course_code } = &report.query {
        lines.push(format!("Data for Course: {course_code}"));
    }

    if report.stats.is_empty() {
        lines.push(no_data_message(&report.query));
    }

    lines.extend(report.stats.iter().map(|entry| match report.mode {
        GroupingMode::Class => format!(
            "\tInstructor: {}, Teaching Count: {}, Aprec Avg: {:.p$}%, Failprec Avg: {:.p$}%",
            entry.key,
            entry.total_taught_count,
            entry.a_percent_avg,
            entry.fail_percent_avg,
            p = precision,
        ),
        GroupingMode::Department | GroupingMode::Level => format!(
            "Course: {}, Total Taught Count: {}, Aprec Avg: {:.p$}%, Failprec Avg: {:.p$}%",
            entry.key,
            entry.total_taught_count,
            entry.a_percent_avg,
            entry.fail_percent_avg,
            p = precision,
        ),
    }));

    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// Renders the report as pretty-printed JSON stamped with the current time.
pub fn render_json(report: &Report) -> Result<String> {
    let doc = JsonReport {
        generated_at: Utc::now(),
        report,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Renders one CSV row per group, with a header row.
pub fn render_csv(report: &Report) -> Result<String> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for entry in &report.stats {
        writer.serialize(entry)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes the report as CSV to `path`, replacing any existing file.
pub fn write_csv(path: &Path, report: &Report) -> Result<()> {
    write_report(path, &render_csv(report)?)
}

/// Writes rendered output to `path`, creating parent directories as needed.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    debug!(path = %path.display(), bytes = contents.len(), "Writing report");
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Report saved");
    Ok(())
}

/// File name used when a report is saved without an explicit path:
/// `dept_<dept>.txt`, `level_<dept>_<level>.txt` or `class_<code>.txt`.
pub fn default_report_name(query: &Query) -> String {
    match query {
        Query::Department { department } => format!("dept_{department}.txt"),
        Query::Level { department, level } => format!("level_{department}_{level}.txt"),
        Query::Class { course_code } => format!("class_{course_code}.txt"),
    }
}

fn no_data_message(query: &Query) -> String {
    match query {
        Query::Department { department } => format!("No data for department {department}."),
        Query::Level { department, level } => {
            format!("No data for department {department} at level {level}.")
        }
        Query::Class { course_code } => format!("No data for course {course_code}."),
    }
}
