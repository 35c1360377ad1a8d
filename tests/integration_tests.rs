use std::path::{Path, PathBuf};

use assert_cmd::Command;
use grade_filter::filters::{Query, run};
use grade_filter::output::render_text;
use grade_filter::parser::{ParsePolicy, parse_report, read_report};
use predicates::prelude::*;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/average_grades.txt")
}

fn grade_filter(log_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("grade_filter").unwrap();
    cmd.env("LOG_FILE_PATH", log_dir.join("grade_filter.log"))
        .env_remove("GRADES_FILE")
        .env_remove("GRADES_PRECISION")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_full_pipeline() {
    let records = read_report(&fixture(), ParsePolicy::Strict).expect("Failed to read report");
    assert_eq!(records.len(), 8);

    let report = run(
        &records,
        &Query::Class {
            course_code: "BI121".to_string(),
        },
    )
    .unwrap();
    let smith = report.stats.get("Smith").unwrap();
    assert_eq!(smith.total_taught_count, 5);
    assert!((smith.a_percent_avg - 85.0).abs() < 1e-9);
    assert!((smith.fail_percent_avg - 7.5).abs() < 1e-9);
    assert_eq!(report.stats.keys().collect::<Vec<_>>(), vec!["Smith", "Jones"]);
}

#[test]
fn test_department_view_counts_aggregate_and_detail_lines() {
    let records = read_report(&fixture(), ParsePolicy::Strict).unwrap();
    let report = run(
        &records,
        &Query::Department {
            department: "BI".to_string(),
        },
    )
    .unwrap();

    assert_eq!(
        report.stats.keys().collect::<Vec<_>>(),
        vec!["BI121", "BI245", "BI145"]
    );
    let bi121 = report.stats.get("BI121").unwrap();
    assert_eq!(bi121.total_taught_count, 11);
    assert!((bi121.a_percent_avg - 58.0).abs() < 1e-9);
    assert!((bi121.fail_percent_avg - 13.25).abs() < 1e-9);
}

#[test]
fn test_strict_parse_rejects_bad_line() {
    let text = "Course: BI121, Instructor: Smith, Taught: lots, A%: 80.0%, FailRate: 5.0%\n";
    let err = parse_report(text).unwrap_err();
    assert_eq!(err.line_number, 1);
    assert!(err.to_string().contains("lots"));
}

#[test]
fn test_skip_invalid_keeps_good_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grades.txt");
    std::fs::write(
        &path,
        "Course: BI121, Instructor: Smith, Taught: 3, A%: 80.0%, FailRate: 5.0%\n\
         Course: BI121, Instructor: Smith, Taught: 2, A%: ninety, FailRate: 10.0%\n",
    )
    .unwrap();

    assert!(read_report(&path, ParsePolicy::Strict).is_err());

    let records = read_report(&path, ParsePolicy::SkipInvalid).unwrap();
    assert_eq!(records.len(), 1);
    let report = run(
        &records,
        &Query::Class {
            course_code: "BI121".to_string(),
        },
    )
    .unwrap();
    assert_eq!(
        render_text(&report, 1),
        "Data for Course: BI121\n\tInstructor: Smith, Teaching Count: 3, Aprec Avg: 80.0%, Failprec Avg: 5.0%\n"
    );
}

#[test]
fn test_cli_class() {
    let logs = tempfile::tempdir().unwrap();
    grade_filter(logs.path())
        .arg("--input")
        .arg(fixture())
        .args(["class", "BI121"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data for Course: BI121"))
        .stdout(predicate::str::contains(
            "Instructor: Smith, Teaching Count: 5, Aprec Avg: 85.00%, Failprec Avg: 7.50%",
        ));
}

#[test]
fn test_cli_level() {
    let logs = tempfile::tempdir().unwrap();
    grade_filter(logs.path())
        .arg("--input")
        .arg(fixture())
        .args(["level", "BI", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Course: BI245, Total Taught Count: 4"))
        .stdout(predicate::str::contains("BI145").not());
}

#[test]
fn test_cli_empty_department() {
    let logs = tempfile::tempdir().unwrap();
    grade_filter(logs.path())
        .arg("--input")
        .arg(fixture())
        .args(["department", "PH"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No data for department PH."));
}

#[test]
fn test_cli_interactive_department() {
    let logs = tempfile::tempdir().unwrap();
    grade_filter(logs.path())
        .arg("--input")
        .arg(fixture())
        .write_stdin("department\nCHL\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Course: CH301L, Total Taught Count: 6"))
        .stdout(predicate::str::contains("Course: CH301,").not());
}

#[test]
fn test_cli_interactive_invalid_mode() {
    let logs = tempfile::tempdir().unwrap();
    grade_filter(logs.path())
        .arg("--input")
        .arg(fixture())
        .arg("interactive")
        .write_stdin("semester\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid selection: semester"));
}

#[test]
fn test_cli_missing_input_fails() {
    let logs = tempfile::tempdir().unwrap();
    grade_filter(logs.path())
        .args(["--input", "/nonexistent/average_grades.txt", "department", "BI"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read report"));
}

#[test]
fn test_cli_save_json() {
    let logs = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("bi.json");

    grade_filter(logs.path())
        .arg("--input")
        .arg(fixture())
        .args(["--format", "json"])
        .arg(format!("--save={}", target.display()))
        .args(["department", "BI"])
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(saved["mode"], "department");
    assert_eq!(saved["department"], "BI");
    assert_eq!(saved["groups"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_save_default_name() {
    let logs = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();

    grade_filter(logs.path())
        .current_dir(work.path())
        .arg("--input")
        .arg(fixture())
        .args(["level", "BI", "1", "--save"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(work.path().join("level_BI_1.txt")).unwrap();
    assert!(saved.starts_with("Course: BI121"));
}

#[test]
fn test_cli_bare_save_before_subcommand() {
    let logs = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();

    grade_filter(logs.path())
        .current_dir(work.path())
        .arg("--input")
        .arg(fixture())
        .args(["--save", "class", "BI121"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data for Course: BI121"));

    let saved = std::fs::read_to_string(work.path().join("class_BI121.txt")).unwrap();
    assert!(saved.contains("Instructor: Smith, Teaching Count: 5"));
}

#[test]
fn test_cli_taught_overflow_fails() {
    let logs = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grades.txt");
    std::fs::write(
        &path,
        "Course: BI121, Instructor: Smith, Taught: 18446744073709551615, A%: 80.0%, FailRate: 5.0%\n\
         Course: BI121, Instructor: Smith, Taught: 1, A%: 90.0%, FailRate: 10.0%\n",
    )
    .unwrap();

    grade_filter(logs.path())
        .arg("--input")
        .arg(&path)
        .args(["class", "BI121"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overflows"));
}
