//! CLI entry point for the grade report filter.
//!
//! Reads an `average_grades.txt` style report and prints per-course or
//! per-instructor averages for a department, a department level, or a class.
//! Without a subcommand the query is asked for interactively.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use grade_filter::{
    config::Settings,
    filters::{Query, Report, run},
    output::{default_report_name, render_csv, render_json, render_text, write_report},
    parser::{ParsePolicy, read_report},
    prompt::{PromptError, prompt_query},
};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grade_filter")]
#[command(about = "Filter historical course grade statistics", long_about = None)]
struct Cli {
    /// Grade report to read [default: $GRADES_FILE or average_grades.txt]
    #[arg(short, long, global = true, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Skip malformed course lines (logged) instead of failing
    #[arg(long, global = true, default_value_t = false)]
    skip_invalid: bool,

    /// Decimal places for percentages [default: $GRADES_PRECISION or 2]
    #[arg(short, long, global = true)]
    precision: Option<usize>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also save the report; `--save=PATH` picks the file, bare `--save` uses dept_<DEPT>.txt style names
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, value_name = "PATH")]
    save: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-course averages for every course in a department
    Department {
        /// Department code (e.g. "BI")
        department: String,
    },
    /// Per-course averages for a department's courses at a level
    Level {
        /// Department code (e.g. "BI")
        department: String,

        /// Level prefix; "1" selects 100-level courses
        level: String,
    },
    /// Per-instructor averages for a course (prefix match on the code)
    Class {
        /// Course code (e.g. "BI121")
        course_code: String,
    },
    /// Ask for the query on stdin
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    let _log_guard = init_logging(&settings.log_file);

    let cli = Cli::parse();

    let path = cli.input.clone().unwrap_or_else(|| settings.grades_file.clone());
    let policy = if cli.skip_invalid {
        ParsePolicy::SkipInvalid
    } else {
        ParsePolicy::Strict
    };

    // The report is fully loaded before any prompting or filtering.
    let records = read_report(&path, policy)?;
    info!(path = %path.display(), records = records.len(), "Grade report loaded");

    let query = match cli.command {
        Some(Commands::Department { department }) => Query::Department { department },
        Some(Commands::Level { department, level }) => Query::Level { department, level },
        Some(Commands::Class { course_code }) => Query::Class { course_code },
        Some(Commands::Interactive) | None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let result = prompt_query(&mut stdin.lock(), &mut stdout);
            writeln!(stdout)?;
            match result {
                Ok(query) => query,
                Err(PromptError::InvalidMode(e)) => {
                    warn!(input = %e.input, "Invalid mode selection");
                    println!("Invalid selection: {}", e.input);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    let report = run(&records, &query)?;
    let precision = cli.precision.unwrap_or(settings.precision);
    let rendered = render(&report, cli.format, precision)?;

    print!("{rendered}");
    io::stdout().flush()?;

    if let Some(save) = cli.save {
        let target = save.unwrap_or_else(|| {
            PathBuf::from(default_report_name(&query)).with_extension(cli.format.extension())
        });
        write_report(&target, &rendered)?;
    }

    Ok(())
}

#[tracing::instrument(skip(report), fields(mode = %report.mode, groups = report.stats.len()))]
fn render(report: &Report, format: OutputFormat, precision: usize) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, precision)),
        OutputFormat::Json => render_json(report),
        OutputFormat::Csv => render_csv(report),
    }
}

/// Colored stderr plus a JSON rolling log file. The returned guard must be
/// held until exit so buffered file output is flushed.
fn init_logging(log_file: &Path) -> WorkerGuard {
    let log_dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_file_name = log_file
        .file_name()
        .unwrap_or(OsStr::new("grade_filter.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}
