//! Environment-driven settings.
//!
//! Values come from the process environment after `.env` has been loaded with
//! `dotenvy`. Command-line flags override them.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::output::DEFAULT_PRECISION;

pub const DEFAULT_GRADES_FILE: &str = "average_grades.txt";
pub const DEFAULT_LOG_FILE: &str = "logs/grade_filter.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `GRADES_FILE`
    pub grades_file: PathBuf,
    /// `LOG_FILE_PATH`
    pub log_file: PathBuf,
    /// `GRADES_PRECISION`
    pub precision: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grades_file: PathBuf::from(DEFAULT_GRADES_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Settings {
    /// Loads `.env` if present, then reads settings from the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; unset keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let precision = match lookup("GRADES_PRECISION") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("GRADES_PRECISION must be a whole number, got {raw:?}"))?,
            None => defaults.precision,
        };

        Ok(Self {
            grades_file: lookup("GRADES_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.grades_file),
            log_file: lookup("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            precision,
        })
    }
}
