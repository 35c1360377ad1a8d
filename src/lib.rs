pub mod config;
pub mod course;
pub mod error;
pub mod filters;
pub mod output;
pub mod parser;
pub mod prompt;
pub mod stats;
