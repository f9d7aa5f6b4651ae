//! Error types for the QAgenie harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("No test case files found in {0}")]
    NoTestCases(String),

    #[error("Test case file {0} contains no test cases")]
    EmptyBatch(String),

    #[error("Test runner `{program}` could not be started: {reason}")]
    RunnerNotFound { program: String, reason: String },

    #[error("Test runner exited with {}", exit_label(.code))]
    RunnerFailed {
        code: Option<i32>,
        /// Captured stdout followed by stderr
        output: String,
    },

    #[error("Invalid run options: {0}")]
    InvalidOptions(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Runner report could not be parsed: {0}")]
    ReportParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl HarnessError {
    /// True for the input-missing kind, which callers treat as an early exit.
    pub fn is_input_missing(&self) -> bool {
        matches!(self, HarnessError::NoTestCases(_) | HarnessError::EmptyBatch(_))
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
