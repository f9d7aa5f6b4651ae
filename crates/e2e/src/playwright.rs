//! Playwright test runner invocation

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RunnerConfig;
use crate::error::{HarnessError, HarnessResult};

/// Pass-through execution options, as accepted by `--options`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Run with a visible browser
    pub headed: bool,

    /// Parallel worker slots
    pub workers: u32,

    /// Re-run attempts per failing test
    pub retries: u32,

    /// Per-test timeout in milliseconds
    pub timeout: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            headed: false,
            workers: 4,
            retries: 1,
            timeout: 30_000,
        }
    }
}

impl RunOptions {
    /// Parse the JSON option object; missing keys take their defaults
    pub fn from_json(json: &str) -> HarnessResult<Self> {
        serde_json::from_str(json).map_err(|e| HarnessError::InvalidOptions(e.to_string()))
    }

    fn push_args(&self, args: &mut Vec<String>) {
        if self.headed {
            args.push("--headed".to_string());
        }
        if self.workers > 0 {
            args.push(format!("--workers={}", self.workers));
        }
        if self.retries > 0 {
            args.push(format!("--retries={}", self.retries));
        }
        if self.timeout > 0 {
            args.push(format!("--timeout={}", self.timeout));
        }
    }
}

/// A fully specified runner command line
#[derive(Debug, Clone)]
pub struct PlaywrightCommand {
    program: String,
    base_args: Vec<String>,
    pattern: Option<String>,
    options: Option<RunOptions>,
    working_dir: PathBuf,
}

/// Captured result of a finished runner process
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Stdout followed by stderr
    pub output: String,
    pub duration: Duration,
}

impl PlaywrightCommand {
    pub fn new(runner: &RunnerConfig, working_dir: &Path) -> Self {
        Self {
            program: runner.program.clone(),
            base_args: runner.args.clone(),
            pattern: None,
            options: None,
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Restrict the run to tests matching `pattern`
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program name
    pub fn args(&self) -> Vec<String> {
        let mut args = self.base_args.clone();
        if let Some(pattern) = &self.pattern {
            args.push(pattern.clone());
        }
        args.push("--reporter=json".to_string());
        if let Some(options) = &self.options {
            options.push_args(&mut args);
        }
        args
    }

    /// Human-readable command line for logs
    pub fn display(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion, blocking the calling thread.
    ///
    /// A non-zero exit is returned as [`HarnessError::RunnerFailed`], which still
    /// carries the captured output.
    pub fn invoke(&self) -> HarnessResult<Invocation> {
        info!("Executing: {}", self.display());
        let start = Instant::now();

        let output = Command::new(&self.program)
            .args(self.args())
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| HarnessError::RunnerNotFound {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let duration = start.elapsed();
        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !captured.is_empty() && !captured.ends_with('\n') {
                captured.push('\n');
            }
            captured.push_str(&stderr);
        }

        debug!(
            "Runner exited with {:?} after {} ms ({} bytes of output)",
            output.status.code(),
            duration.as_millis(),
            captured.len()
        );

        if !output.status.success() {
            return Err(HarnessError::RunnerFailed {
                code: output.status.code(),
                output: captured,
            });
        }

        Ok(Invocation {
            output: captured,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> PlaywrightCommand {
        PlaywrightCommand::new(&RunnerConfig::default(), Path::new("."))
    }

    #[test]
    fn test_default_command_line() {
        assert_eq!(command().display(), "npx playwright test --reporter=json");
    }

    #[test]
    fn test_pattern_precedes_reporter() {
        let args = command().pattern("TC00*").args();
        assert_eq!(args, vec!["playwright", "test", "TC00*", "--reporter=json"]);
    }

    #[test]
    fn test_options_flags() {
        let options = RunOptions::from_json(r#"{"headed": true}"#).unwrap();
        assert_eq!(
            command().options(options).display(),
            "npx playwright test --reporter=json --headed --workers=4 --retries=1 --timeout=30000"
        );
    }

    #[test]
    fn test_zero_values_are_omitted() {
        let options = RunOptions::from_json(r#"{"workers": 0, "retries": 0, "timeout": 0}"#).unwrap();
        assert_eq!(command().options(options).display(), "npx playwright test --reporter=json");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options = RunOptions::from_json(r#"{"workers": 2, "browser": "firefox"}"#).unwrap();
        assert_eq!(options.workers, 2);
        assert_eq!(options.retries, 1);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = RunOptions::from_json("{headed: yes}").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidOptions(_)));

        let err = RunOptions::from_json(r#"{"workers": -1}"#).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidOptions(_)));
    }

    #[test]
    fn test_missing_program_is_runner_not_found() {
        let runner = RunnerConfig {
            program: "qagenie-definitely-not-installed".to_string(),
            args: vec![],
        };
        let err = PlaywrightCommand::new(&runner, Path::new("."))
            .invoke()
            .unwrap_err();
        assert!(matches!(err, HarnessError::RunnerNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_keeps_output() {
        let runner = RunnerConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo partial; echo oops >&2; exit 3".to_string()],
        };
        let err = PlaywrightCommand::new(&runner, Path::new("."))
            .invoke()
            .unwrap_err();

        match err {
            HarnessError::RunnerFailed { code, output } => {
                assert_eq!(code, Some(3));
                assert_eq!(output, "partial\noops\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
