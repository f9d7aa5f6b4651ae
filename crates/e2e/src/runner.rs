//! Execution pipeline: run Playwright, aggregate its JSON report, write reports

use std::path::PathBuf;

use chrono::Utc;
use tracing::{error, info};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::playwright::{PlaywrightCommand, RunOptions};
use crate::report::{write_reports, ReportStamp};
use crate::results::{parse_output, RunSummary, TestStatus};

/// Summary of one execution plus the report files written for it
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub reports: Vec<PathBuf>,
}

/// Drives the external runner and the reporting that follows it
pub struct TestRunner {
    config: HarnessConfig,
}

impl TestRunner {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Create the report directory
    pub fn init_report_dir(&self) -> HarnessResult<()> {
        std::fs::create_dir_all(&self.config.report_dir)?;
        Ok(())
    }

    /// Run every test
    pub fn run_all(&self) -> HarnessResult<RunOutcome> {
        info!("QAgenie - Starting Test Execution");
        self.execute(self.command())
    }

    /// Run tests matching a pattern
    pub fn run_matching(&self, pattern: &str) -> HarnessResult<RunOutcome> {
        info!("Running tests matching pattern: {}", pattern);
        self.execute(self.command().pattern(pattern))
    }

    /// Run every test with explicit runner options
    pub fn run_with_options(&self, options: RunOptions) -> HarnessResult<RunOutcome> {
        info!("Running tests with options: {:?}", options);
        self.execute(self.command().options(options))
    }

    fn command(&self) -> PlaywrightCommand {
        PlaywrightCommand::new(&self.config.runner, &self.config.project_dir)
    }

    /// Invoke, parse and report.
    ///
    /// Runner and parse failures are logged and still produce a report; only
    /// filesystem errors propagate.
    pub fn execute(&self, command: PlaywrightCommand) -> HarnessResult<RunOutcome> {
        self.init_report_dir()?;

        let started_at = Utc::now();
        let clock = std::time::Instant::now();

        let (output, runner_error) = match command.invoke() {
            Ok(invocation) => (invocation.output, None),
            Err(e) => {
                error!("Test execution failed: {}", e);
                let message = e.to_string();
                // A failing test also exits non-zero, so the output is still worth parsing.
                let output = match e {
                    HarnessError::RunnerFailed { output, .. } => output,
                    _ => String::new(),
                };
                (output, Some(message))
            }
        };

        let duration = clock.elapsed().as_millis() as u64;
        let tests = parse_output(&output);

        let mut summary = RunSummary::from_results(tests, duration, started_at);
        if let Some(e) = runner_error {
            summary = summary.with_runner_error(e);
        }

        log_summary(&summary);

        let stamp = ReportStamp::from_time(started_at);
        let reports = write_reports(&self.config.report_dir, &summary, &stamp)?;

        Ok(RunOutcome { summary, reports })
    }
}

fn log_summary(summary: &RunSummary) {
    for test in &summary.tests {
        match test.status {
            TestStatus::Passed => info!("✓ {} ({} ms)", test.name, test.duration),
            TestStatus::Failed => error!(
                "✗ {} - {}",
                test.name,
                test.error.as_deref().unwrap_or("unknown error")
            ),
            TestStatus::Skipped | TestStatus::Unknown => info!("- {} ({})", test.name, test.status),
        }
    }

    info!(
        "Results: {}/{} passed, {} failed, {} skipped ({} ms)",
        summary.passed, summary.total, summary.failed, summary.skipped, summary.duration
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;

    fn runner_with(root: &std::path::Path, program: &str, args: &[&str]) -> TestRunner {
        TestRunner::new(HarnessConfig {
            project_dir: root.to_path_buf(),
            report_dir: root.join("report"),
            runner: RunnerConfig {
                program: program.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            },
            ..HarnessConfig::default()
        })
    }

    #[test]
    fn test_missing_runner_still_reports() {
        let root = tempfile::tempdir().unwrap();
        let runner = runner_with(root.path(), "qagenie-no-such-runner", &[]);

        let outcome = runner.run_all().unwrap();

        assert_eq!(outcome.summary.total, 0);
        assert!(outcome.summary.runner_error.is_some());
        assert_eq!(outcome.reports.len(), 3);
        assert!(outcome.reports.iter().all(|p| p.exists()));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_run_keeps_partial_results() {
        let root = tempfile::tempdir().unwrap();
        let script = r#"echo 'Running 2 tests'; echo '{"suites":[{"specs":[{"title":"ok","tests":[{"results":[{"status":"passed","duration":3}]}]},{"title":"bad","tests":[{"results":[{"status":"failed","duration":8,"error":{"message":"nope"}}]}]}]}]}'; exit 1"#;
        let runner = runner_with(root.path(), "sh", &["-c", script]);

        let outcome = runner.run_all().unwrap();

        assert_eq!(outcome.summary.passed, 1);
        assert_eq!(outcome.summary.failed, 1);
        assert_eq!(
            outcome.summary.runner_error.as_deref(),
            Some("Test runner exited with code 1")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_report_dir_propagates() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("report");
        std::fs::write(&blocker, "not a directory").unwrap();
        let runner = runner_with(root.path(), "true", &[]);

        assert!(matches!(runner.run_all(), Err(HarnessError::Io(_))));
    }
}
