//! Run Commands

use anyhow::Result;
use clap::Args;

use qagenie_e2e::{HarnessConfig, RunOptions, TestRunner};

use crate::output::{print_info, print_summary, spinner, OutputFormat};

/// Test selection for a run. At most one of the two may be given.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Only run test files matching this pattern
    #[arg(long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Runner options as JSON, e.g. '{"headed": true, "workers": 2}'
    #[arg(long, value_name = "JSON", conflicts_with = "pattern")]
    pub options: Option<String>,
}

/// What the runner is asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    Matching(String),
    WithOptions(RunOptions),
}

impl RunArgs {
    /// Resolve the arguments. Options JSON is validated before anything runs.
    pub fn selection(&self) -> Result<Selection> {
        Ok(match (&self.pattern, &self.options) {
            (Some(pattern), _) => Selection::Matching(pattern.clone()),
            (None, Some(json)) => Selection::WithOptions(RunOptions::from_json(json)?),
            (None, None) => Selection::All,
        })
    }
}

pub fn execute(args: RunArgs, config: HarnessConfig, format: OutputFormat) -> Result<()> {
    let selection = args.selection()?;
    let runner = TestRunner::new(config);

    let progress = spinner("Running Playwright tests...", format);
    let outcome = match selection {
        Selection::All => runner.run_all(),
        Selection::Matching(pattern) => runner.run_matching(&pattern),
        Selection::WithOptions(options) => runner.run_with_options(options),
    };
    progress.finish_and_clear();
    let outcome = outcome?;

    print_summary(&outcome.summary, format);
    if format != OutputFormat::Json {
        for path in &outcome.reports {
            print_info(&format!("Report written: {}", path.display()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_selection_runs_everything() {
        assert_eq!(RunArgs::default().selection().unwrap(), Selection::All);
    }

    #[test]
    fn pattern_selects_matching() {
        let args = RunArgs {
            pattern: Some("login".into()),
            options: None,
        };
        assert_eq!(args.selection().unwrap(), Selection::Matching("login".into()));
    }

    #[test]
    fn options_json_is_parsed() {
        let args = RunArgs {
            pattern: None,
            options: Some(r#"{"headed": true}"#.into()),
        };
        let Selection::WithOptions(options) = args.selection().unwrap() else {
            panic!("expected options");
        };
        assert!(options.headed);
    }

    #[test]
    fn malformed_options_fail_early() {
        let args = RunArgs {
            pattern: None,
            options: Some("{headed".into()),
        };
        assert!(args.selection().is_err());
    }
}
