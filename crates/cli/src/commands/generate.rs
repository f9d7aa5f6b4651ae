//! Generate Commands

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use qagenie_e2e::{GenerationOutcome, HarnessConfig, TestGenerator};

use crate::output::{print_info, print_json, print_success, print_warning, OutputFormat};

/// Files written by a generation run
#[derive(Debug, Serialize)]
pub struct GeneratedFiles {
    pub source: PathBuf,
    pub scripts: Vec<PathBuf>,
    pub suite: PathBuf,
    pub removed: Vec<PathBuf>,
}

pub fn execute(config: HarnessConfig, format: OutputFormat) -> Result<()> {
    let outcome = TestGenerator::new(&config).generate()?;

    let files = match outcome {
        GenerationOutcome::NoInput { reason } => {
            print_warning(&format!("Nothing generated: {}", reason));
            return Ok(());
        }
        GenerationOutcome::Generated {
            source,
            scripts,
            suite,
            removed,
        } => GeneratedFiles {
            source,
            scripts,
            suite,
            removed,
        },
    };

    if format == OutputFormat::Json {
        print_json(&files);
        return Ok(());
    }

    print_info(&format!("Test cases: {}", files.source.display()));
    if !files.removed.is_empty() {
        print_info(&format!("Removed {} stale script(s)", files.removed.len()));
    }
    for script in &files.scripts {
        print_success(&format!("Generated {}", script.display()));
    }
    print_success(&format!("Generated suite {}", files.suite.display()));

    Ok(())
}
