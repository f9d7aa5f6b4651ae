//! Case catalog Commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use qagenie_e2e::report::render_case_catalog;
use qagenie_e2e::{HarnessConfig, TestCaseBatch};

use crate::output::{print_json, print_success, print_warning, OutputFormat};

#[derive(Args, Debug, Clone, Default)]
pub struct CasesArgs {
    /// Write the Markdown catalog here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Render the newest test case batch as a Markdown catalog
pub fn execute(args: CasesArgs, config: HarnessConfig, format: OutputFormat) -> Result<()> {
    let (source, batch) = match TestCaseBatch::load_latest(&config.testcases_dir) {
        Ok(found) => found,
        Err(e) if e.is_input_missing() => {
            print_warning(&e.to_string());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if format == OutputFormat::Json && args.output.is_none() {
        print_json(&batch);
        return Ok(());
    }

    let catalog = render_case_catalog(&batch);
    match args.output {
        Some(path) => {
            std::fs::write(&path, catalog)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!(
                "Catalog of {} case(s) from {} written to {}",
                batch.test_cases.len(),
                source.display(),
                path.display()
            ));
        }
        None => print!("{}", catalog),
    }

    Ok(())
}
