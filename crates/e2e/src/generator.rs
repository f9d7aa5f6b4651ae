//! Test generation pipeline: latest batch in, Playwright specs out

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::case::{TestCaseBatch, TestCaseDescription};
use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::script::{script_file_name, ScriptRenderer, SCRIPT_EXTENSION, SUITE_FILE_NAME};

/// What a generation run produced
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// No batch file, or a batch without cases. Nothing was written.
    NoInput { reason: String },

    Generated {
        source: PathBuf,
        /// One per case, in input order
        scripts: Vec<PathBuf>,
        suite: PathBuf,
        /// Stale scripts removed before writing
        removed: Vec<PathBuf>,
    },
}

/// Converts authored test cases into Playwright specs
pub struct TestGenerator {
    testcases_dir: PathBuf,
    test_dir: PathBuf,
    renderer: ScriptRenderer,
}

impl TestGenerator {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            testcases_dir: config.testcases_dir.clone(),
            test_dir: config.test_dir.clone(),
            renderer: ScriptRenderer::new(config.script.clone()),
        }
    }

    /// Run the pipeline on the newest batch.
    ///
    /// Missing input is an early exit, not an error. Malformed batches and
    /// filesystem failures propagate.
    pub fn generate(&self) -> HarnessResult<GenerationOutcome> {
        let (source, batch) = match TestCaseBatch::load_latest(&self.testcases_dir) {
            Ok(found) => found,
            Err(e) if e.is_input_missing() => {
                error!("{}", e);
                return Ok(GenerationOutcome::NoInput { reason: e.to_string() });
            }
            Err(e) => return Err(e),
        };

        info!("Reading test cases from: {}", source.display());
        self.generate_cases(source, &batch.test_cases)
    }

    /// Render `cases` into the test directory, replacing any earlier scripts
    pub fn generate_cases(
        &self,
        source: PathBuf,
        cases: &[TestCaseDescription],
    ) -> HarnessResult<GenerationOutcome> {
        if cases.is_empty() {
            let reason = format!("No test cases found in {}", source.display());
            error!("{}", reason);
            return Ok(GenerationOutcome::NoInput { reason });
        }

        info!("Converting {} test cases to Playwright scripts...", cases.len());

        std::fs::create_dir_all(&self.test_dir)?;
        let removed = remove_scripts(&self.test_dir)?;

        let mut scripts = Vec::with_capacity(cases.len());
        for case in cases {
            let path = self.test_dir.join(script_file_name(case));
            if scripts.contains(&path) {
                warn!("{} overwrites a script generated earlier in this run", path.display());
            }
            std::fs::write(&path, self.renderer.render_test(case))?;
            info!("Generated: {}", path.display());
            scripts.push(path);
        }

        let suite = self.test_dir.join(SUITE_FILE_NAME);
        std::fs::write(&suite, self.renderer.render_suite(cases))?;
        info!("Generated: {}", suite.display());

        info!("Successfully converted {} test cases to Playwright scripts", cases.len());

        Ok(GenerationOutcome::Generated {
            source,
            scripts,
            suite,
            removed,
        })
    }
}

/// Delete every generated-script file directly inside `dir`
fn remove_scripts(dir: &Path) -> HarnessResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_script = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(SCRIPT_EXTENSION))
            .unwrap_or(false);

        if is_script && path.is_file() {
            std::fs::remove_file(&path)?;
            info!("Deleted old file: {}", path.display());
            removed.push(path);
        }
    }
    removed.sort();
    Ok(removed)
}
