//! Harness configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "qagenie.toml";

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Working directory for the external runner
    pub project_dir: PathBuf,

    /// Directory holding authored test-case batches
    pub testcases_dir: PathBuf,

    /// Directory generated scripts are written to
    pub test_dir: PathBuf,

    /// Directory reports are written to
    pub report_dir: PathBuf,

    /// External runner command
    pub runner: RunnerConfig,

    /// Script rendering
    pub script: ScriptConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            testcases_dir: PathBuf::from("testcases"),
            test_dir: PathBuf::from("test"),
            report_dir: PathBuf::from("report"),
            runner: RunnerConfig::default(),
            script: ScriptConfig::default(),
        }
    }
}

/// How to launch the external test runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub program: String,

    /// Arguments placed before the pattern and reporter flags
    pub args: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["playwright".to_string(), "test".to_string()],
        }
    }
}

/// Values substituted into generated scripts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Page every navigate step opens
    pub target_url: String,

    /// Text the title and content checks expect
    pub expected_text: String,

    /// Name of the `test.describe` block in the combined suite
    pub suite_name: String,

    /// Where generated scripts save their screenshots, relative to the runner's working directory
    pub screenshot_dir: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            target_url: "https://example.com".to_string(),
            expected_text: "Example Domain".to_string(),
            suite_name: "Automated Test Suite".to_string(),
            screenshot_dir: "report".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> HarnessResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> HarnessResult<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> HarnessResult<()> {
        if self.runner.program.trim().is_empty() {
            return Err(HarnessError::InvalidConfig(
                "runner.program must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
