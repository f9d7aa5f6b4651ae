//! Test case descriptions authored as JSON batches

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};

/// A batch file as written by the test-case authoring step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCaseBatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BatchMetadata>,

    #[serde(default)]
    pub test_cases: Vec<TestCaseDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchMetadata {
    #[serde(default)]
    pub generated_at: Option<String>,

    #[serde(default)]
    pub total_cases: Option<usize>,

    /// Category name to case count, as declared by the author
    #[serde(default)]
    pub categories: BTreeMap<String, usize>,
}

/// One natural-language test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseDescription {
    /// Identifier, unique within a batch
    #[serde(default = "default_id")]
    pub id: String,

    #[serde(default = "default_title")]
    pub title: String,

    /// Free-text classification tag, e.g. "Functional" or "Security"
    #[serde(default = "default_category")]
    pub category: String,

    /// Display label only (High/Medium/Low)
    #[serde(default = "default_priority")]
    pub priority: String,

    /// Free-text steps, in execution order
    #[serde(default)]
    pub steps: Vec<String>,

    // Catalog-only fields below. Unexpected shapes are coerced rather than
    // rejected so they never block script generation.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub expected_results: Option<String>,

    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub browser_compatibility: Vec<String>,

    #[serde(default, deserialize_with = "lenient_flag")]
    pub mobile_compatibility: bool,

    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub accessibility_checks: Vec<String>,

    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub performance_metrics: Vec<String>,
}

fn default_id() -> String {
    "TC001".to_string()
}

fn default_title() -> String {
    "Untitled Test".to_string()
}

fn default_category() -> String {
    "Functional".to_string()
}

fn default_priority() -> String {
    "Medium".to_string()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// String, or a list joined with "; ". Anything else is stringified.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => scalar_text(&other),
    })
}

/// List of strings; a lone scalar becomes a one-item list.
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(&other).into_iter().collect(),
    })
}

/// Boolean, or a yes/no style string or number.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "yes" | "y" | "true" | "1"
        ),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    })
}

impl TestCaseDescription {
    /// Build a case with the given id, title and steps; remaining fields take their defaults.
    pub fn new(id: impl Into<String>, title: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: default_category(),
            priority: default_priority(),
            steps,
            description: None,
            prerequisites: Vec::new(),
            expected_results: None,
            browser_compatibility: Vec::new(),
            mobile_compatibility: false,
            accessibility_checks: Vec::new(),
            performance_metrics: Vec::new(),
        }
    }
}

impl TestCaseBatch {
    /// Parse a batch from a JSON string
    pub fn from_json(json: &str) -> HarnessResult<Self> {
        serde_json::from_str(json).map_err(HarnessError::from)
    }

    /// Parse a batch from a JSON file
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load the newest batch in `dir`, where newest means last by filename.
    ///
    /// A missing directory, a directory without `.json` files, and a batch without
    /// cases all surface as the input-missing error kind.
    pub fn load_latest(dir: &Path) -> HarnessResult<(PathBuf, Self)> {
        let path = latest_file(dir, |name| name.ends_with(".json"))
            .ok_or_else(|| HarnessError::NoTestCases(dir.display().to_string()))?;

        debug!("Reading test cases from {}", path.display());
        let batch = Self::from_file(&path)?;

        if batch.test_cases.is_empty() {
            return Err(HarnessError::EmptyBatch(path.display().to_string()));
        }

        Ok((path, batch))
    }

    /// Case counts per category. Declared metadata wins over counting the cases.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        if let Some(meta) = &self.metadata {
            if !meta.categories.is_empty() {
                return meta.categories.clone();
            }
        }

        let mut counts = BTreeMap::new();
        for case in &self.test_cases {
            *counts.entry(case.category.to_lowercase()).or_insert(0) += 1;
        }
        counts
    }
}

/// Last regular file directly inside `dir` (sorted by file name) whose name passes `accept`.
pub(crate) fn latest_file(dir: &Path, accept: impl Fn(&str) -> bool) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str().map(&accept).unwrap_or(false))
        .map(|e| e.into_path())
        .collect();

    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    candidates.pop()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_with_defaults() {
        let json = r#"{
            "test_cases": [
                { "id": "TC007", "title": "Checkout", "category": "Security", "priority": "High",
                  "steps": ["Navigate to cart", "Click pay"] },
                { "steps": [] }
            ]
        }"#;
        let batch = TestCaseBatch::from_json(json).unwrap();
        assert_eq!(batch.test_cases.len(), 2);
        assert_eq!(batch.test_cases[0].priority, "High");
        assert_eq!(batch.test_cases[0].steps.len(), 2);

        let bare = &batch.test_cases[1];
        assert_eq!(bare.id, "TC001");
        assert_eq!(bare.title, "Untitled Test");
        assert_eq!(bare.category, "Functional");
        assert_eq!(bare.priority, "Medium");
    }

    #[test]
    fn test_load_latest_picks_last_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("testcases_20240101_000000.json"),
            r#"{"test_cases":[{"id":"OLD"}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("testcases_20250101_000000.json"),
            r#"{"test_cases":[{"id":"NEW"}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("zzz_notes.md"), "ignored").unwrap();

        let (path, batch) = TestCaseBatch::load_latest(dir.path()).unwrap();
        assert!(path.ends_with("testcases_20250101_000000.json"));
        assert_eq!(batch.test_cases[0].id, "NEW");
    }

    #[test]
    fn test_load_latest_missing_dir_is_input_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = TestCaseBatch::load_latest(&dir.path().join("absent")).unwrap_err();
        assert!(err.is_input_missing());
    }

    #[test]
    fn test_load_latest_empty_batch_is_input_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cases.json"), r#"{"test_cases": []}"#).unwrap();

        let err = TestCaseBatch::load_latest(dir.path()).unwrap_err();
        assert!(matches!(err, HarnessError::EmptyBatch(_)));
    }

    #[test]
    fn test_catalog_fields_tolerate_other_shapes() {
        let json = r#"{"test_cases":[{
            "id": "TC001",
            "expected_results": ["Dashboard shown", "Token stored"],
            "mobile_compatibility": "Yes",
            "prerequisites": "Account exists",
            "browser_compatibility": null,
            "description": 42
        }]}"#;
        let case = &TestCaseBatch::from_json(json).unwrap().test_cases[0];

        assert_eq!(case.expected_results.as_deref(), Some("Dashboard shown; Token stored"));
        assert!(case.mobile_compatibility);
        assert_eq!(case.prerequisites, vec!["Account exists"]);
        assert!(case.browser_compatibility.is_empty());
        assert_eq!(case.description.as_deref(), Some("42"));
    }

    #[test]
    fn test_category_counts_fall_back_to_cases() {
        let mut batch = TestCaseBatch::default();
        batch.test_cases.push(TestCaseDescription::new("TC1", "a", vec![]));
        batch.test_cases.push(TestCaseDescription::new("TC2", "b", vec![]));

        let counts = batch.category_counts();
        assert_eq!(counts.get("functional"), Some(&2));
    }
}
