//! Playwright JSON reporter output: typed schema, parsing and aggregation

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HarnessError, HarnessResult};

/// Final status of one test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    Unknown,
}

impl TestStatus {
    /// Map a Playwright attempt status
    pub fn from_playwright(status: &str) -> Self {
        match status {
            "passed" => TestStatus::Passed,
            "failed" | "timedOut" | "interrupted" => TestStatus::Failed,
            "skipped" => TestStatus::Skipped,
            _ => TestStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
            TestStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one test as reported by the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    /// Milliseconds
    pub duration: u64,
    /// Only present for failed tests
    pub error: Option<String>,
}

/// Aggregated outcome of one runner execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Skipped plus unknown
    pub skipped: usize,
    /// Wall-clock milliseconds of the runner invocation
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
    pub tests: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_error: Option<String>,
}

impl RunSummary {
    /// Count statuses over `tests`
    pub fn from_results(tests: Vec<TestResult>, duration: u64, timestamp: DateTime<Utc>) -> Self {
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        for test in &tests {
            match test.status {
                TestStatus::Passed => passed += 1,
                TestStatus::Failed => failed += 1,
                TestStatus::Skipped | TestStatus::Unknown => skipped += 1,
            }
        }

        Self {
            total: tests.len(),
            passed,
            failed,
            skipped,
            duration,
            timestamp,
            tests,
            runner_error: None,
        }
    }

    pub fn with_runner_error(mut self, error: impl Into<String>) -> Self {
        self.runner_error = Some(error.into());
        self
    }

    /// Percentage of passed tests, 0 when nothing ran
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }
}

// Reporter schema. Only the fields the harness reads are modeled; the rest of
// Playwright's report is ignored.

#[derive(Debug, Deserialize)]
struct ReportEnvelope {
    #[serde(default)]
    suites: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Suite {
    #[serde(default)]
    title: String,
    #[serde(default)]
    suites: Vec<Suite>,
    #[serde(default)]
    specs: Vec<Spec>,
}

#[derive(Debug, Deserialize)]
struct Spec {
    title: String,
    #[serde(default)]
    tests: Vec<SpecTest>,
}

#[derive(Debug, Deserialize)]
struct SpecTest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    results: Vec<Attempt>,
}

#[derive(Debug, Deserialize)]
struct Attempt {
    status: Option<String>,
    #[serde(default)]
    duration: u64,
    #[serde(default)]
    error: Option<AttemptError>,
}

#[derive(Debug, Deserialize)]
struct AttemptError {
    #[serde(default)]
    message: Option<String>,
}

/// Parse the runner's captured output into test results.
///
/// Never fails: a missing report or a malformed suite is logged and whatever
/// was collected up to that point is returned.
pub fn parse_output(output: &str) -> Vec<TestResult> {
    let report = match locate_report(output) {
        Ok(report) => report,
        Err(e) => {
            warn!("Error parsing results: {}", e);
            return Vec::new();
        }
    };

    let envelope: ReportEnvelope = match serde_json::from_value(report) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Error parsing results: {}", e);
            return Vec::new();
        }
    };

    let mut results = Vec::new();
    for (index, raw) in envelope.suites.into_iter().enumerate() {
        match serde_json::from_value::<Suite>(raw) {
            Ok(suite) => collect_suite(&suite, &mut results),
            Err(e) => {
                warn!("Error parsing results: suite #{} is malformed: {}", index, e);
                break;
            }
        }
    }

    debug!("Parsed {} test result(s)", results.len());
    results
}

/// Find the first JSON object that starts at the beginning of a line and has
/// the shape of a whole report: a `suites` key and no `specs` key.
///
/// The object may span several lines; anything after it is ignored. When the
/// report itself is truncated, inner suite objects are skipped.
pub fn locate_report(output: &str) -> HarnessResult<serde_json::Value> {
    let mut offset = 0;

    for line in output.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('{') {
            let start = offset + (line.len() - trimmed.len());
            let mut stream =
                serde_json::Deserializer::from_str(&output[start..]).into_iter::<serde_json::Value>();

            if let Some(Ok(value)) = stream.next() {
                if is_report(&value) {
                    return Ok(value);
                }
                debug!("Skipping JSON object that is not a runner report");
            }
        }
        offset += line.len();
    }

    Err(HarnessError::ReportParse(
        "no JSON object found in runner output".to_string(),
    ))
}

fn is_report(value: &serde_json::Value) -> bool {
    value.get("suites").is_some() && value.get("specs").is_none()
}

fn collect_suite(suite: &Suite, out: &mut Vec<TestResult>) {
    for spec in &suite.specs {
        for test in &spec.tests {
            out.push(to_result(spec, test));
        }
    }
    for child in &suite.suites {
        collect_suite(child, out);
    }
    if suite.specs.is_empty() && suite.suites.is_empty() {
        debug!("Suite '{}' has no specs", suite.title);
    }
}

fn to_result(spec: &Spec, test: &SpecTest) -> TestResult {
    let name = test.title.clone().unwrap_or_else(|| spec.title.clone());

    // Retries append attempts; the last one is the outcome.
    let Some(last) = test.results.last() else {
        return TestResult {
            name,
            status: TestStatus::Unknown,
            duration: 0,
            error: None,
        };
    };

    let status = last
        .status
        .as_deref()
        .map(TestStatus::from_playwright)
        .unwrap_or(TestStatus::Unknown);

    let error = match status {
        TestStatus::Failed => Some(
            last.error
                .as_ref()
                .and_then(|e| e.message.clone())
                .unwrap_or_else(|| "Test failed without an error message".to_string()),
        ),
        _ => None,
    };

    TestResult {
        name,
        status,
        duration: last.duration,
        error,
    }
}
