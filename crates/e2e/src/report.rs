//! JSON, HTML and Markdown reports for a run, plus the test-case catalog

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use tracing::info;

use crate::case::{latest_file, TestCaseBatch};
use crate::error::HarnessResult;
use crate::results::RunSummary;

const REPORT_PREFIX: &str = "test-report-";

/// File name suffix shared by every artifact of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStamp(String);

impl ReportStamp {
    /// ISO-8601 UTC with milliseconds, `:` and `.` replaced by `-`
    pub fn from_time(time: DateTime<Utc>) -> Self {
        let iso = time.to_rfc3339_opts(SecondsFormat::Millis, true);
        Self(iso.replace([':', '.'], "-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Report artifact kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Html,
    Markdown,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Json, ReportFormat::Html, ReportFormat::Markdown];

    pub fn file_name(&self, stamp: &ReportStamp) -> String {
        match self {
            ReportFormat::Json => format!("{REPORT_PREFIX}{}.json", stamp.as_str()),
            ReportFormat::Html => format!("{REPORT_PREFIX}{}.html", stamp.as_str()),
            ReportFormat::Markdown => format!("test-summary-{}.md", stamp.as_str()),
        }
    }

    pub fn render(&self, summary: &RunSummary) -> HarnessResult<String> {
        match self {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            ReportFormat::Html => Ok(render_html(summary)),
            ReportFormat::Markdown => Ok(render_markdown(summary)),
        }
    }
}

/// Write all three reports into `dir`, creating it if needed.
///
/// Filesystem errors propagate.
pub fn write_reports(
    dir: &Path,
    summary: &RunSummary,
    stamp: &ReportStamp,
) -> HarnessResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(ReportFormat::ALL.len());
    for format in ReportFormat::ALL {
        let path = dir.join(format.file_name(stamp));
        std::fs::write(&path, format.render(summary)?)?;
        info!("Report saved to: {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Newest JSON run report in `dir` by file name, if any
pub fn latest_summary(dir: &Path) -> HarnessResult<Option<(PathBuf, RunSummary)>> {
    let Some(path) = latest_file(dir, |name| {
        name.starts_with(REPORT_PREFIX) && name.ends_with(".json")
    }) else {
        return Ok(None);
    };

    let content = std::fs::read_to_string(&path)?;
    let summary: RunSummary = serde_json::from_str(&content)?;
    Ok(Some((path, summary)))
}

fn generated_at(summary: &RunSummary) -> String {
    summary
        .timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn html_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_html(summary: &RunSummary) -> String {
    let mut items = String::new();
    for test in &summary.tests {
        let _ = write!(
            items,
            r#"
        <div class="test-item {status}">
            <h4>{name}</h4>
            <p><strong>Status:</strong> {status} | <strong>Duration:</strong> {duration}ms</p>"#,
            status = test.status,
            name = html_escape(&test.name),
            duration = test.duration,
        );
        if let Some(error) = &test.error {
            let _ = write!(items, r#"
            <div class="error">{}</div>"#, html_escape(error));
        }
        items.push_str("\n        </div>");
    }

    let runner_error = summary
        .runner_error
        .as_deref()
        .map(|e| format!(r#"
    <div class="error">Runner error: {}</div>
"#, html_escape(e)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>QAgenie Test Report</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 10px; }}
        .metrics {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin: 20px 0; }}
        .metric {{ background: #f8f9fa; padding: 20px; border-radius: 8px; text-align: center; }}
        .metric.passed {{ border-left: 4px solid #28a745; }}
        .metric.failed {{ border-left: 4px solid #dc3545; }}
        .metric.skipped {{ border-left: 4px solid #ffc107; }}
        .test-list {{ margin: 20px 0; }}
        .test-item {{ padding: 10px; margin: 5px 0; border-radius: 5px; }}
        .test-item.passed {{ background: #d4edda; border: 1px solid #c3e6cb; }}
        .test-item.failed {{ background: #f8d7da; border: 1px solid #f5c6cb; }}
        .test-item.skipped {{ background: #fff3cd; border: 1px solid #ffeaa7; }}
        .test-item.unknown {{ background: #e2e3e5; border: 1px solid #d6d8db; }}
        .error {{ color: #dc3545; font-family: monospace; background: #f8f9fa; padding: 10px; border-radius: 5px; }}
    </style>
</head>
<body>
    <div class="header">
        <h1>QAgenie Test Report</h1>
        <p>Generated on: {generated}</p>
    </div>
{runner_error}
    <div class="metrics">
        <div class="metric passed">
            <h3>{passed}</h3>
            <p>Passed</p>
        </div>
        <div class="metric failed">
            <h3>{failed}</h3>
            <p>Failed</p>
        </div>
        <div class="metric skipped">
            <h3>{skipped}</h3>
            <p>Skipped</p>
        </div>
        <div class="metric">
            <h3>{duration}ms</h3>
            <p>Duration</p>
        </div>
    </div>

    <div class="test-list">
        <h2>Test Results</h2>{items}
    </div>
</body>
</html>
"#,
        generated = generated_at(summary),
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        duration = summary.duration,
    )
}

pub fn render_markdown(summary: &RunSummary) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# QAgenie Test Report\n");
    let _ = writeln!(md, "## Summary");
    let _ = writeln!(md, "- **Total Tests:** {}", summary.total);
    let _ = writeln!(md, "- **Passed:** {}", summary.passed);
    let _ = writeln!(md, "- **Failed:** {}", summary.failed);
    let _ = writeln!(md, "- **Skipped:** {}", summary.skipped);
    let _ = writeln!(md, "- **Success Rate:** {:.1}%", summary.success_rate());
    let _ = writeln!(md, "- **Duration:** {}ms", summary.duration);
    let _ = writeln!(md, "- **Generated:** {}", generated_at(summary));
    if let Some(error) = &summary.runner_error {
        let _ = writeln!(md, "- **Runner Error:** {}", error);
    }

    let _ = writeln!(md, "\n## Test Results");
    for test in &summary.tests {
        let _ = writeln!(md, "\n### {}", test.name);
        let _ = writeln!(md, "- **Status:** {}", test.status);
        let _ = writeln!(md, "- **Duration:** {}ms", test.duration);
        if let Some(error) = &test.error {
            let _ = writeln!(md, "- **Error:** {}", error);
        }
    }

    let _ = writeln!(md, "\n## Recommendations\n");
    if summary.failed > 0 {
        let _ = writeln!(
            md,
            "⚠️ **{} tests failed.** Please review the failed tests and fix the issues.",
            summary.failed
        );
    } else {
        let _ = writeln!(md, "✅ **All tests passed!** Great job!");
    }
    if summary.skipped > 0 {
        let _ = writeln!(
            md,
            "\nℹ️ **{} tests were skipped.** Consider investigating why these tests were skipped.",
            summary.skipped
        );
    }

    md
}

/// Markdown catalog of an authored batch
pub fn render_case_catalog(batch: &TestCaseBatch) -> String {
    let mut md = String::new();
    let meta = batch.metadata.as_ref();

    let generated = meta
        .and_then(|m| m.generated_at.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let total = meta
        .and_then(|m| m.total_cases)
        .unwrap_or(batch.test_cases.len());

    let _ = writeln!(md, "# QA Test Cases Report\n");
    let _ = writeln!(md, "**Generated:** {}", generated);
    let _ = writeln!(md, "**Total Test Cases:** {}\n", total);
    let _ = writeln!(md, "## Summary by Category\n");
    for (category, count) in batch.category_counts() {
        let _ = writeln!(md, "- **{}:** {} tests", title_case(&category), count);
    }

    let _ = writeln!(md, "\n## Test Cases\n");
    for case in &batch.test_cases {
        let _ = writeln!(md, "### {}: {}\n", case.id, case.title);
        let _ = writeln!(
            md,
            "**Priority:** {} | **Category:** {}\n",
            case.priority, case.category
        );
        let _ = writeln!(
            md,
            "**Description:** {}\n",
            case.description.as_deref().unwrap_or("No description")
        );

        let _ = writeln!(md, "**Prerequisites:**");
        for prereq in &case.prerequisites {
            let _ = writeln!(md, "- {}", prereq);
        }

        let _ = writeln!(md, "\n**Steps:**");
        for (i, step) in case.steps.iter().enumerate() {
            let _ = writeln!(md, "{}. {}", i + 1, step);
        }

        let _ = writeln!(
            md,
            "\n**Expected Results:** {}",
            case.expected_results.as_deref().unwrap_or("Not specified")
        );

        if !case.accessibility_checks.is_empty() {
            let _ = writeln!(md, "\n**Accessibility Checks:**");
            for check in &case.accessibility_checks {
                let _ = writeln!(md, "- {}", check);
            }
        }
        if !case.performance_metrics.is_empty() {
            let _ = writeln!(md, "\n**Performance Metrics:**");
            for metric in &case.performance_metrics {
                let _ = writeln!(md, "- {}", metric);
            }
        }

        let _ = writeln!(
            md,
            "\n**Browser Compatibility:** {}",
            case.browser_compatibility.join(", ")
        );
        let _ = writeln!(
            md,
            "**Mobile Compatible:** {}",
            if case.mobile_compatibility { "Yes" } else { "No" }
        );
        let _ = writeln!(md, "\n---\n");
    }

    md
}

/// Capitalize each word, where a word starts after any non-alphabetic character
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}
