//! Playwright script rendering for classified test cases
//!
//! Each case renders either as a standalone spec file (with its own import
//! header) or as a block for the combined suite, which carries one shared
//! header around a `test.describe` wrapper.

use crate::case::TestCaseDescription;
use crate::classify::{classify_steps, Action, ClassifiedStep};
use crate::config::ScriptConfig;

/// Extension of every generated script
pub const SCRIPT_EXTENSION: &str = ".spec.ts";

/// File name of the combined suite
pub const SUITE_FILE_NAME: &str = "automated_test_suite.spec.ts";

const IMPORT_HEADER: &str = "import { test, expect } from '@playwright/test';\n";

/// Indentation of step lines inside the `try` block
const STEP_INDENT: &str = "        ";

/// Renders test cases into Playwright TypeScript
#[derive(Debug, Clone)]
pub struct ScriptRenderer {
    config: ScriptConfig,
}

impl Default for ScriptRenderer {
    fn default() -> Self {
        Self::new(ScriptConfig::default())
    }
}

impl ScriptRenderer {
    pub fn new(config: ScriptConfig) -> Self {
        Self { config }
    }

    /// Standalone spec file for one case
    pub fn render_test(&self, case: &TestCaseDescription) -> String {
        let steps = classify_steps(&case.steps);
        format!("{IMPORT_HEADER}\n{}", self.test_block(case, &steps))
    }

    /// Block for the combined suite: same body as [`render_test`](Self::render_test), no header
    pub fn render_suite_member(&self, case: &TestCaseDescription) -> String {
        let steps = classify_steps(&case.steps);
        format!("\n{}", self.test_block(case, &steps))
    }

    /// Combined suite: one header, one describe block, members in input order
    pub fn render_suite(&self, cases: &[TestCaseDescription]) -> String {
        let members: Vec<String> = cases.iter().map(|c| self.render_suite_member(c)).collect();

        format!(
            "{IMPORT_HEADER}\ntest.describe('{name}', () => {{\n{members}\n}});\n",
            name = js_escape(&self.config.suite_name),
            members = members.join("\n"),
        )
    }

    fn test_block(&self, case: &TestCaseDescription, steps: &[ClassifiedStep]) -> String {
        let step_lines: Vec<String> = steps.iter().map(|s| self.step_to_js(s)).collect();
        let step_code = step_lines.join(&format!("\n{STEP_INDENT}"));

        format!(
            r#"test('{title}', async ({{ page }}) => {{
    // Test metadata
    const testId = '{id}';
    const category = '{category}';
    const priority = '{priority}';

    console.log('Running test: ' + testId + ' - ' + category + ' (' + priority + ')');

    try {{
{STEP_INDENT}{step_code}

        // Take screenshot on success
        await page.screenshot({{ path: '{shots}/' + testId + '_success.png' }});

    }} catch (error) {{
        console.error('Test failed:', error.message);
        // Take screenshot on failure
        try {{
            await page.screenshot({{
                path: '{shots}/' + testId + '_failure_' + Date.now() + '.png',
                fullPage: true
            }});
        }} catch (screenshotError) {{
            console.error('Failed to take screenshot:', screenshotError.message);
        }}
        throw error;
    }}
}});
"#,
            title = js_escape(&case.title),
            id = js_escape(&case.id),
            category = js_escape(&case.category),
            priority = js_escape(&case.priority),
            shots = js_escape(&self.config.screenshot_dir),
        )
    }

    /// Convert a classified step to one line of JavaScript
    fn step_to_js(&self, step: &ClassifiedStep) -> String {
        let expected = &self.config.expected_text;
        match step.action {
            Action::Navigate => format!(
                "await page.goto('{}', {{ waitUntil: 'domcontentloaded' }});",
                js_escape(&self.config.target_url)
            ),
            Action::VerifyTitle => format!(
                "await expect(page).toHaveTitle(/{}/);",
                regex::escape(expected).replace('/', "\\/")
            ),
            Action::VerifyContent => format!(
                "await expect(page.locator('body')).toContainText('{}');",
                js_escape(expected)
            ),
            Action::VerifyVisible => {
                "await expect(page.locator('body')).toBeVisible({ timeout: 10000 });".to_string()
            }
            Action::Click => "await page.click('a', { timeout: 10000 });".to_string(),
            Action::MeasurePerformance => {
                "console.log('Performance check: Page loaded successfully');".to_string()
            }
            Action::PressKey => "await page.keyboard.press('Tab');".to_string(),
            Action::LogOnly => format!("console.log('Step: {}');", js_escape(&step.text)),
        }
    }
}

/// File name for a case: `<id>_<sanitized title>.spec.ts`.
///
/// Sanitizing is lossy, so distinct titles can produce the same name.
pub fn script_file_name(case: &TestCaseDescription) -> String {
    format!("{}_{}{}", case.id, sanitize_title(&case.title), SCRIPT_EXTENSION)
}

/// Replace every character outside `[A-Za-z0-9]` with `_`
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Escape a value for a single-quoted JavaScript string literal
fn js_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_case() -> TestCaseDescription {
        let mut case = TestCaseDescription::new(
            "TC001",
            "User Registration Flow",
            vec![
                "Navigate to signup page".to_string(),
                "Enter valid email address".to_string(),
                "Click on 'Create Account' button".to_string(),
                "Verify page title".to_string(),
            ],
        );
        case.priority = "High".to_string();
        case
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = ScriptRenderer::default();
        let case = sample_case();
        assert_eq!(renderer.render_test(&case), renderer.render_test(&case));
        assert_eq!(
            renderer.render_suite(&[case.clone()]),
            renderer.render_suite(&[case])
        );
    }

    #[test]
    fn test_standalone_script_contents() {
        let script = ScriptRenderer::default().render_test(&sample_case());

        assert!(script.starts_with("import { test, expect } from '@playwright/test';"));
        assert!(script.contains("test('User Registration Flow', async ({ page }) => {"));
        assert!(script.contains("const testId = 'TC001';"));
        assert!(script.contains("const priority = 'High';"));
        assert!(script.contains(
            "        await page.goto('https://example.com', { waitUntil: 'domcontentloaded' });"
        ));
        assert!(script.contains("console.log('Step: Enter valid email address');"));
        assert!(script.contains("await page.click('a', { timeout: 10000 });"));
        assert!(script.contains("await expect(page).toHaveTitle(/Example Domain/);"));
        assert!(script.contains("'report/' + testId + '_success.png'"));
        assert!(script.contains("'_failure_' + Date.now() + '.png'"));
    }

    #[test]
    fn test_empty_steps_render_no_step_lines() {
        let case = TestCaseDescription::new("TC009", "Nothing", vec![]);
        let script = ScriptRenderer::default().render_test(&case);

        assert!(!script.contains("await page.goto"));
        assert!(!script.contains("console.log('Step:"));
        assert!(script.contains("const testId = 'TC009';"));
    }

    #[test]
    fn test_suite_has_single_import_and_keeps_order() {
        let renderer = ScriptRenderer::default();
        let first = TestCaseDescription::new("TC001", "First", vec!["Visit home".to_string()]);
        let second = TestCaseDescription::new("TC002", "Second", vec![]);

        let suite = renderer.render_suite(&[first, second]);

        assert_eq!(suite.matches("import { test, expect }").count(), 1);
        assert!(suite.contains("test.describe('Automated Test Suite', () => {"));
        let a = suite.find("test('First'").unwrap();
        let b = suite.find("test('Second'").unwrap();
        assert!(a < b);
        assert!(suite.trim_end().ends_with("});"));
    }

    #[test]
    fn test_member_has_no_import() {
        let member = ScriptRenderer::default().render_suite_member(&sample_case());
        assert!(!member.contains("import "));
        assert!(member.contains("test('User Registration Flow'"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let case = TestCaseDescription::new(
            "TC010",
            "Owner's dashboard",
            vec!["Enter 'admin' as user".to_string()],
        );
        let script = ScriptRenderer::default().render_test(&case);

        assert!(script.contains(r"test('Owner\'s dashboard'"));
        assert!(script.contains(r"console.log('Step: Enter \'admin\' as user');"));
    }

    #[test]
    fn test_configured_target_and_expected_text() {
        let renderer = ScriptRenderer::new(ScriptConfig {
            target_url: "http://localhost:3000/app".to_string(),
            expected_text: "Acme (beta)".to_string(),
            ..ScriptConfig::default()
        });
        let case = TestCaseDescription::new(
            "TC1",
            "t",
            vec!["Go to app".to_string(), "Check title".to_string()],
        );
        let script = renderer.render_test(&case);

        assert!(script.contains("page.goto('http://localhost:3000/app'"));
        assert!(script.contains(r"toHaveTitle(/Acme \(beta\)/)"));
    }

    #[test]
    fn test_file_name() {
        let case = sample_case();
        assert_eq!(script_file_name(&case), "TC001_User_Registration_Flow.spec.ts");
    }

    #[test]
    fn test_sanitized_titles_can_collide() {
        // Known limitation: sanitizing is lossy and collisions are not resolved.
        let a = TestCaseDescription::new("TC1", "A/B Test", vec![]);
        let b = TestCaseDescription::new("TC1", "A-B Test", vec![]);
        assert_eq!(sanitize_title("A/B Test"), "A_B_Test");
        assert_eq!(script_file_name(&a), script_file_name(&b));
    }
}
