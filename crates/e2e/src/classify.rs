//! Keyword classifier turning free-text steps into canonical actions
//!
//! Matching is a lowercase substring test against an ordered rule table. The
//! first rule that matches decides the action, so a step such as
//! "verify and click" resolves to whichever keyword group comes first.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical action a step resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Navigate,
    VerifyTitle,
    VerifyContent,
    VerifyVisible,
    Click,
    MeasurePerformance,
    PressKey,
    LogOnly,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Navigate => "navigate",
            Action::VerifyTitle => "verify-title",
            Action::VerifyContent => "verify-content",
            Action::VerifyVisible => "verify-visible",
            Action::Click => "click",
            Action::MeasurePerformance => "measure-performance",
            Action::PressKey => "press-key",
            Action::LogOnly => "log-only",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the rule table.
///
/// Matches when the step contains at least one of `any_of` and every entry of `all_of`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub any_of: &'static [&'static str],
    pub all_of: &'static [&'static str],
    pub action: Action,
}

impl KeywordRule {
    pub fn matches(&self, lowered: &str) -> bool {
        self.any_of.iter().any(|k| lowered.contains(k))
            && self.all_of.iter().all(|k| lowered.contains(k))
    }
}

const VERIFY: &[&str] = &["verify", "check"];
const PROBE: &[&str] = &["test", "check"];

/// Rules in priority order; the fallback is [`Action::LogOnly`].
pub const RULES: &[KeywordRule] = &[
    KeywordRule { any_of: &["navigate", "go to", "visit"], all_of: &[], action: Action::Navigate },
    KeywordRule { any_of: VERIFY, all_of: &["title"], action: Action::VerifyTitle },
    KeywordRule { any_of: VERIFY, all_of: &["content"], action: Action::VerifyContent },
    KeywordRule { any_of: VERIFY, all_of: &["load"], action: Action::VerifyVisible },
    KeywordRule { any_of: VERIFY, all_of: &[], action: Action::VerifyVisible },
    KeywordRule { any_of: &["click"], all_of: &[], action: Action::Click },
    KeywordRule { any_of: &["measure", "performance"], all_of: &[], action: Action::MeasurePerformance },
    KeywordRule { any_of: PROBE, all_of: &["responsive"], action: Action::VerifyVisible },
    KeywordRule { any_of: PROBE, all_of: &["keyboard"], action: Action::PressKey },
    KeywordRule { any_of: PROBE, all_of: &[], action: Action::LogOnly },
    KeywordRule { any_of: &["check for", "locate"], all_of: &[], action: Action::VerifyVisible },
];

/// A step together with the action it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedStep {
    pub text: String,
    pub action: Action,
}

/// Classify one step. Total: every input yields an action.
pub fn classify(step: &str) -> Action {
    let lowered = step.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.action)
        .unwrap_or(Action::LogOnly)
}

/// Classify every step of a case, keeping order
pub fn classify_steps<S: AsRef<str>>(steps: &[S]) -> Vec<ClassifiedStep> {
    steps
        .iter()
        .map(|s| ClassifiedStep {
            text: s.as_ref().to_string(),
            action: classify(s.as_ref()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Navigate to the signup page" ; "navigate")]
    #[test_case("NAVIGATE TO HOME" ; "upper case")]
    #[test_case("Go To the dashboard" ; "go to mixed case")]
    #[test_case("visit pricing and verify title" ; "visit wins over verify")]
    #[test_case("Click the link, then navigate back" ; "navigate wins over click")]
    fn test_navigation_keywords(step: &str) {
        assert_eq!(classify(step), Action::Navigate);
    }

    #[test_case("Verify page title contains Example", Action::VerifyTitle)]
    #[test_case("Check the main content", Action::VerifyContent)]
    #[test_case("Verify the page loads", Action::VerifyVisible)]
    #[test_case("Verify email verification process", Action::VerifyVisible)]
    #[test_case("verify and click submit", Action::VerifyVisible ; "verify before click")]
    #[test_case("Click on 'Create Account' button", Action::Click)]
    #[test_case("Measure time to interactive", Action::MeasurePerformance)]
    #[test_case("Performance budget holds", Action::MeasurePerformance)]
    #[test_case("Test responsive layout", Action::VerifyVisible)]
    #[test_case("Test keyboard shortcuts", Action::PressKey)]
    #[test_case("Test the upload flow", Action::LogOnly)]
    #[test_case("Locate the footer", Action::VerifyVisible)]
    fn test_rule_order(step: &str, expected: Action) {
        assert_eq!(classify(step), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("Enter valid email address" ; "no keyword")]
    #[test_case("ünïcødé ßtep → ✓" ; "unicode")]
    fn test_fallback_is_log_only(step: &str) {
        assert_eq!(classify(step), Action::LogOnly);
    }

    #[test]
    fn test_check_for_is_shadowed_by_verify_group() {
        // "check" already matches the verify group, so the locate rule only
        // ever fires for "locate".
        assert_eq!(classify("Check for broken images"), Action::VerifyVisible);
        let locate = RULES.iter().position(|r| r.any_of.contains(&"locate")).unwrap();
        let verify = RULES.iter().position(|r| r.any_of == VERIFY).unwrap();
        assert!(verify < locate);
    }

    #[test]
    fn test_navigate_rule_is_first() {
        assert_eq!(RULES[0].action, Action::Navigate);
    }

    #[test]
    fn test_classify_steps_keeps_order() {
        let steps = ["Visit home", "Enter name", "Click save"];
        let classified = classify_steps(&steps);
        let actions: Vec<Action> = classified.iter().map(|s| s.action).collect();
        assert_eq!(actions, vec![Action::Navigate, Action::LogOnly, Action::Click]);
        assert_eq!(classified[1].text, "Enter name");
    }

    #[test]
    fn test_action_tokens() {
        assert_eq!(Action::MeasurePerformance.to_string(), "measure-performance");
        assert_eq!(
            serde_json::to_string(&Action::VerifyTitle).unwrap(),
            "\"verify-title\""
        );
    }
}
