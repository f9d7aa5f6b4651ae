//! QAgenie test harness
//!
//! A thin layer around Playwright with two pipelines:
//! - generation: natural-language test cases (JSON) are classified step by
//!   step and rendered into Playwright spec files plus one combined suite
//! - execution: Playwright runs as a subprocess with the JSON reporter, its
//!   output is aggregated into a [`RunSummary`], and JSON/HTML/Markdown
//!   reports are written
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐    ┌──────────────────────────────┐
//! │ TestGenerator                │    │ TestRunner                   │
//! │   TestCaseBatch::load_latest │    │   PlaywrightCommand::invoke  │
//! │   classify()  (rule table)   │    │   parse_output()             │
//! │   ScriptRenderer             │    │   RunSummary::from_results   │
//! │     render_test / suite      │    │   write_reports()            │
//! └──────────────┬───────────────┘    └──────────────┬───────────────┘
//!                ▼                                   ▼
//!           test/*.spec.ts                 report/test-report-<ts>.*
//! ```

pub mod case;
pub mod classify;
pub mod config;
pub mod error;
pub mod generator;
pub mod playwright;
pub mod report;
pub mod results;
pub mod runner;
pub mod script;

pub use case::{TestCaseBatch, TestCaseDescription};
pub use classify::{classify, Action, ClassifiedStep};
pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use generator::{GenerationOutcome, TestGenerator};
pub use playwright::{PlaywrightCommand, RunOptions};
pub use results::{RunSummary, TestResult, TestStatus};
pub use runner::{RunOutcome, TestRunner};
pub use script::ScriptRenderer;
