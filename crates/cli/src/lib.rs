//! QAgenie CLI
//!
//! Command-line interface for generating Playwright scripts from test case
//! descriptions and running them with aggregated reports.

pub mod commands;
pub mod output;
