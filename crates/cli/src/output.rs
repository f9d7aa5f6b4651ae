//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

use qagenie_e2e::{RunSummary, TestResult, TestStatus};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;

    /// Optional per-row color for the first column
    fn color(&self) -> Option<Color> {
        None
    }
}

impl TableDisplay for TestResult {
    fn headers() -> Vec<&'static str> {
        vec!["Status", "Test", "Duration", "Error"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.status.to_string(),
            self.name.clone(),
            format!("{}ms", self.duration),
            self.error.clone().unwrap_or_default(),
        ]
    }

    fn color(&self) -> Option<Color> {
        match self.status {
            TestStatus::Passed => Some(Color::Green),
            TestStatus::Failed => Some(Color::Red),
            TestStatus::Skipped => Some(Color::Yellow),
            TestStatus::Unknown => None,
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if items.is_empty() && format != OutputFormat::Json {
        println!("No items found.");
        return;
    }

    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(T::headers());
            for item in items {
                let mut cells: Vec<Cell> = item.row().into_iter().map(Cell::new).collect();
                if let (Some(color), Some(first)) = (item.color(), cells.first_mut()) {
                    *first = first.clone().fg(color);
                }
                table.add_row(cells);
            }

            println!("{table}");
        }
        OutputFormat::Json => print_json(items),
        OutputFormat::Plain => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                let row = item.row();
                for (header, value) in T::headers().iter().zip(row.iter()) {
                    println!("{}: {}", header, value);
                }
            }
        }
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Print a run summary: per-test listing followed by the totals
pub fn print_summary(summary: &RunSummary, format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(summary);
        return;
    }

    print_list(&summary.tests, format);
    println!();

    let totals = format!(
        "{}/{} passed, {} failed, {} skipped in {}ms ({:.1}%)",
        summary.passed,
        summary.total,
        summary.failed,
        summary.skipped,
        summary.duration,
        summary.success_rate()
    );
    if summary.failed > 0 || summary.runner_error.is_some() {
        print_error(&totals);
    } else {
        print_success(&totals);
    }
    if let Some(error) = &summary.runner_error {
        print_warning(error);
    }
}

/// Spinner shown while a blocking step runs; hidden for machine-readable output
pub fn spinner(message: &str, format: OutputFormat) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "i".blue().bold(), message);
}
