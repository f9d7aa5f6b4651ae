//! QAgenie CLI - Main Entry Point
//!
//! Runs the Playwright suite and writes reports. Without a subcommand the
//! top-level `--pattern` / `--options` flags select what to run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use qagenie_cli::commands::{cases, generate, run, summary};
use qagenie_cli::output::{self, print_success};
use qagenie_e2e::config::DEFAULT_CONFIG_FILE;
use qagenie_e2e::HarnessConfig;

/// QAgenie - Playwright test generation and reporting
#[derive(Parser)]
#[command(name = "qagenie")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Harness configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    run: run::RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Playwright scripts from the newest test case batch
    Generate,

    /// Run the Playwright suite and write reports
    Run(run::RunArgs),

    /// Show the most recent run summary
    Summary,

    /// Render the newest test case batch as a Markdown catalog
    Cases(cases::CasesArgs),

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse arguments. Help, version and unrecognized invocations print their
/// text and yield `None`, which the caller treats as a successful exit.
fn parse_or_usage<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Some(cli),
        Err(e) => {
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                }
                _ => {
                    eprintln!("{}", e.render());
                    let _ = Cli::command().print_help();
                }
            }
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    let Some(cli) = parse_or_usage(std::env::args_os()) else {
        return Ok(());
    };

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None => run::execute(cli.run, load_config(&cli.config)?, cli.format)?,
        Some(Commands::Run(args)) => run::execute(args, load_config(&cli.config)?, cli.format)?,
        Some(Commands::Generate) => generate::execute(load_config(&cli.config)?, cli.format)?,
        Some(Commands::Summary) => summary::execute(load_config(&cli.config)?, cli.format)?,
        Some(Commands::Cases(args)) => {
            cases::execute(args, load_config(&cli.config)?, cli.format)?
        }
        Some(Commands::Init { force }) => init_config(&cli.config, force)?,
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<HarnessConfig> {
    let config = HarnessConfig::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    tracing::debug!("Configuration: {:?}", config);
    Ok(config)
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    HarnessConfig::default().save(path)?;
    print_success(&format!("Wrote {}", path.display()));
    Ok(())
}
