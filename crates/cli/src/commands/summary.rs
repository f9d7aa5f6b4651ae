//! Summary Commands

use anyhow::Result;

use qagenie_e2e::report::latest_summary;
use qagenie_e2e::HarnessConfig;

use crate::output::{print_info, print_summary, print_warning, OutputFormat};

/// Show the most recent run summary without running anything
pub fn execute(config: HarnessConfig, format: OutputFormat) -> Result<()> {
    match latest_summary(&config.report_dir)? {
        Some((path, summary)) => {
            if format != OutputFormat::Json {
                print_info(&format!("Latest report: {} ({})", path.display(), summary.timestamp));
            }
            print_summary(&summary, format);
        }
        None => print_warning(&format!(
            "No test reports found in {}",
            config.report_dir.display()
        )),
    }

    Ok(())
}
