use anyhow::Result;
use tracing::info;

use restyle::core::{OutputFormat, OutputWriter};

use super::{prepare, RunArgs};

/// Rewrite the target files in place.
///
/// Returns whether any file errored so `main` can pick the exit code.
pub fn run(args: &RunArgs, format: OutputFormat) -> Result<bool> {
    let (rewriter, files) = prepare(args)?;

    if files.is_empty() {
        info!("No files to process under {}", rewriter.root().display());
    }

    let report = rewriter.run(files.as_slice());
    OutputWriter::new(format).write_report(&report)?;

    Ok(report.has_errors())
}
