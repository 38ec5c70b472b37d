use anyhow::Result;

use restyle::core::{OutputFormat, OutputWriter};

use super::{prepare, RunArgs};

/// Show what `apply` would change without writing anything.
pub fn run(args: &RunArgs, format: OutputFormat) -> Result<bool> {
    let (rewriter, files) = prepare(args)?;

    let output = rewriter.preview(files.as_slice());
    OutputWriter::new(format).write_preview(&output.diffs, &output.report)?;

    Ok(output.report.has_errors())
}
