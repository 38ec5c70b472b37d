pub mod apply;
pub mod preview;
pub mod rules;

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, warn};

use restyle::rewrite::{BatchRewriter, Targets, DEFAULT_EXCLUDES};
use restyle::rules::{lookup, missing_stylesheets, resolve};

/// Arguments shared by `apply` and `preview`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory the file names are relative to
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Preset(s) to apply, in order
    #[arg(short = 'P', long = "preset", default_value = "html")]
    pub presets: Vec<String>,

    /// Explicit files relative to the root (disables discovery)
    pub files: Vec<String>,

    /// Glob relative to the root used when no files are given
    /// (defaults to the first preset's glob)
    #[arg(short, long, conflicts_with = "files")]
    pub glob: Option<String>,

    /// Skip discovered files whose name contains this substring
    /// (defaults to TEMPLATE and FIXED)
    #[arg(short, long)]
    pub exclude: Vec<String>,
}

impl RunArgs {
    fn targets(&self) -> Result<Targets> {
        if !self.files.is_empty() {
            return Ok(Targets::List(self.files.clone()));
        }

        let pattern = match &self.glob {
            Some(pattern) => pattern.clone(),
            None => {
                let first = self.presets.first().map(String::as_str).unwrap_or("html");
                lookup(first)?.default_glob.to_string()
            }
        };
        let exclude = if self.exclude.is_empty() {
            DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
        } else {
            self.exclude.clone()
        };

        Ok(Targets::Glob { pattern, exclude })
    }
}

/// Compile the rules, validate the root and resolve the file list.
///
/// Everything here is configuration: any failure aborts before a file is read.
pub fn prepare(args: &RunArgs) -> Result<(BatchRewriter, Vec<String>)> {
    let rules = resolve(args.presets.as_slice())?;
    let rewriter = BatchRewriter::new(&args.root, rules)?;
    debug!(
        "Compiled {} rule(s) from {:?}: {}",
        rewriter.rules().len(),
        args.presets,
        rewriter
            .rules()
            .iter()
            .map(|r| r.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    for sheet in missing_stylesheets(rewriter.root(), args.presets.as_slice())? {
        warn!(
            "{} not found under {}; rewritten pages will link to a missing stylesheet",
            sheet,
            args.root.display()
        );
    }
    let files = args
        .targets()?
        .resolve(rewriter.root())
        .with_context(|| format!("Failed to discover files under {}", args.root.display()))?;

    Ok((rewriter, files))
}
