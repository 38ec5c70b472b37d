mod fsio;
mod preview;
mod targets;

pub use fsio::{read_text, write_atomic};
pub use preview::{generate_preview, PreviewDiff};
pub use targets::{Targets, DEFAULT_EXCLUDES};

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::error::{RestyleError, Result};
use crate::core::types::RunReport;
use crate::rules::{Rewrite, RuleSet};

/// Mode for performing replacements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementMode {
    /// Compute changes and diffs without touching disk
    Preview,
    /// Write changed files back
    Apply,
}

/// Everything a batch produced
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub report: RunReport,

    /// Diffs for files that changed (or would change); filled in preview mode
    pub diffs: Vec<PreviewDiff>,
}

/// Applies one rule set to a list of files under a root directory
pub struct BatchRewriter {
    root: PathBuf,

    /// Resolved root; every target must canonicalize to a path under it
    canonical_root: PathBuf,

    rules: RuleSet,
}

impl BatchRewriter {
    /// Create a rewriter. Fails if `root` is not an existing directory.
    pub fn new(root: impl Into<PathBuf>, rules: RuleSet) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RestyleError::RootNotFound(root));
        }
        if rules.is_empty() {
            return Err(RestyleError::EmptyRuleSet);
        }
        let canonical_root = root
            .canonicalize()
            .map_err(|_| RestyleError::RootNotFound(root.clone()))?;
        Ok(Self {
            root,
            canonical_root,
            rules,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Rewrite every file in `files`, in order.
    pub fn run<S: AsRef<str>>(&self, files: &[S]) -> RunReport {
        self.run_until(files, || false)
    }

    /// Like [`run`](Self::run), but checks `should_stop` before each file and
    /// stops early when it returns true. Files not yet visited are left out of
    /// the report.
    pub fn run_until<S, F>(&self, files: &[S], should_stop: F) -> RunReport
    where
        S: AsRef<str>,
        F: FnMut() -> bool,
    {
        self.execute(files, ReplacementMode::Apply, should_stop).report
    }

    /// Compute what a run would do without writing anything.
    pub fn preview<S: AsRef<str>>(&self, files: &[S]) -> BatchOutput {
        self.execute(files, ReplacementMode::Preview, || false)
    }

    fn execute<S, F>(&self, files: &[S], mode: ReplacementMode, mut should_stop: F) -> BatchOutput
    where
        S: AsRef<str>,
        F: FnMut() -> bool,
    {
        info!(
            "Rewriting {} file(s) under {} with {} rule(s) ({:?})",
            files.len(),
            self.root.display(),
            self.rules.len(),
            mode
        );

        let mut output = BatchOutput::default();
        let mut seen = HashSet::new();

        for name in files {
            if should_stop() {
                info!("Stop requested, {} file(s) processed", output.report.total());
                break;
            }

            let name = name.as_ref();

            if name.trim().is_empty() {
                debug!("Empty entry in file list");
                output.report.add_missing(PathBuf::from(name));
                continue;
            }
            let Some(relative) = clean_relative(name) else {
                let err = RestyleError::OutsideRoot {
                    path: PathBuf::from(name),
                };
                warn!("{}", err);
                output.report.add_error(PathBuf::from(name), err.to_string());
                continue;
            };
            if relative.as_os_str().is_empty() {
                debug!("{} names the root itself", name);
                output.report.add_missing(PathBuf::from(name));
                continue;
            }
            if !seen.insert(relative.clone()) {
                debug!("Skipping duplicate entry {}", name);
                continue;
            }

            let path = self.root.join(&relative);
            if !path.exists() {
                debug!("{} does not exist", path.display());
                output.report.add_missing(relative);
                continue;
            }

            match self.process_file(&relative, &path, mode) {
                Ok(None) => {
                    debug!("{} unchanged", name);
                    output.report.add_unchanged(relative);
                }
                Ok(Some((original, rewrite))) => {
                    debug!("{} updated ({} replacements)", name, rewrite.replacements);
                    if mode == ReplacementMode::Preview {
                        output.diffs.push(PreviewDiff::new(
                            relative.clone(),
                            &original,
                            &rewrite.text,
                            rewrite.replacements,
                            rewrite.rules_applied.clone(),
                        ));
                    }
                    output
                        .report
                        .add_updated(relative, rewrite.replacements, rewrite.rules_applied);
                }
                Err(e) => {
                    warn!("{}: {}", name, e);
                    output.report.add_error(relative, e.to_string());
                }
            }
        }

        info!(
            "Done: {} updated, {} unchanged, {} missing, {} errored",
            output.report.updated,
            output.report.unchanged,
            output.report.missing,
            output.report.errored
        );
        output
    }

    /// Read, transform, verify and (in apply mode) write one file.
    ///
    /// Returns `None` when the rules leave the text as is.
    fn process_file(
        &self,
        relative: &Path,
        path: &Path,
        mode: ReplacementMode,
    ) -> Result<Option<(String, Rewrite)>> {
        self.ensure_within_root(relative, path)?;

        let original = read_text(path)?;
        let rewrite = self.rules.apply(&original);

        if rewrite.text == original {
            return Ok(None);
        }

        let second = self.rules.apply(&rewrite.text);
        if !second.is_noop() {
            return Err(RestyleError::NotIdempotent {
                path: relative.to_path_buf(),
                rules: second.rules_applied,
            });
        }

        if mode == ReplacementMode::Apply {
            write_atomic(path, &rewrite.text)?;
        }

        Ok(Some((original, rewrite)))
    }

    /// Reject targets that escape the root through a symlink.
    fn ensure_within_root(&self, relative: &Path, path: &Path) -> Result<()> {
        let resolved = path.canonicalize().map_err(|source| RestyleError::Io {
            path: relative.to_path_buf(),
            source,
        })?;
        if !resolved.starts_with(&self.canonical_root) {
            return Err(RestyleError::OutsideRoot {
                path: relative.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Lexically clean a file-list entry.
///
/// `.` segments are dropped and `..` pops the previous segment. Returns `None`
/// for absolute entries and for `..` that would climb above the root, so
/// `a.html`, `./a.html` and `sub/../a.html` all map to `a.html`.
fn clean_relative(name: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !clean.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}
