use std::path::Path;

use glob::Pattern;
use tracing::{debug, warn};

use crate::core::error::{RestyleError, Result};

/// Filename substrings skipped during glob discovery unless overridden
pub const DEFAULT_EXCLUDES: &[&str] = &["TEMPLATE", "FIXED"];

/// Which files a run should visit
#[derive(Debug, Clone)]
pub enum Targets {
    /// Names relative to the root, visited in the given order
    List(Vec<String>),

    /// Glob relative to the root; files whose name contains any `exclude`
    /// substring are dropped
    Glob { pattern: String, exclude: Vec<String> },
}

impl Targets {
    pub fn glob(pattern: impl Into<String>) -> Self {
        Targets::Glob {
            pattern: pattern.into(),
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Resolve to an ordered list of names relative to `root`.
    pub fn resolve(&self, root: &Path) -> Result<Vec<String>> {
        match self {
            Targets::List(names) => Ok(names.clone()),
            Targets::Glob { pattern, exclude } => discover(root, pattern, exclude),
        }
    }
}

fn discover(root: &Path, pattern: &str, exclude: &[String]) -> Result<Vec<String>> {
    // Validate the user part on its own so errors point at it, not the root.
    Pattern::new(pattern).map_err(|e| RestyleError::InvalidGlob(format!("{}: {}", pattern, e)))?;

    let full = format!(
        "{}/{}",
        Pattern::escape(&root.to_string_lossy()),
        pattern.trim_start_matches("./")
    );
    let entries =
        glob::glob(&full).map_err(|e| RestyleError::InvalidGlob(format!("{}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping unreadable path during discovery: {}", e);
                continue;
            }
        };

        if !path.is_file() || is_excluded(&path, exclude) {
            continue;
        }

        let relative = pathdiff::diff_paths(&path, root).unwrap_or(path);
        files.push(relative.to_string_lossy().into_owned());
    }

    files.sort();
    debug!("Discovered {} file(s) matching {}", files.len(), pattern);
    Ok(files)
}

fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    exclude.iter().any(|sub| !sub.is_empty() && name.contains(sub.as_str()))
}
