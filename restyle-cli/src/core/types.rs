use serde::Serialize;
use std::path::PathBuf;

/// Terminal state of one target file after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Updated,
    Unchanged,
    Missing,
    Errored,
}

impl FileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Updated => "updated",
            FileStatus::Unchanged => "unchanged",
            FileStatus::Missing => "missing",
            FileStatus::Errored => "errored",
        }
    }
}

/// Outcome for a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// Path relative to the run root, as given in the file list
    pub path: PathBuf,

    pub status: FileStatus,

    /// Total replacements made across all rules
    pub replacements: usize,

    /// Rules that changed the text, in application order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules_applied: Vec<String>,

    /// Error cause for errored files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub updated: usize,
    pub unchanged: usize,
    pub missing: usize,
    pub errored: usize,

    /// Total replacements made across all updated files
    pub replacements_made: usize,

    /// Per-file outcomes in processing order
    pub files: Vec<FileOutcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_updated(&mut self, path: PathBuf, replacements: usize, rules_applied: Vec<String>) {
        self.updated += 1;
        self.replacements_made += replacements;
        self.files.push(FileOutcome {
            path,
            status: FileStatus::Updated,
            replacements,
            rules_applied,
            message: None,
        });
    }

    pub fn add_unchanged(&mut self, path: PathBuf) {
        self.unchanged += 1;
        self.push_bare(path, FileStatus::Unchanged, None);
    }

    pub fn add_missing(&mut self, path: PathBuf) {
        self.missing += 1;
        self.push_bare(path, FileStatus::Missing, None);
    }

    pub fn add_error(&mut self, path: PathBuf, message: String) {
        self.errored += 1;
        self.push_bare(path, FileStatus::Errored, Some(message));
    }

    fn push_bare(&mut self, path: PathBuf, status: FileStatus, message: Option<String>) {
        self.files.push(FileOutcome {
            path,
            status,
            replacements: 0,
            rules_applied: Vec::new(),
            message,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Errored)
    }
}
