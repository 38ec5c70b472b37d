use serde::Serialize;
use similar::TextDiff;
use std::path::PathBuf;

/// Preview of the rewrite for a single file
#[derive(Debug, Clone, Serialize)]
pub struct PreviewDiff {
    /// File path relative to the run root
    pub file_path: PathBuf,

    /// Number of replacements the rules would make
    pub num_changes: usize,

    /// Rules that would change the file
    pub rules: Vec<String>,

    /// Unified line diff
    pub diff: String,
}

impl PreviewDiff {
    pub fn new(file_path: PathBuf, original: &str, rewritten: &str, num_changes: usize, rules: Vec<String>) -> Self {
        let path = file_path.display().to_string();
        let diff = TextDiff::from_lines(original, rewritten)
            .unified_diff()
            .context_radius(2)
            .header(&format!("a/{}", path), &format!("b/{}", path))
            .to_string();

        Self {
            file_path,
            num_changes,
            rules,
            diff,
        }
    }

    /// Generate a human-readable diff output
    pub fn format_diff(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("📝 {}\n", self.file_path.display()));
        output.push_str(&format!(
            "   {} change{} via {}\n\n",
            self.num_changes,
            if self.num_changes == 1 { "" } else { "s" },
            self.rules.join(", ")
        ));
        output.push_str(&self.diff);
        output
    }
}

/// Generate preview for all files
pub fn generate_preview(diffs: &[PreviewDiff]) -> String {
    let mut output = String::new();

    let total_files = diffs.len();
    let total_changes: usize = diffs.iter().map(|d| d.num_changes).sum();

    output.push_str("========================================\n");
    output.push_str("           PREVIEW CHANGES\n");
    output.push_str("========================================\n\n");
    output.push_str(&format!(
        "📊 {} file{}, {} change{}\n\n",
        total_files,
        if total_files == 1 { "" } else { "s" },
        total_changes,
        if total_changes == 1 { "" } else { "s" }
    ));

    for (i, diff) in diffs.iter().enumerate() {
        output.push_str(&diff.format_diff());
        if i < diffs.len() - 1 {
            output.push_str("\n----------------------------------------\n\n");
        }
    }

    output.push_str("\n========================================\n");
    output
}
