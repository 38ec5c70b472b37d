use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::core::types::{FileStatus, RunReport};
use crate::rewrite::{generate_preview, PreviewDiff};
use crate::rules::{PatternKind, Preset};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render_report(&self, report: &RunReport) -> Result<String> {
        let mut out = String::new();
        match self.format {
            OutputFormat::Json => {
                out.push_str(&serde_json::to_string_pretty(report)?);
            }
            OutputFormat::Text => {
                for file in &report.files {
                    let icon = match file.status {
                        FileStatus::Updated => "✓",
                        FileStatus::Unchanged => "ℹ",
                        FileStatus::Missing => "✗",
                        FileStatus::Errored => "⚠️ ",
                    };
                    write!(out, "{} {:<9} {}", icon, file.status.label(), file.path.display())?;
                    match file.status {
                        FileStatus::Updated => {
                            write!(out, " ({} replacements)", file.replacements)?;
                        }
                        FileStatus::Errored => {
                            if let Some(message) = &file.message {
                                write!(out, " - {}", message)?;
                            }
                        }
                        _ => {}
                    }
                    out.push('\n');
                }
                out.push_str("========================================\n");
                writeln!(
                    out,
                    "Updated {} of {} file(s), {} replacement(s)",
                    report.updated,
                    report.total(),
                    report.replacements_made
                )?;
                if report.missing > 0 {
                    writeln!(out, "  Missing: {}", report.missing)?;
                }
                if report.has_errors() {
                    writeln!(out, "\nErrors:")?;
                    for file in report.errors() {
                        writeln!(
                            out,
                            "  ⚠️  {}: {}",
                            file.path.display(),
                            file.message.as_deref().unwrap_or("unknown error")
                        )?;
                    }
                }
            }
            OutputFormat::Markdown => {
                out.push_str("# Rewrite Report\n\n");
                out.push_str("| File | Status | Replacements | Note |\n");
                out.push_str("|------|--------|--------------|------|\n");
                for file in &report.files {
                    writeln!(
                        out,
                        "| `{}` | {} | {} | {} |",
                        file.path.display(),
                        file.status.label(),
                        file.replacements,
                        file.message.as_deref().unwrap_or("")
                    )?;
                }
                writeln!(
                    out,
                    "\n**Updated:** {} / {}",
                    report.updated,
                    report.total()
                )?;
            }
        }
        Ok(out)
    }

    pub fn write_report(&self, report: &RunReport) -> Result<()> {
        println!("{}", self.render_report(report)?.trim_end());
        Ok(())
    }

    /// Text or markdown body of a preview: the diffs, then entries that were
    /// not found.
    pub fn render_preview(&self, diffs: &[PreviewDiff], report: &RunReport) -> Result<String> {
        let mut out = String::new();
        if diffs.is_empty() {
            out.push_str("No changes.\n");
        } else {
            writeln!(out, "{}", generate_preview(diffs))?;
            out.push_str("\n💡 Run `apply` with the same arguments to write these changes\n");
        }

        let missing: Vec<_> = report
            .files
            .iter()
            .filter(|f| f.status == FileStatus::Missing)
            .collect();
        if !missing.is_empty() {
            writeln!(out, "\nMissing ({}):", missing.len())?;
            for file in missing {
                writeln!(out, "  ✗ {}", file.path.display())?;
            }
        }
        Ok(out)
    }

    pub fn write_preview(&self, diffs: &[PreviewDiff], report: &RunReport) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                #[derive(Serialize)]
                struct PreviewResponse<'a> {
                    diffs: &'a [PreviewDiff],
                    report: &'a RunReport,
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&PreviewResponse { diffs, report })?
                );
            }
            OutputFormat::Text | OutputFormat::Markdown => {
                println!("{}", self.render_preview(diffs, report)?.trim_end());
                for file in report.errors() {
                    eprintln!(
                        "⚠️  {}: {}",
                        file.path.display(),
                        file.message.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }
        Ok(())
    }

    pub fn write_presets(&self, presets: &[Preset]) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(presets)?);
            }
            OutputFormat::Text => {
                for preset in presets {
                    println!(
                        "{:<18} {:>3} rules  {}",
                        preset.name,
                        preset.specs().len(),
                        preset.description
                    );
                }
            }
            OutputFormat::Markdown => {
                println!("# Presets\n");
                for preset in presets {
                    println!(
                        "- **{}** ({} rules, default `{}`): {}",
                        preset.name,
                        preset.specs().len(),
                        preset.default_glob,
                        preset.description
                    );
                }
            }
        }
        Ok(())
    }

    pub fn write_preset_rules(&self, preset: &Preset) -> Result<()> {
        let specs = preset.specs();
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&specs)?);
            }
            OutputFormat::Text => {
                println!("{} ({})", preset.name, preset.description);
                for (i, spec) in specs.iter().enumerate() {
                    let kind = match spec.kind {
                        PatternKind::Literal => "lit",
                        PatternKind::Regex => "re",
                    };
                    println!("{:>3}. [{}] {}", i + 1, kind, spec.name);
                    println!("     - {}", spec.pattern);
                    println!("     + {}", spec.replacement.replace('\n', "\\n"));
                }
            }
            OutputFormat::Markdown => {
                println!("# {}\n", preset.name);
                println!("| # | Rule | Kind | Pattern |");
                println!("|---|------|------|---------|");
                for (i, spec) in specs.iter().enumerate() {
                    println!(
                        "| {} | {} | {:?} | `{}` |",
                        i + 1,
                        spec.name,
                        spec.kind,
                        spec.pattern.replace('|', "\\|")
                    );
                }
            }
        }
        Ok(())
    }

    pub fn write_error(&self, error: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                #[derive(Serialize)]
                struct ErrorResponse {
                    error: String,
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&ErrorResponse {
                        error: error.to_string()
                    })?
                );
            }
            OutputFormat::Text | OutputFormat::Markdown => {
                eprintln!("Error: {}", error);
            }
        }
        Ok(())
    }
}
