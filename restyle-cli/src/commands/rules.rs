use anyhow::Result;

use restyle::core::{OutputFormat, OutputWriter};
use restyle::rules::{lookup, PRESETS};

/// List the built-in presets, or the rules of one preset.
pub fn run(preset: Option<String>, format: OutputFormat) -> Result<()> {
    let writer = OutputWriter::new(format);

    match preset {
        Some(name) => writer.write_preset_rules(lookup(&name)?),
        None => writer.write_presets(PRESETS),
    }
}
