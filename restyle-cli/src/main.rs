use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use restyle::core::{OutputFormat, OutputWriter};
use restyle::RestyleError;

mod commands;

use commands::RunArgs;

#[derive(Parser)]
#[command(name = "restyle")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Rewrite utility-class markup into semantic class names",
    long_about = "Applies an ordered list of literal and regex substitution rules to static \
                  HTML/TSX sources, writing back only files whose content changed."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, markdown)
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite files in place
    Apply {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Show the diff each file would get, without writing
    Preview {
        #[command(flatten)]
        args: RunArgs,
    },

    /// List presets, or the rules of one preset
    Rules {
        /// Preset to show
        #[arg(short = 'P', long)]
        preset: Option<String>,
    },
}

/// Exit code for a run where at least one file errored
const EXIT_FILE_ERRORS: i32 = 1;
/// Exit code for a configuration error (nothing was touched)
const EXIT_CONFIG: i32 = 2;
/// Exit code for any other failure, such as a broken stdout
const EXIT_INTERNAL: i32 = 3;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "restyle=debug"
    } else {
        "restyle=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Apply { args } => commands::apply::run(args, cli.format),
        Commands::Preview { args } => commands::preview::run(args, cli.format),
        Commands::Rules { preset } => commands::rules::run(preset.clone(), cli.format).map(|_| false),
    };

    match result {
        Ok(false) => Ok(()),
        Ok(true) => std::process::exit(EXIT_FILE_ERRORS),
        Err(e) => {
            let is_config = e
                .chain()
                .filter_map(|cause| cause.downcast_ref::<RestyleError>())
                .any(RestyleError::is_config);
            // Best effort: reporting may itself be what failed.
            let _ = OutputWriter::new(cli.format).write_error(&format!("{:#}", e));
            std::process::exit(if is_config { EXIT_CONFIG } else { EXIT_INTERNAL });
        }
    }
}
