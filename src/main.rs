use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fodder_core::commands;
use fodder_core::CoreConfig;

#[derive(Parser)]
#[command(name = "fodder")]
#[command(about = "Convert résumé data between formats and export it to Word documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a blank résumé for hand-editing (format from the file extension)
    Init {
        /// Output file (.json, .xml, .yaml or .yml); defaults to resume.xml
        file: Option<PathBuf>,
    },
    /// Convert a résumé file to another format
    Convert {
        /// Input file
        input: PathBuf,
        /// Output file, in a different format from the input
        output: PathBuf,
    },
    /// Export a résumé to a Word 2003 XML document
    Export {
        /// Input résumé file
        input: PathBuf,
        /// Output document (.doc or .xml)
        output: PathBuf,
        /// Template file; looked up in the template directory if not found as given
        template: Option<PathBuf>,
    },
}

/// Entry point for the `fodder` command line.
///
/// # Environment Variables
/// - `FODDER_TEMPLATE_DIR`: fallback directory for templates (default: "templates")
/// - `RUST_LOG`: log filter, on top of the `fodder=info` default
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fodder=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CoreConfig::with_template_dir_override(std::env::var("FODDER_TEMPLATE_DIR").ok())
        .context("invalid configuration")?;
    tracing::debug!(
        template_dir = %config.template_dir().display(),
        "configuration resolved"
    );

    let cli = Cli::parse();
    match cli.command {
        Commands::Init { file } => {
            let path = file.unwrap_or_else(|| PathBuf::from(config.default_data_file()));
            commands::init_file(&path)
                .with_context(|| format!("could not initialise {}", path.display()))?;
        }
        Commands::Convert { input, output } => {
            commands::convert_file(&input, &output).with_context(|| {
                format!(
                    "could not convert {} to {}",
                    input.display(),
                    output.display()
                )
            })?;
        }
        Commands::Export {
            input,
            output,
            template,
        } => {
            commands::export_file(&config, &input, &output, template.as_deref()).with_context(
                || format!("could not export {} to {}", input.display(), output.display()),
            )?;
        }
    }

    Ok(())
}
