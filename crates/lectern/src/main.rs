//! lectern CLI - MDX documentation site generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "MDX documentation site generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to docs.toml config file
    #[arg(short, long, default_value = "docs.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize documentation in current project
    Init {
        /// Overwrite existing files without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Build static documentation site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base URL the site is deployed under
        #[arg(long)]
        base_url: Option<String>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Render a single MDX file to HTML on stdout
    Render {
        /// MDX or Markdown file
        file: PathBuf,

        /// Render with plain HTML elements only, without theme components
        #[arg(long)]
        no_theme: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build {
            output,
            base_url,
            no_minify,
        } => {
            let overrides = config::CliOverrides {
                output,
                base_url,
                minify: if no_minify { Some(false) } else { None },
            };
            commands::build::run(&cli.config, overrides).await?;
        }
        Commands::Render { file, no_theme } => {
            commands::render::run(&file, !no_theme).await?;
        }
    }

    Ok(())
}
