//! Static site build command.

use std::path::Path;

use anyhow::{Context, Result};
use lectern_static::StaticBuilder;

use crate::config::{self, CliOverrides};

/// Run the build command.
pub async fn run(config_path: &Path, overrides: CliOverrides) -> Result<()> {
    tracing::info!("Building static site...");

    let config = config::load(config_path)?.into_build_config(overrides);
    let docs_dir = config.docs_dir.clone();

    let result = StaticBuilder::new(config)
        .build()
        .await
        .with_context(|| format!("Failed to build {}", docs_dir.display()))?;

    if result.drafts > 0 {
        tracing::info!("Skipped {} draft pages", result.drafts);
    }
    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
