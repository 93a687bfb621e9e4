//! Render a single page to stdout.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use lectern_mdx::PageModule;
use lectern_provider::Scope;
use lectern_static::theme;

/// Run the render command.
pub async fn run(file: &Path, with_theme: bool) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let page = PageModule::compile(&source)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let scope = if with_theme {
        Scope::root().child(&theme::overrides())
    } else {
        Scope::root()
    };

    tracing::debug!(
        title = page.title().unwrap_or("untitled"),
        toc = page.toc.len(),
        "rendering page"
    );

    let html = page.render(&scope).to_html();

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", html).context("Failed to write to stdout")?;

    Ok(())
}
