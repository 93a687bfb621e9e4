//! Initialize documentation in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
///
/// Writes the config file and a starter `docs/` tree next to it. Existing
/// files are kept unless `yes` is set.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing lectern...");

    let root = config_path.parent().unwrap_or(Path::new(""));
    let docs_dir = root.join("docs");

    if docs_dir.exists() && !yes {
        tracing::warn!("{} already exists. Use --yes to overwrite.", docs_dir.display());
        return Ok(());
    }

    let files = [
        (config_path.to_path_buf(), DEFAULT_CONFIG),
        (docs_dir.join("intro.md"), DEFAULT_INTRO),
        (docs_dir.join("guides/components.mdx"), DEFAULT_COMPONENTS_GUIDE),
    ];

    for (path, content) in files {
        if path.exists() && !yes {
            tracing::debug!("Keeping existing {}", path.display());
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'lectern build' to generate the site.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# lectern configuration

[docs]
# Source directory for documentation
dir = "docs"

# Output directory for built site
output = "dist"

# Site title
title = "My Documentation"

# Base URL (for deployment)
base_url = "/"

# Pages are served under {base_url}{route_base_path}/{slug}
route_base_path = "docs"

[build]
# Minify CSS
minify = true
"#;

const DEFAULT_INTRO: &str = r#"---
id: intro
title: Introduction
sidebar_position: 1
---

Welcome to your documentation site, generated by **lectern**.

## Writing pages

Every `.md` or `.mdx` file under `docs/` becomes a page. Front matter sets the
title, slug and sidebar position:

```yaml title="docs/example.md"
---
title: Example
slug: /example
sidebar_position: 2
---
```

:::tip Next step
Read the [components guide](/docs/guides/components) to see admonitions and
component blocks in action.
:::
"#;

const DEFAULT_COMPONENTS_GUIDE: &str = r#"---
title: Components
sidebar_position: 2
---

Markdown elements render through components that the theme or your site can
override: `p`, `a`, `h2`, `pre`, `inlineCode` and the rest.

## Admonitions

:::note
Notes, tips, info, caution and danger boxes are written with `:::`.
:::

## Component blocks

<Callout kind="info">

A capitalized JSX element is a component request. With no component
registered under that name it renders as a plain element.

</Callout>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn scaffolds_config_and_docs() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("docs.toml");

        run(&config, false).await.unwrap();

        assert!(config.exists());
        assert!(temp.path().join("docs/intro.md").exists());
        assert!(temp.path().join("docs/guides/components.mdx").exists());
    }

    #[tokio::test]
    async fn keeps_existing_docs_without_yes() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("docs.toml");
        fs::create_dir_all(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs/intro.md"), "mine").unwrap();

        run(&config, false).await.unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("docs/intro.md")).unwrap(), "mine");
        assert!(!config.exists());

        run(&config, true).await.unwrap();
        assert!(fs::read_to_string(temp.path().join("docs/intro.md"))
            .unwrap()
            .contains("lectern"));
    }

    #[test]
    fn starter_pages_parse() {
        for source in [DEFAULT_INTRO, DEFAULT_COMPONENTS_GUIDE] {
            lectern_mdx::PageModule::compile(source).unwrap();
        }
    }
}
