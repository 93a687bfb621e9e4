//! Static site builder.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use lectern_mdx::PageModule;
use lectern_provider::{Node, Overrides, Scope};
use rayon::prelude::*;
use serde_json::Value;
use walkdir::WalkDir;

use crate::assets::AssetPipeline;
use crate::metadata::{self, Metadata};
use crate::templates::{Context, NavItem, TemplateEngine};
use crate::theme;

/// Words of page text kept per search index entry.
const SEARCH_WORDS: usize = 120;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source docs directory
    pub docs_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// URL segment the docs are served under (`docs` -> `/docs/...`)
    pub route_base_path: String,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Minify CSS output
    pub minify: bool,

    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            output_dir: PathBuf::from("dist"),
            route_base_path: "docs".to_string(),
            base_url: "/".to_string(),
            title: "Documentation".to_string(),
            minify: true,
            styles: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of draft pages skipped
    pub drafts: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read docs directory: {0}")]
    ReadError(String),

    #[error("Failed to parse MDX: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Pages {first} and {second} share the permalink {permalink}")]
    DuplicatePermalink {
        permalink: String,
        first: String,
        second: String,
    },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A page to be built.
#[derive(Debug)]
struct PageInfo {
    /// Relative path from docs dir
    relative_path: PathBuf,

    /// Output path
    output_path: PathBuf,

    module: PageModule,

    metadata: Metadata,
}

/// Static site builder.
///
/// Pages render under the site scope: the theme overrides, then anything
/// registered with [`StaticBuilder::with_components`], then each page's own.
pub struct StaticBuilder {
    config: BuildConfig,
    scope: Scope,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder with the default theme.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            scope: Scope::root().child(&theme::overrides()),
            templates: TemplateEngine::new(),
        }
    }

    /// Register site-wide component overrides on top of the theme.
    pub fn with_components(mut self, components: Overrides) -> Self {
        self.scope = self.scope.child(&components);
        self
    }

    /// The scope every page renders under.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        // Ensure output directory exists
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let (pages, drafts) = self.discover_pages()?;

        let nav = self.build_navigation(&pages);

        // Render pages in parallel
        pages
            .par_iter()
            .map(|page| self.build_page(page, &nav))
            .collect::<Result<Vec<()>, BuildError>>()?;

        self.generate_assets()?;
        self.generate_metadata(&pages)?;
        self.generate_search_index(&pages)?;
        self.generate_sitemap(&pages)?;

        Ok(BuildResult {
            pages: pages.len(),
            drafts,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover, parse and order all pages; drafts are counted and skipped.
    fn discover_pages(&self) -> Result<(Vec<PageInfo>, usize), BuildError> {
        let docs_dir = &self.config.docs_dir;
        if !docs_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Docs directory not found: {}",
                docs_dir.display()
            )));
        }

        let mut pages = Vec::new();
        let mut drafts = 0;

        for entry in WalkDir::new(docs_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "mdx" && ext != "md" {
                continue;
            }

            let content = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let module = PageModule::compile(&content).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let relative_path = path.strip_prefix(docs_dir).unwrap_or(path).to_path_buf();

            if module.is_draft() {
                tracing::debug!(path = %relative_path.display(), "skipping draft");
                drafts += 1;
                continue;
            }

            let metadata = Metadata::new(&relative_path, &module, &self.config);
            let output_path = self.output_path(&metadata.slug);

            pages.push(PageInfo {
                relative_path,
                output_path,
                module,
                metadata,
            });
        }

        pages.sort_by(|a, b| {
            sidebar_order(a.metadata.sidebar_position, b.metadata.sidebar_position)
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });

        check_permalinks(&pages)?;

        let mut records: Vec<Metadata> = pages.iter().map(|p| p.metadata.clone()).collect();
        metadata::link_siblings(&mut records);
        for (page, record) in pages.iter_mut().zip(records) {
            page.metadata = record;
        }

        Ok((pages, drafts))
    }

    /// `{output_dir}/{route_base_path}/{slug}/index.html`
    fn output_path(&self, slug: &str) -> PathBuf {
        let route = metadata::permalink("", &self.config.route_base_path, slug);
        self.config
            .output_dir
            .join(route.trim_start_matches('/'))
            .join("index.html")
    }

    /// Sidebar: root pages first, then one group per source directory, in page order.
    fn build_navigation(&self, pages: &[PageInfo]) -> Vec<NavItem> {
        let mut nav: Vec<NavItem> = Vec::new();
        let mut groups: Vec<(String, NavItem)> = Vec::new();

        for page in pages {
            let link = page.metadata.nav_link();
            let item = NavItem {
                title: link.title,
                path: link.permalink,
                children: Vec::new(),
                active: false,
            };

            let dir = &page.metadata.source_dir_name;
            if dir == "." {
                nav.push(item);
                continue;
            }

            match groups.iter_mut().find(|(name, _)| name == dir) {
                Some((_, group)) => group.children.push(item),
                None => {
                    let label = dir.rsplit('/').next().unwrap_or(dir);
                    groups.push((
                        dir.clone(),
                        NavItem {
                            title: capitalize(label),
                            path: item.path.clone(),
                            children: vec![item],
                            active: false,
                        },
                    ));
                }
            }
        }

        nav.extend(groups.into_iter().map(|(_, group)| group));
        nav
    }

    /// Render a single page and write it out.
    fn build_page(&self, page: &PageInfo, nav: &[NavItem]) -> Result<(), BuildError> {
        let meta = &page.metadata;
        let content = page.module.render(&self.scope).to_html();

        let hide_toc = page
            .module
            .front_matter
            .extra
            .get("hide_table_of_contents")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let context = Context {
            title: meta.title.clone(),
            description: meta.description.clone(),
            site_title: self.config.title.clone(),
            content,
            nav: mark_active(nav, &meta.permalink),
            toc: if hide_toc {
                Vec::new()
            } else {
                page.module.toc.clone()
            },
            base_url: self.config.base_url.clone(),
            permalink: meta.permalink.clone(),
            styles: self.style_urls(),
            previous: meta.previous.clone(),
            next: meta.next.clone(),
        };

        let html = self
            .templates
            .render_page("doc.html", &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        if let Some(parent) = page.output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        fs::write(&page.output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::debug!(permalink = %meta.permalink, "rendered page");
        Ok(())
    }

    fn style_urls(&self) -> Vec<String> {
        self.config
            .styles
            .iter()
            .map(|s| {
                let filename = Path::new(s)
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or("style.css");
                format!("{}assets/{}", self.config.base_url, filename)
            })
            .collect()
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Keeping unminified CSS: {}", e);
                css
            })
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(assets_dir.join("main.js"), AssetPipeline::generate_js())
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Copy configured stylesheets
        for style_path in &self.config.styles {
            let source_path = PathBuf::from(style_path);
            if !source_path.exists() {
                tracing::warn!("Stylesheet not found: {}", style_path);
                continue;
            }

            let filename = source_path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("style.css");
            let content = fs::read_to_string(&source_path)
                .map_err(|e| BuildError::ReadError(format!("Failed to read stylesheet: {}", e)))?;
            fs::write(assets_dir.join(filename), content)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;
            tracing::info!("Copied stylesheet from {}", style_path);
        }

        Ok(())
    }

    /// Write every page's metadata record, in sidebar order.
    fn generate_metadata(&self, pages: &[PageInfo]) -> Result<(), BuildError> {
        let records: Vec<&Metadata> = pages.iter().map(|p| &p.metadata).collect();

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("metadata.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate search index.
    fn generate_search_index(&self, pages: &[PageInfo]) -> Result<(), BuildError> {
        let index: Vec<Value> = pages
            .iter()
            .map(|page| {
                serde_json::json!({
                    "id": page.metadata.id,
                    "title": page.metadata.title,
                    "description": page.metadata.description,
                    "url": page.metadata.permalink,
                    "content": page_text(&page.module.nodes),
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, pages: &[PageInfo]) -> Result<(), BuildError> {
        let urls: Vec<String> = pages
            .iter()
            .map(|page| format!("  <url>\n    <loc>{}</loc>\n  </url>", page.metadata.permalink))
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}sitemap.xml",
            self.config.base_url
        );
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Positioned pages first, ascending; the rest keep their relative order.
fn sidebar_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn mark_active(nav: &[NavItem], permalink: &str) -> Vec<NavItem> {
    nav.iter()
        .map(|item| NavItem {
            title: item.title.clone(),
            path: item.path.clone(),
            children: mark_active(&item.children, permalink),
            active: item.path == permalink && item.children.is_empty(),
        })
        .collect()
}

/// Plain text of a page for the search index.
fn page_text(nodes: &[Node]) -> String {
    let text = nodes
        .iter()
        .map(Node::text_content)
        .collect::<Vec<_>>()
        .join(" ");

    text.split_whitespace()
        .take(SEARCH_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize first letter of a string.
/// Every page must own its permalink; two pages would write the same `index.html`.
fn check_permalinks(pages: &[PageInfo]) -> Result<(), BuildError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, page) in pages.iter().enumerate() {
        if let Some(&first) = seen.get(page.metadata.permalink.as_str()) {
            return Err(BuildError::DuplicatePermalink {
                permalink: page.metadata.permalink.clone(),
                first: pages[first].relative_path.display().to_string(),
                second: page.relative_path.display().to_string(),
            });
        }
        seen.insert(&page.metadata.permalink, index);
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_provider::{from_fn, RenderNode};
    use tempfile::tempdir;

    const JIT: &str = "---\ntitle: Just In Time Optimization\nsidebar_position: 1\n---\n\nDiffKt can trace and optimize.\n";

    const SHAPEKT: &str = r#"---
id: shapekt
title: ShapeKt
slug: /framework/shapekt
sidebar_position: 2
---

ShapeKt is an extensible Kotlin compiler plugin for ahead-of-time tensor shape verification.

## Usage

:::tip Open ShapeKt in Github
[ShapeKt](https://github.com/facebookresearch/shapekt)
:::
"#;

    const INTRO: &str = "---\ntitle: Introduction to Basic API Operations for DiffKt\nsidebar_position: 3\n---\n\nBasics.\n";

    fn write_docs(docs: &Path) {
        fs::create_dir_all(docs.join("framework/shapekt")).unwrap();
        fs::create_dir_all(docs.join("tutorials/api")).unwrap();
        fs::write(docs.join("framework/jit.md"), JIT).unwrap();
        fs::write(docs.join("framework/shapekt/shapekt.md"), SHAPEKT).unwrap();
        fs::write(docs.join("tutorials/api/intro_to_diff_prog.md"), INTRO).unwrap();
        fs::write(docs.join("wip.md"), "---\ntitle: WIP\ndraft: true\n---\nSoon").unwrap();
        fs::write(docs.join("notes.txt"), "ignored").unwrap();
    }

    fn config(root: &Path) -> BuildConfig {
        BuildConfig {
            docs_dir: root.join("docs"),
            output_dir: root.join("dist"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn builds_site_in_sidebar_order() {
        let temp = tempdir().unwrap();
        write_docs(&temp.path().join("docs"));
        let out = temp.path().join("dist");

        let result = StaticBuilder::new(config(temp.path())).build().await.unwrap();

        assert_eq!(result.pages, 3);
        assert_eq!(result.drafts, 1);
        assert!(out.join("docs/framework/jit/index.html").exists());
        assert!(out.join("docs/tutorials/api/intro_to_diff_prog/index.html").exists());
        assert!(!out.join("docs/wip/index.html").exists());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("assets/main.js").exists());

        let html = fs::read_to_string(out.join("docs/framework/shapekt/index.html")).unwrap();
        assert!(html.contains("<title>ShapeKt | Documentation</title>"));
        assert!(html.contains("<div class=\"markdown\"><p>ShapeKt is an extensible"));
        assert!(html.contains("class=\"admonition admonition-tip alert alert--success\""));
        assert!(html.contains("target=\"_blank\" rel=\"noopener noreferrer\">ShapeKt</a>"));
        assert!(html.contains("<a href=\"#usage\">Usage</a>"));
        assert!(html.contains("Just In Time Optimization"));
        assert!(html.contains("Introduction to Basic API Operations for DiffKt"));
    }

    #[tokio::test]
    async fn writes_metadata_records() {
        let temp = tempdir().unwrap();
        write_docs(&temp.path().join("docs"));
        let out = temp.path().join("dist");

        StaticBuilder::new(config(temp.path())).build().await.unwrap();

        let records: Value =
            serde_json::from_str(&fs::read_to_string(out.join("metadata.json")).unwrap()).unwrap();
        let shapekt = &records[1];

        assert_eq!(shapekt["id"], "framework/shapekt/shapekt");
        assert_eq!(shapekt["permalink"], "/docs/framework/shapekt");
        assert_eq!(shapekt["source"], "@site/docs/framework/shapekt/shapekt.md");
        assert_eq!(shapekt["previous"]["permalink"], "/docs/framework/jit");
        assert_eq!(
            shapekt["next"]["permalink"],
            "/docs/tutorials/api/intro_to_diff_prog"
        );
    }

    #[tokio::test]
    async fn user_components_extend_theme() {
        let temp = tempdir().unwrap();
        write_docs(&temp.path().join("docs"));
        let out = temp.path().join("dist");

        let lead = from_fn("Lead", |props, children| {
            let mut props = props.clone();
            props.insert("className".to_string(), serde_json::json!("lead"));
            RenderNode::element("p", props, children)
        });

        StaticBuilder::new(config(temp.path()))
            .with_components(Overrides::none().bind("p", lead))
            .build()
            .await
            .unwrap();

        let html = fs::read_to_string(out.join("docs/framework/jit/index.html")).unwrap();
        assert!(html.contains("<div class=\"markdown\"><p class=\"lead\">DiffKt can trace"));
    }

    #[tokio::test]
    async fn generates_search_index_and_sitemap() {
        let temp = tempdir().unwrap();
        write_docs(&temp.path().join("docs"));
        let out = temp.path().join("dist");

        StaticBuilder::new(config(temp.path())).build().await.unwrap();

        let index = fs::read_to_string(out.join("search-index.json")).unwrap();
        assert!(index.contains("ahead-of-time tensor shape verification"));
        assert!(!index.contains("WIP"));

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>/docs/framework/shapekt</loc>"));
        assert!(out.join("robots.txt").exists());
    }

    #[tokio::test]
    async fn missing_docs_dir_is_an_error() {
        let temp = tempdir().unwrap();

        let err = StaticBuilder::new(config(temp.path())).build().await.unwrap_err();

        assert!(matches!(err, BuildError::ReadError(_)));
    }

    #[tokio::test]
    async fn parse_errors_name_the_file() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("broken.md"), ":::note\nnever closed").unwrap();

        let err = StaticBuilder::new(config(temp.path())).build().await.unwrap_err();

        match err {
            BuildError::ParseError { path, .. } => assert!(path.ends_with("broken.md")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn duplicate_permalinks_are_rejected() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("a.md"), "---\nslug: /same\nsidebar_position: 1\n---\n\nA.\n").unwrap();
        fs::write(docs.join("b.md"), "---\nsidebar_position: 2\n---\n\nB.\n").unwrap();
        fs::write(docs.join("c.md"), "---\nslug: /same\nsidebar_position: 3\n---\n\nC.\n").unwrap();

        let err = StaticBuilder::new(config(temp.path())).build().await.unwrap_err();

        match err {
            BuildError::DuplicatePermalink {
                permalink,
                first,
                second,
            } => {
                assert_eq!(permalink, "/docs/same");
                assert_eq!(first, "a.md");
                assert_eq!(second, "c.md");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!temp.path().join("dist/docs/same/index.html").exists());
    }

    #[test]
    fn orders_positioned_pages_first() {
        assert_eq!(sidebar_order(Some(1.0), Some(2.0)), Ordering::Less);
        assert_eq!(sidebar_order(None, Some(5.0)), Ordering::Greater);
        assert_eq!(sidebar_order(None, None), Ordering::Equal);
    }
}
