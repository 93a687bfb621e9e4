//! Per-page metadata records.

use std::path::Path;

use lectern_mdx::{Frontmatter, PageModule};
use serde::Serialize;

use crate::builder::BuildConfig;

/// Link to a neighbouring page in sidebar order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub permalink: String,
}

/// Everything the site knows about one page, serialized alongside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub unversioned_id: String,
    /// `{source_dir_name}/{front matter id or file stem}`
    pub id: String,
    pub title: String,
    pub description: String,
    /// `@site/{docs dir}/{relative path}`
    pub source: String,
    /// Directory of the source file relative to the docs dir, `.` at the root
    pub source_dir_name: String,
    pub slug: String,
    pub permalink: String,
    pub draft: bool,
    pub tags: Vec<String>,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_position: Option<f64>,
    pub front_matter: Frontmatter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<NavLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NavLink>,
}

impl Metadata {
    /// Metadata for the page at `relative_path` inside the docs directory.
    ///
    /// Previous/next links are left empty; see [`link_siblings`].
    pub fn new(relative_path: &Path, page: &PageModule, config: &BuildConfig) -> Self {
        let front_matter = &page.front_matter;
        let source_dir_name = source_dir_name(relative_path);
        let stem = relative_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index");

        let local_id = front_matter
            .id
            .clone()
            .unwrap_or_else(|| stem.to_string());
        let id = if source_dir_name == "." {
            local_id.clone()
        } else {
            format!("{}/{}", source_dir_name, local_id)
        };

        let slug = doc_slug(&source_dir_name, stem, front_matter.slug.as_deref());
        let docs_dir_name = config
            .docs_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("docs");

        Self {
            unversioned_id: id.clone(),
            id,
            title: page.title().map(str::to_string).unwrap_or(local_id),
            description: page.description().unwrap_or_default().to_string(),
            source: format!("@site/{}/{}", docs_dir_name, url_path(relative_path)),
            permalink: permalink(&config.base_url, &config.route_base_path, &slug),
            source_dir_name,
            slug,
            draft: front_matter.draft,
            tags: front_matter.tags.clone(),
            version: "current".to_string(),
            sidebar_position: front_matter.sidebar_position,
            front_matter: front_matter.clone(),
            previous: None,
            next: None,
        }
    }

    /// Sidebar link to this page, labelled with `sidebar_label` when set.
    pub fn nav_link(&self) -> NavLink {
        NavLink {
            title: self
                .front_matter
                .sidebar_label
                .clone()
                .unwrap_or_else(|| self.title.clone()),
            permalink: self.permalink.clone(),
        }
    }
}

/// Fill previous/next links from the order of `docs`.
pub fn link_siblings(docs: &mut [Metadata]) {
    let links: Vec<NavLink> = docs.iter().map(Metadata::nav_link).collect();

    for (i, doc) in docs.iter_mut().enumerate() {
        doc.previous = i.checked_sub(1).map(|prev| links[prev].clone());
        doc.next = links.get(i + 1).cloned();
    }
}

/// Page slug: an absolute front matter slug as-is, a relative one under the
/// source directory, else the file path (`index` collapses to its directory).
pub fn doc_slug(source_dir_name: &str, stem: &str, front_matter_slug: Option<&str>) -> String {
    let dir = if source_dir_name == "." {
        ""
    } else {
        source_dir_name
    };

    let slug = match front_matter_slug {
        Some(slug) if slug.starts_with('/') => slug.to_string(),
        Some(slug) => format!("/{}/{}", dir, slug),
        None if stem.eq_ignore_ascii_case("index") || stem.eq_ignore_ascii_case("readme") => {
            format!("/{}", dir)
        }
        None => format!("/{}/{}", dir, stem),
    };

    normalize_url(&slug)
}

/// Join base URL, route base path and slug into a site-absolute URL.
pub fn permalink(base_url: &str, route_base_path: &str, slug: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    for part in [route_base_path, slug] {
        let part = part.trim_matches('/');
        if !part.is_empty() {
            url.push('/');
            url.push_str(part);
        }
    }

    if url.is_empty() {
        url.push('/');
    }
    url
}

fn normalize_url(url: &str) -> String {
    let parts: Vec<&str> = url.split('/').filter(|p| !p.is_empty()).collect();
    format!("/{}", parts.join("/"))
}

fn source_dir_name(relative_path: &Path) -> String {
    match relative_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => url_path(parent),
        _ => ".".to_string(),
    }
}

fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
