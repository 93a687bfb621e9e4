//! Frontmatter extraction and parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parsed frontmatter from an MDX file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Frontmatter {
    /// Document id; defaults to the file stem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Page title; falls back to the leading heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Page description for SEO; falls back to the first paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Custom slug, absolute (`/framework/shapekt`) or relative to the source directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Label shown in the sidebar instead of the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_label: Option<String>,

    /// Order in the sidebar (lower = first)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_position: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Drafts are parsed but not published
    #[serde(default, skip_serializing_if = "is_false")]
    pub draft: bool,

    /// Any other keys, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Extract frontmatter from MDX content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}
