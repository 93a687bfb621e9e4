//! `docs.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lectern_static::BuildConfig;
use serde::Deserialize;

/// Configuration file structure (docs.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_docs_dir")]
    pub dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_route_base_path")]
    pub route_base_path: String,
    /// Paths to CSS stylesheets to include
    #[serde(default)]
    pub styles: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
            output: default_output(),
            title: default_title(),
            base_url: default_base_url(),
            route_base_path: default_route_base_path(),
            styles: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_docs_dir() -> String {
    "docs".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_title() -> String {
    "Documentation".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_route_base_path() -> String {
    "docs".to_string()
}
fn default_minify() -> bool {
    true
}

/// Command line values that take precedence over the file.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub base_url: Option<String>,
    pub minify: Option<bool>,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

impl ConfigFile {
    /// Builder configuration, with command line values applied on top.
    pub fn into_build_config(self, overrides: CliOverrides) -> BuildConfig {
        let mut base_url = overrides.base_url.unwrap_or(self.docs.base_url);
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        BuildConfig {
            docs_dir: PathBuf::from(self.docs.dir),
            output_dir: overrides
                .output
                .unwrap_or_else(|| PathBuf::from(self.docs.output)),
            route_base_path: self.docs.route_base_path,
            base_url,
            title: self.docs.title,
            minify: overrides.minify.unwrap_or(self.build.minify),
            styles: self.docs.styles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load(&temp.path().join("docs.toml")).unwrap();
        let build = config.into_build_config(CliOverrides::default());

        assert_eq!(build.docs_dir, PathBuf::from("docs"));
        assert_eq!(build.output_dir, PathBuf::from("dist"));
        assert_eq!(build.route_base_path, "docs");
        assert_eq!(build.base_url, "/");
        assert!(build.minify);
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(&path, "[docs]\ntitle = \"DiffKt\"\nstyles = [\"theme.css\"]\n").unwrap();

        let build = load(&path)
            .unwrap()
            .into_build_config(CliOverrides::default());

        assert_eq!(build.title, "DiffKt");
        assert_eq!(build.docs_dir, PathBuf::from("docs"));
        assert_eq!(build.styles, vec!["theme.css".to_string()]);
        assert!(build.minify);
    }

    #[test]
    fn cli_values_win() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(
            &path,
            "[docs]\noutput = \"site\"\nbase_url = \"/diffkt/\"\n\n[build]\nminify = true\n",
        )
        .unwrap();

        let build = load(&path).unwrap().into_build_config(CliOverrides {
            output: Some(PathBuf::from("public")),
            base_url: Some("/preview".to_string()),
            minify: Some(false),
        });

        assert_eq!(build.output_dir, PathBuf::from("public"));
        assert_eq!(build.base_url, "/preview/");
        assert!(!build.minify);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(&path, "[docs\ntitle = ").unwrap();

        let err = load(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse"));
    }
}
