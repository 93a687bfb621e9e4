//! Code fence info string parsing.

/// A parsed code fence info string such as `kotlin title="Main.kt" {1,3}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeFence {
    /// Normalized language name
    pub language: Option<String>,

    /// Everything after the language, verbatim
    pub meta: Option<String>,

    /// Optional title from `title="..."` or `file=...`
    pub title: Option<String>,
}

impl CodeFence {
    /// Parse a fence info string.
    pub fn parse(info: &str) -> Self {
        let info = info.trim();
        let (lang, rest) = match info.split_once(char::is_whitespace) {
            Some((lang, rest)) => (lang, rest.trim()),
            None => (info, ""),
        };

        // `{1,3}` or `title=...` with no language in front
        let (lang, rest) = if lang.starts_with('{') || lang.contains('=') {
            ("", info)
        } else {
            (lang, rest)
        };

        Self {
            language: (!lang.is_empty()).then(|| normalize_language(lang)),
            meta: (!rest.is_empty()).then(|| rest.to_string()),
            title: extract_title(rest),
        }
    }

    /// CSS class for the `code` element, e.g. `language-kotlin`.
    pub fn class_name(&self) -> Option<String> {
        self.language.as_ref().map(|l| format!("language-{}", l))
    }
}

fn normalize_language(lang: &str) -> String {
    let lower = lang.to_lowercase();
    match lower.as_str() {
        "kt" | "kts" => "kotlin".to_string(),
        "js" => "javascript".to_string(),
        "ts" => "typescript".to_string(),
        "sh" | "shell" | "zsh" => "bash".to_string(),
        "yml" => "yaml".to_string(),
        _ => lower,
    }
}

/// Extract a title from a code fence meta string.
///
/// Supports formats like:
/// - `title="Main.kt"`
/// - `file=Main.kt`
pub fn extract_title(meta: &str) -> Option<String> {
    // Try title="..." format
    if let Some(start) = meta.find("title=\"") {
        let rest = &meta[start + 7..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }

    // Try file=... format (without quotes)
    if let Some(start) = meta.find("file=") {
        let rest = &meta[start + 5..];
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let filename = rest[..end].trim_matches('"');
        if !filename.is_empty() {
            return Some(filename.to_string());
        }
    }

    None
}
