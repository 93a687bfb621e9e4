//! Admonition containers (`:::tip Title` ... `:::`).

use lectern_provider::{create_element, props_from, Node, Props};
use serde_json::json;

/// Kind of admonition, from the word after `:::`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmonitionKind {
    Note,
    Tip,
    Info,
    Caution,
    Danger,
}

impl AdmonitionKind {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "note" | "secondary" => Some(Self::Note),
            "tip" | "success" => Some(Self::Tip),
            "info" | "important" => Some(Self::Info),
            "caution" | "warning" => Some(Self::Caution),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Info => "info",
            Self::Caution => "caution",
            Self::Danger => "danger",
        }
    }

    /// Alert color variant used in the class list.
    fn variant(&self) -> &'static str {
        match self {
            Self::Note => "secondary",
            Self::Tip => "success",
            Self::Info => "info",
            Self::Caution => "warning",
            Self::Danger => "danger",
        }
    }

    fn icon(&self) -> (&'static str, &'static str) {
        match self {
            Self::Tip => ("12", TIP_ICON),
            _ => ("14", NOTE_ICON),
        }
    }
}

const TIP_ICON: &str = "M6.5 0C3.48 0 1 2.19 1 5c0 .92.55 2.25 1 3 1.34 2.25 1.78 2.78 2 4v1h5v-1c.22-1.22.66-1.75 2-4 .45-.75 1-2.08 1-3 0-2.81-2.48-5-5.5-5zm3.64 7.48c-.25.44-.47.8-.67 1.11-.86 1.41-1.25 2.06-1.45 3.23-.02.05-.02.11-.02.17H5c0-.06 0-.13-.02-.17-.2-1.17-.59-1.83-1.45-3.23-.2-.31-.42-.67-.67-1.11C2.44 6.78 2 5.65 2 5c0-2.2 2.02-4 4.5-4 1.22 0 2.36.42 3.22 1.19C10.55 2.94 11 3.94 11 5c0 .66-.44 1.78-.86 2.48zM4 14h5c-.23 1.14-1.3 2-2.5 2s-2.27-.86-2.5-2z";
const NOTE_ICON: &str = "M7 2.3c3.14 0 5.7 2.56 5.7 5.7s-2.56 5.7-5.7 5.7A5.71 5.71 0 0 1 1.3 8c0-3.14 2.56-5.7 5.7-5.7zM7 1C3.14 1 0 4.14 0 8s3.14 7 7 7 7-3.14 7-7-3.14-7-7-7zm1 3H6v5h2V4zm0 6H6v2h2v-2z";

/// An opening `:::kind` line.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmonitionOpen {
    pub kind: AdmonitionKind,
    pub title: Option<String>,
}

/// Parse an opening line: `:::tip`, `:::tip Title`, or `:::tip[Title]`.
pub fn parse_open(line: &str) -> Option<AdmonitionOpen> {
    let rest = line.trim().strip_prefix(":::")?;
    let name_end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let kind = AdmonitionKind::from_name(&rest[..name_end])?;
    let after = rest[name_end..].trim();

    let title = after
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(after)
        .trim();

    Some(AdmonitionOpen {
        kind,
        title: (!title.is_empty()).then(|| title.to_string()),
    })
}

/// Find the `:::` line closing a container whose body starts at `body_start`.
///
/// Returns `(body_end, after_close)` byte offsets. Nested containers and code
/// fences inside the body are skipped.
pub fn find_close(source: &str, body_start: usize) -> Option<(usize, usize)> {
    let mut depth = 1;
    let mut fence: Option<&str> = None;
    let mut pos = body_start;

    while pos < source.len() {
        let line_end = source[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(source.len());
        let line = source[pos..line_end].trim();

        if let Some(marker) = fence {
            if line.starts_with(marker) {
                fence = None;
            }
        } else if line.starts_with("```") {
            fence = Some("```");
        } else if line.starts_with("~~~") {
            fence = Some("~~~");
        } else if line == ":::" {
            depth -= 1;
            if depth == 0 {
                return Some((pos, line_end));
            }
        } else if parse_open(line).is_some() {
            depth += 1;
        }

        pos = line_end;
    }

    None
}

/// Build the admonition element tree around already-parsed content.
///
/// ```text
/// div.admonition.admonition-{kind}.alert.alert--{variant}
///   div.admonition-heading > h5 > span.admonition-icon > svg, title
///   div.admonition-content > children
/// ```
pub fn to_node(open: &AdmonitionOpen, children: Vec<Node>) -> Node {
    let kind = open.kind;
    let (width, icon) = kind.icon();
    let title = open.title.clone().unwrap_or_else(|| kind.as_str().to_string());

    let svg = create_element(
        "svg",
        props_from(json!({
            "xmlns": "http://www.w3.org/2000/svg",
            "width": width,
            "height": "16",
            "viewBox": format!("0 0 {} 16", width),
        })),
        vec![create_element(
            "path",
            props_from(json!({ "fillRule": "evenodd", "d": icon })),
            vec![],
        )],
    );

    let heading = create_element(
        "div",
        class("admonition-heading"),
        vec![create_element(
            "h5",
            Props::new(),
            vec![
                create_element("span", class("admonition-icon"), vec![svg]),
                Node::Text(title),
            ],
        )],
    );

    let content = create_element("div", class("admonition-content"), children);

    create_element(
        "div",
        class(&format!(
            "admonition admonition-{} alert alert--{}",
            kind.as_str(),
            kind.variant()
        )),
        vec![heading, content],
    )
}

fn class(name: &str) -> Props {
    props_from(json!({ "className": name }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_provider::{Renderer, Scope};

    #[test]
    fn parses_open_lines() {
        assert_eq!(
            parse_open(":::tip Open ShapeKt in Github"),
            Some(AdmonitionOpen {
                kind: AdmonitionKind::Tip,
                title: Some("Open ShapeKt in Github".to_string()),
            })
        );
        assert_eq!(
            parse_open(":::warning[Careful]").map(|o| (o.kind, o.title)),
            Some((AdmonitionKind::Caution, Some("Careful".to_string())))
        );
        assert_eq!(parse_open(":::note").and_then(|o| o.title), None);
        assert_eq!(parse_open(":::"), None);
        assert_eq!(parse_open(":::unknown"), None);
        assert_eq!(parse_open("text :::tip"), None);
    }

    #[test]
    fn finds_matching_close() {
        let source = ":::tip\nouter\n:::note\ninner\n:::\n```\n:::\n```\n:::\nafter";
        let body_start = source.find('\n').unwrap() + 1;

        let (body_end, after) = find_close(source, body_start).unwrap();

        assert_eq!(
            &source[body_start..body_end],
            "outer\n:::note\ninner\n:::\n```\n:::\n```\n"
        );
        assert_eq!(&source[after..], "after");
    }

    #[test]
    fn unclosed_returns_none() {
        assert_eq!(find_close(":::tip\nbody\n", 7), None);
    }

    #[test]
    fn renders_heading_and_content() {
        let open = parse_open(":::tip Open ShapeKt in Github").unwrap();
        let node = to_node(&open, vec![Node::element("p", vec!["body".into()])]);

        let html = Renderer::new(Scope::root()).render(&node).to_html();

        assert!(html.starts_with(
            r#"<div class="admonition admonition-tip alert alert--success"><div class="admonition-heading"><h5><span class="admonition-icon"><svg"#
        ));
        assert!(html.contains(r#"<path fill-rule="evenodd" d="M6.5 0C3.48"#));
        assert!(html.contains(
            r#"</svg></span>Open ShapeKt in Github</h5></div><div class="admonition-content"><p>body</p></div></div>"#
        ));
    }
}
