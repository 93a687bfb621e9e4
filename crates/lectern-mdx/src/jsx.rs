//! Inline JSX parser for MDX component blocks.
//!
//! Parses snippets like `<Admonition type="tip">Read this</Admonition>` to
//! extract the component name, props, and the children source.

use std::sync::LazyLock;

use lectern_provider::Props;
use regex::Regex;
use serde_json::Value;

/// Parsed inline JSX element.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineJsx {
    /// Component name (e.g., "Tabs")
    pub component: String,

    /// Props in source order
    pub props: Props,

    /// Children source (MDX, parsed separately)
    pub children: Option<String>,

    /// Whether self-closing
    pub self_closing: bool,
}

/// Attribute list: `name`, `name="v"`, `name='v'` or `name={expr}`, whitespace separated.
const ATTRIBUTES: &str = r#"(?:\s+[^\s/>=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{[^}]*\}))?)*"#;

/// Parse inline JSX source code.
///
/// Returns the first top-level JSX element found.
pub fn parse_inline_jsx(source: &str) -> Option<InlineJsx> {
    parse_element(source.trim()).map(|(jsx, _)| jsx)
}

/// Parse the element at the start of `source`.
///
/// Returns the element and the number of bytes it spans.
pub fn parse_element(source: &str) -> Option<(InlineJsx, usize)> {
    // Try self-closing first: <Component prop="value" />
    if let Some(parsed) = parse_self_closing(source) {
        return Some(parsed);
    }

    // Try with children: <Component>children</Component>
    parse_with_children(source)
}

static SELF_CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^<([A-Z][\w.]*)({})\s*/>", ATTRIBUTES))
        .expect("Invalid self-closing regex")
});

/// Parse a self-closing JSX element.
fn parse_self_closing(source: &str) -> Option<(InlineJsx, usize)> {
    let caps = SELF_CLOSING_RE.captures(source)?;
    let component = caps.get(1)?.as_str().to_string();
    let props_str = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let len = caps.get(0)?.end();

    Some((
        InlineJsx {
            component,
            props: parse_props(props_str),
            children: None,
            self_closing: true,
        },
        len,
    ))
}

/// Find the matching closing tag position, handling nested same-name components.
fn find_matching_close_tag(source: &str, component: &str, start_pos: usize) -> Option<usize> {
    let open_pattern = format!("<{}", component);
    let close_tag = format!("</{}>", component);

    let remaining = &source[start_pos..];
    let mut depth = 1;
    let mut pos = 0;

    while depth > 0 && pos < remaining.len() {
        let next_open = remaining[pos..].find(&open_pattern);
        let next_close = remaining[pos..].find(&close_tag);

        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => {
                let tag_start = pos + o;
                let after_name = &remaining[tag_start + open_pattern.len()..];
                let self_closing = SELF_CLOSING_RE
                    .captures(&remaining[tag_start..])
                    .filter(|caps| caps.get(1).is_some_and(|m| m.as_str() == component));
                if let Some(caps) = self_closing {
                    pos = tag_start + caps.get(0).map_or(open_pattern.len(), |m| m.end());
                } else if after_name.starts_with('>')
                    || after_name.starts_with(char::is_whitespace)
                {
                    depth += 1;
                    pos = tag_start + open_pattern.len();
                } else {
                    // A longer name sharing the prefix, e.g. <TabsItem inside <Tabs
                    pos = tag_start + 1;
                }
            }
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    return Some(start_pos + pos + c);
                }
                pos += c + close_tag.len();
            }
            (_, None) => return None,
        }
    }

    None
}

/// Parse a JSX element with children.
fn parse_with_children(source: &str) -> Option<(InlineJsx, usize)> {
    static OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(r"^<([A-Z][\w.]*)({})\s*>", ATTRIBUTES))
            .expect("Invalid open tag regex")
    });

    let open_caps = OPEN_RE.captures(source)?;
    let component = open_caps.get(1)?.as_str().to_string();
    let props_str = open_caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let open_len = open_caps.get(0)?.len();

    let close_pos = find_matching_close_tag(source, &component, open_len)?;
    let end = close_pos + component.len() + 3;

    let children = source[open_len..close_pos].trim_matches(|c| c == ' ' || c == '\t');
    let children = children.trim_start_matches(['\r', '\n']);
    let children = if children.trim().is_empty() {
        None
    } else {
        Some(children.to_string())
    };

    Some((
        InlineJsx {
            component,
            props: parse_props(props_str),
            children,
            self_closing: false,
        },
        end,
    ))
}

/// Parse props from a props string.
fn parse_props(props_str: &str) -> Props {
    let mut props = Props::new();
    let props_str = props_str.trim();

    if props_str.is_empty() {
        return props;
    }

    // Match: name="value" or name='value' or name={expr} or name (boolean)
    static PROP_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"([a-zA-Z][a-zA-Z0-9_-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|\{([^}]*)\}))?"#)
            .expect("Invalid prop regex")
    });

    for caps in PROP_RE.captures_iter(props_str) {
        let Some(name) = caps.get(1) else { continue };

        let value = if let Some(m) = caps.get(2).or_else(|| caps.get(3)) {
            Value::String(m.as_str().to_string())
        } else if let Some(m) = caps.get(4) {
            expression_value(m.as_str())
        } else {
            // Boolean (just the prop name)
            Value::Bool(true)
        };

        props.insert(name.as_str().to_string(), value);
    }

    props
}

/// Literal expressions (`{3}`, `{false}`, `{["a", "b"]}`) become values;
/// anything else is kept as its source text.
fn expression_value(expr: &str) -> Value {
    let expr = expr.trim();
    serde_json::from_str(expr).unwrap_or_else(|_| Value::String(expr.to_string()))
}
