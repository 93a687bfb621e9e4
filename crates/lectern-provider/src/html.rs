//! HTML render tree.
//!
//! Primitive elements keep their properties bag untouched; the mapping to HTML
//! attribute names happens only when the tree is serialised.

use std::borrow::Cow;

use serde_json::Value;

use crate::node::Props;

/// Output of rendering one element request.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Element(HtmlElement),
    Text(String),
    /// Pre-rendered HTML, written without escaping.
    Raw(String),
    /// Children with no wrapping element.
    Fragment(Vec<RenderNode>),
}

/// A platform primitive: an HTML or SVG element.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlElement {
    pub tag: String,
    pub props: Props,
    pub children: Vec<RenderNode>,
}

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// SVG elements written as `<path/>` when they have no children.
const SVG_SELF_CLOSING: &[&str] = &[
    "circle", "ellipse", "line", "path", "polygon", "polyline", "rect", "stop", "use",
];

/// Camel-cased SVG presentation attributes written in kebab case.
const SVG_KEBAB_ATTRIBUTES: &[&str] = &[
    "clipPath",
    "clipRule",
    "fillOpacity",
    "fillRule",
    "fontFamily",
    "fontSize",
    "stopColor",
    "strokeDasharray",
    "strokeLinecap",
    "strokeLinejoin",
    "strokeOpacity",
    "strokeWidth",
    "textAnchor",
];

/// Properties consumed by the tree itself and never written as attributes.
const RESERVED_PROPS: &[&str] = &["key", "ref", "children"];

impl RenderNode {
    /// Primitive element with the given props and children.
    pub fn element(tag: impl Into<String>, props: Props, children: Vec<RenderNode>) -> Self {
        Self::Element(HtmlElement {
            tag: tag.into(),
            props,
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Serialise to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Append the HTML for this node to `out`.
    pub fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&escape_html(text)),
            Self::Raw(html) => out.push_str(html),
            Self::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            Self::Element(element) => element.write_html(out),
        }
    }
}

impl HtmlElement {
    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        write_attributes(&self.props, out);

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            out.push('>');
            return;
        }

        if self.children.is_empty() && SVG_SELF_CLOSING.contains(&self.tag.as_str()) {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn write_attributes(props: &Props, out: &mut String) {
    for (key, value) in props {
        if RESERVED_PROPS.contains(&key.as_str()) {
            continue;
        }

        let name = attribute_name(key);
        let rendered = match value {
            Value::Null | Value::Bool(false) => continue,
            Value::Bool(true) => {
                out.push(' ');
                out.push_str(&name);
                continue;
            }
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Array(items) => Cow::Owned(
                items
                    .iter()
                    .filter_map(scalar_to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Value::Object(map) if key == "style" => Cow::Owned(inline_style(map)),
            Value::Object(_) => {
                tracing::debug!(attribute = %key, "skipping object-valued attribute");
                continue;
            }
        };

        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        out.push_str(&escape_html(&rendered));
        out.push('"');
    }
}

fn attribute_name(key: &str) -> Cow<'_, str> {
    match key {
        "className" => Cow::Borrowed("class"),
        "htmlFor" => Cow::Borrowed("for"),
        _ if SVG_KEBAB_ATTRIBUTES.contains(&key) => Cow::Owned(kebab_case(key)),
        _ => Cow::Borrowed(key),
    }
}

fn inline_style(map: &Props) -> String {
    map.iter()
        .filter_map(|(k, v)| scalar_to_string(v).map(|v| format!("{}:{};", kebab_case(k), v)))
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::props_from;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn writes_nested_elements() {
        let node = RenderNode::element(
            "p",
            props_from(json!({ "className": "lead" })),
            vec![
                RenderNode::text("a < b "),
                RenderNode::element("em", Props::new(), vec![RenderNode::text("now")]),
            ],
        );

        assert_eq!(node.to_html(), r#"<p class="lead">a &lt; b <em>now</em></p>"#);
    }

    #[test]
    fn void_and_svg_elements() {
        let svg = RenderNode::element(
            "svg",
            props_from(json!({ "viewBox": "0 0 12 16", "width": 12 })),
            vec![RenderNode::element(
                "path",
                props_from(json!({ "fillRule": "evenodd", "d": "M6.5 0" })),
                vec![],
            )],
        );
        let br = RenderNode::element("br", Props::new(), vec![]);

        assert_eq!(
            svg.to_html(),
            r#"<svg viewBox="0 0 12 16" width="12"><path fill-rule="evenodd" d="M6.5 0"/></svg>"#
        );
        assert_eq!(br.to_html(), "<br>");
    }

    #[test]
    fn boolean_null_and_reserved_props() {
        let node = RenderNode::element(
            "input",
            props_from(json!({
                "type": "checkbox",
                "checked": true,
                "disabled": false,
                "title": null,
                "key": "item-1",
            })),
            vec![],
        );

        assert_eq!(node.to_html(), r#"<input type="checkbox" checked>"#);
    }

    #[test]
    fn style_objects_and_class_arrays() {
        let node = RenderNode::element(
            "div",
            props_from(json!({
                "className": ["admonition", "alert"],
                "style": { "marginTop": "1em", "zIndex": 2 },
            })),
            vec![],
        );

        assert_eq!(
            node.to_html(),
            r#"<div class="admonition alert" style="margin-top:1em;z-index:2;"></div>"#
        );
    }

    #[test]
    fn raw_and_fragment_pass_through() {
        let node = RenderNode::Fragment(vec![
            RenderNode::Raw("<hr>".to_string()),
            RenderNode::text("\"quoted\""),
        ]);

        assert_eq!(node.to_html(), "<hr>&quot;quoted&quot;");
    }

    #[test]
    fn escape_borrows_clean_text() {
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));
        assert_eq!(escape_html("a&b"), "a&amp;b");
    }
}
