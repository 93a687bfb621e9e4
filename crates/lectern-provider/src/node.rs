//! Element requests: the content tree handed to the renderer.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::component::{Component, ComponentRef};
use crate::scope::Overrides;

/// Properties bag forwarded to components.
///
/// Keys keep insertion order.
pub type Props = serde_json::Map<String, Value>;

/// What an element request asks to render.
///
/// Also used as the value side of an override binding, so a name can be
/// re-bound to another tag, a component, or a fragment.
#[derive(Clone)]
pub enum Target {
    /// A name resolved against the current scope, e.g. `"p"` or `"Admonition"`.
    Tag(String),
    /// A concrete component, invoked without any lookup.
    Component(ComponentRef),
    /// No wrapping element; children are rendered in place.
    Fragment,
}

impl Target {
    /// Bind a component value.
    pub fn component<C: Component + 'static>(component: C) -> Self {
        Self::Component(Arc::new(component))
    }

    /// Tag name if this target is resolved by name.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::Tag(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(name) => write!(f, "Tag({:?})", name),
            Self::Component(c) => write!(f, "Component({})", c.name()),
            Self::Fragment => f.write_str("Fragment"),
        }
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Tag(a), Self::Tag(b)) => a == b,
            (Self::Component(a), Self::Component(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (Self::Fragment, Self::Fragment) => true,
            _ => false,
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::Tag(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self::Tag(name)
    }
}

impl From<ComponentRef> for Target {
    fn from(component: ComponentRef) -> Self {
        Self::Component(component)
    }
}

/// A node of the content tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// Text, escaped on output.
    Text(String),
    /// Pre-rendered HTML, emitted as-is.
    Raw(String),
    /// An element request.
    Element(Element),
    /// Overrides registered for a subtree.
    Provider(Provider),
}

impl Node {
    /// Text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Element request with no properties.
    pub fn element(target: impl Into<Target>, children: Vec<Node>) -> Self {
        Self::Element(Element {
            target: target.into(),
            props: Props::new(),
            children,
        })
    }

    /// Subtree rendered under additional overrides.
    pub fn provider(overrides: Overrides, children: Vec<Node>) -> Self {
        Self::Provider(Provider {
            overrides,
            children,
        })
    }

    /// Concatenated text content of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Raw(_) => {}
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Self::Provider(provider) => {
                for child in &provider.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// One element request: target, properties, children.
#[derive(Debug, Clone)]
pub struct Element {
    pub target: Target,
    pub props: Props,
    pub children: Vec<Node>,
}

impl Element {
    /// Add a property, replacing any previous value for the key.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// A subtree with its own override registration.
#[derive(Debug, Clone)]
pub struct Provider {
    pub overrides: Overrides,
    pub children: Vec<Node>,
}

/// Build an element request.
///
/// A `children` entry in `props` is moved out and becomes the leading
/// children; `trailing` is appended after it in order.
pub fn create_element(target: impl Into<Target>, mut props: Props, trailing: Vec<Node>) -> Node {
    let mut children = props
        .remove("children")
        .map(children_from_value)
        .unwrap_or_default();
    children.extend(trailing);

    Node::Element(Element {
        target: target.into(),
        props,
        children,
    })
}

/// Convert a JSON object into a properties bag. Anything else yields an empty bag.
pub fn props_from(value: Value) -> Props {
    match value {
        Value::Object(map) => map,
        _ => Props::new(),
    }
}

fn children_from_value(value: Value) -> Vec<Node> {
    match value {
        Value::Null | Value::Bool(_) => Vec::new(),
        Value::String(text) => vec![Node::Text(text)],
        Value::Number(n) => vec![Node::Text(n.to_string())],
        Value::Array(items) => items.into_iter().flat_map(children_from_value).collect(),
        other @ Value::Object(_) => vec![Node::Text(other.to_string())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(node: &Node) -> Vec<String> {
        match node {
            Node::Element(e) => e
                .children
                .iter()
                .map(|c| match c {
                    Node::Text(t) => t.clone(),
                    other => format!("{:?}", other),
                })
                .collect(),
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn trailing_children_append_after_prop_children() {
        let node = create_element(
            "p",
            props_from(json!({ "children": ["a", "b"], "id": "x" })),
            vec![Node::text("c"), Node::text("d")],
        );

        assert_eq!(texts(&node), vec!["a", "b", "c", "d"]);

        let Node::Element(element) = node else {
            unreachable!()
        };
        assert!(!element.props.contains_key("children"));
        assert_eq!(element.props.get("id"), Some(&json!("x")));
    }

    #[test]
    fn single_string_child_in_props() {
        let node = create_element("p", props_from(json!({ "children": "a" })), vec!["b".into()]);

        assert_eq!(texts(&node), vec!["a", "b"]);
    }

    #[test]
    fn booleans_and_null_children_are_skipped() {
        let node = create_element(
            "p",
            props_from(json!({ "children": [true, null, 3, "x"] })),
            vec![],
        );

        assert_eq!(texts(&node), vec!["3", "x"]);
    }

    #[test]
    fn text_content_walks_subtree() {
        let node = Node::element(
            "p",
            vec![
                "Open ".into(),
                Node::element("strong", vec!["ShapeKt".into()]),
                Node::Raw("<br>".to_string()),
            ],
        );

        assert_eq!(node.text_content(), "Open ShapeKt");
    }

    #[test]
    fn props_from_non_object_is_empty() {
        assert!(props_from(json!([1, 2])).is_empty());
    }
}
