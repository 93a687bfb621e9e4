//! Element resolution and rendering.
//!
//! A requested name resolves, first hit wins, through:
//! the parent-qualified key (`"div.h5"`), the plain key, the built-in defaults
//! (`inlineCode`, `wrapper`), and finally the HTML primitive of that name.

use crate::html::RenderNode;
use crate::node::{Element, Node, Target};
use crate::scope::{Overrides, Scope};

/// Tags the HTML primitive renderer knows about. Anything else still renders,
/// but is logged since it usually means a missing component override.
const KNOWN_PRIMITIVES: &[&str] = &[
    "a", "abbr", "article", "aside", "b", "blockquote", "br", "button", "caption", "circle",
    "code", "col", "colgroup", "dd", "del", "details", "div", "dl", "dt", "em", "figcaption",
    "figure", "footer", "g", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "i", "img",
    "input", "kbd", "li", "line", "main", "mark", "nav", "ol", "p", "path", "pre", "rect", "s",
    "section", "small", "span", "strong", "sub", "summary", "sup", "svg", "table", "tbody", "td",
    "tfoot", "th", "thead", "tr", "u", "ul",
];

/// Renders content trees under a scope.
#[derive(Debug, Clone)]
pub struct Renderer {
    scope: Scope,
}

impl Renderer {
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }

    /// The scope content is resolved against.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Render a single node.
    pub fn render(&self, node: &Node) -> RenderNode {
        render_node(&self.scope, node, None)
    }

    /// Render a sequence of nodes as one fragment.
    pub fn render_all(&self, nodes: &[Node]) -> RenderNode {
        RenderNode::Fragment(render_children(&self.scope, nodes, None))
    }

    /// What `name` resolves to at the top level of this renderer's scope.
    pub fn resolve(&self, name: &str) -> Target {
        resolve(&self.scope, name, None)
    }
}

/// Merge `overrides` with the ambient `parent` scope and render `nodes` under it.
pub fn render_with(parent: &Scope, overrides: &Overrides, nodes: &[Node]) -> RenderNode {
    Renderer::new(parent.child(overrides)).render_all(nodes)
}

fn render_node(scope: &Scope, node: &Node, parent: Option<&str>) -> RenderNode {
    match node {
        Node::Text(text) => RenderNode::Text(text.clone()),
        Node::Raw(html) => RenderNode::Raw(html.clone()),
        Node::Element(element) => render_element(scope, element, parent),
        Node::Provider(provider) => {
            let inner = scope.child(&provider.overrides);
            RenderNode::Fragment(render_children(&inner, &provider.children, parent))
        }
    }
}

fn render_children(scope: &Scope, children: &[Node], parent: Option<&str>) -> Vec<RenderNode> {
    children
        .iter()
        .map(|child| render_node(scope, child, parent))
        .collect()
}

fn render_element(scope: &Scope, element: &Element, parent: Option<&str>) -> RenderNode {
    match &element.target {
        // Props on a fragment are dropped.
        Target::Fragment => RenderNode::Fragment(render_children(scope, &element.children, parent)),
        Target::Component(component) => {
            let children = render_children(scope, &element.children, None);
            component.render(&element.props, children)
        }
        Target::Tag(name) => {
            let children = render_children(scope, &element.children, Some(name));
            match resolve(scope, name, parent) {
                Target::Fragment => RenderNode::Fragment(children),
                Target::Tag(tag) => RenderNode::element(tag, element.props.clone(), children),
                Target::Component(component) => {
                    tracing::trace!(tag = %name, component = component.name(), "resolved override");
                    component.render(&element.props, children)
                }
            }
        }
    }
}

fn resolve(scope: &Scope, name: &str, parent: Option<&str>) -> Target {
    if let Some(parent) = parent {
        if let Some(target) = scope.lookup(&format!("{}.{}", parent, name)) {
            return target.clone();
        }
    }

    if let Some(target) = scope.lookup(name) {
        return target.clone();
    }

    if let Some(target) = builtin_default(name) {
        return target;
    }

    if !KNOWN_PRIMITIVES.contains(&name) {
        tracing::debug!(tag = %name, "no override bound, rendering as plain element");
    }

    Target::Tag(name.to_string())
}

fn builtin_default(name: &str) -> Option<Target> {
    match name {
        "inlineCode" => Some(Target::from("code")),
        "wrapper" => Some(Target::Fragment),
        _ => None,
    }
}
