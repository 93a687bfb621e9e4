//! Renderable components.

use std::fmt;
use std::sync::Arc;

use crate::html::RenderNode;
use crate::node::Props;

/// A component that can be bound to an element name in a scope.
///
/// Components receive the properties bag verbatim and the children already
/// rendered under the scope of the element that invoked them.
pub trait Component: Send + Sync {
    /// Display name used in logs and debug output.
    fn name(&self) -> &str {
        "Anonymous"
    }

    /// Produce the output for one invocation.
    fn render(&self, props: &Props, children: Vec<RenderNode>) -> RenderNode;
}

/// Shared handle to a component.
pub type ComponentRef = Arc<dyn Component>;

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name())
    }
}

/// A component backed by a closure.
pub struct FnComponent<F> {
    name: &'static str,
    render: F,
}

impl<F> Component for FnComponent<F>
where
    F: Fn(&Props, Vec<RenderNode>) -> RenderNode + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    fn render(&self, props: &Props, children: Vec<RenderNode>) -> RenderNode {
        (self.render)(props, children)
    }
}

/// Wrap a closure as a named component.
pub fn from_fn<F>(name: &'static str, render: F) -> ComponentRef
where
    F: Fn(&Props, Vec<RenderNode>) -> RenderNode + Send + Sync + 'static,
{
    Arc::new(FnComponent { name, render })
}
