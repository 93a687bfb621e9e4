//! MDX component provider.
//!
//! Maintains immutable scopes of component overrides and renders trees of
//! element requests against them. A name bound in the innermost scope wins;
//! a name bound nowhere falls back to the built-in defaults and finally to a
//! plain HTML element, so rendering never fails.

pub mod component;
pub mod html;
pub mod node;
pub mod render;
pub mod scope;

pub use component::{from_fn, Component, ComponentRef};
pub use html::{escape_html, HtmlElement, RenderNode};
pub use node::{create_element, props_from, Element, Node, Props, Provider, Target};
pub use render::{render_with, Renderer};
pub use scope::{Mapping, Overrides, Scope};
