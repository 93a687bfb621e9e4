//! Site-wide theme components.
//!
//! These are registered in the site scope, so every page sees them and any
//! page or user override of the same name shadows them.

use lectern_provider::{from_fn, props_from, Component, ComponentRef, Overrides, Props, RenderNode, Target};
use serde_json::{json, Value};

/// The theme's override set.
pub fn overrides() -> Overrides {
    Overrides::none()
        .bind("a", Target::component(Link))
        .bind("h2", heading("h2"))
        .bind("h3", heading("h3"))
        .bind("pre", from_fn("CodeBlock", code_block))
        .bind("wrapper", from_fn("MDXLayout", layout))
}

/// Links; external ones open in a new tab.
pub struct Link;

impl Component for Link {
    fn name(&self) -> &str {
        "Link"
    }

    fn render(&self, props: &Props, children: Vec<RenderNode>) -> RenderNode {
        let mut props = props.clone();

        let external = props
            .get("href")
            .and_then(Value::as_str)
            .is_some_and(is_external);
        if external {
            props.insert("target".to_string(), json!("_blank"));
            props.insert("rel".to_string(), json!("noopener noreferrer"));
        }

        RenderNode::element("a", props, children)
    }
}

fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://") || href.starts_with("//")
}

/// Heading with a trailing `#` anchor to itself.
fn heading(tag: &'static str) -> ComponentRef {
    from_fn("Heading", move |props, mut children| {
        if let Some(id) = props.get("id").and_then(Value::as_str) {
            children.push(RenderNode::element(
                "a",
                props_from(json!({
                    "className": "hash-link",
                    "href": format!("#{}", id),
                    "title": "Direct link to heading",
                })),
                vec![RenderNode::text("#")],
            ));
        }

        RenderNode::element(tag, props.clone(), children)
    })
}

/// `pre` wrapped in `div.code-block`, with a title bar when the fence has one.
fn code_block(props: &Props, mut children: Vec<RenderNode>) -> RenderNode {
    let mut title = None;

    // Fence details are for the theme, not for the emitted markup.
    for child in &mut children {
        if let RenderNode::Element(code) = child {
            if code.tag == "code" {
                code.props.remove("metastring");
                title = code
                    .props
                    .remove("title")
                    .and_then(|t| t.as_str().map(str::to_string));
            }
        }
    }

    let mut parts = Vec::with_capacity(2);
    if let Some(title) = title {
        parts.push(RenderNode::element(
            "div",
            class("code-block-title"),
            vec![RenderNode::text(title)],
        ));
    }
    parts.push(RenderNode::element("pre", props.clone(), children));

    RenderNode::element("div", class("code-block"), parts)
}

fn layout(_props: &Props, children: Vec<RenderNode>) -> RenderNode {
    RenderNode::element("div", class("markdown"), children)
}

fn class(name: &str) -> Props {
    props_from(json!({ "className": name }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_mdx::PageModule;
    use lectern_provider::Scope;
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> String {
        let site = Scope::root().child(&overrides());
        PageModule::compile(source).unwrap().render(&site).to_html()
    }

    #[test]
    fn external_links_open_in_new_tab() {
        assert_eq!(
            render("[ShapeKt](https://github.com/facebookresearch/shapekt) and [JIT](/docs/framework/jit)"),
            "<div class=\"markdown\"><p>\
             <a href=\"https://github.com/facebookresearch/shapekt\" target=\"_blank\" rel=\"noopener noreferrer\">ShapeKt</a> \
             and <a href=\"/docs/framework/jit\">JIT</a></p></div>"
        );
    }

    #[test]
    fn headings_get_anchors() {
        assert_eq!(
            render("## Shape checking\n\n#### Deep"),
            "<div class=\"markdown\">\
             <h2 id=\"shape-checking\">Shape checking<a class=\"hash-link\" href=\"#shape-checking\" title=\"Direct link to heading\">#</a></h2>\
             <h4 id=\"deep\">Deep</h4></div>"
        );
    }

    #[test]
    fn code_blocks_get_title_bar() {
        assert_eq!(
            render("```kotlin title=\"Shapes.kt\"\nval x = 1\n```"),
            "<div class=\"markdown\"><div class=\"code-block\">\
             <div class=\"code-block-title\">Shapes.kt</div>\
             <pre><code class=\"language-kotlin\">val x = 1\n</code></pre></div></div>"
        );
    }

    #[test]
    fn untitled_code_block() {
        assert_eq!(
            render("```\nplain\n```"),
            "<div class=\"markdown\"><div class=\"code-block\"><pre><code>plain\n</code></pre></div></div>"
        );
    }

    #[test]
    fn page_overrides_shadow_theme() {
        let site = Scope::root().child(&overrides());
        let page = PageModule::compile("[x](https://example.com)")
            .unwrap()
            .with_components(Overrides::none().bind("wrapper", Target::Fragment));

        assert_eq!(
            page.render(&site).to_html(),
            "<p><a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">x</a></p>"
        );
    }
}
