//! Compiled page modules.

use lectern_provider::{create_element, props_from, render_with, Node, Overrides, RenderNode, Scope};
use serde_json::json;

use crate::frontmatter::Frontmatter;
use crate::parser::{parse_mdx, ParseError, ParsedDoc, TocEntry};

/// A compiled MDX page: metadata plus a static content tree.
///
/// Rendering registers the page's own `components` in a child of the ambient
/// scope, so page-level overrides shadow site-wide ones for this page only.
#[derive(Debug, Clone, Default)]
pub struct PageModule {
    pub front_matter: Frontmatter,
    pub content_title: Option<String>,
    pub excerpt: Option<String>,
    pub toc: Vec<TocEntry>,
    pub nodes: Vec<Node>,
    pub components: Overrides,
}

impl PageModule {
    pub fn from_doc(doc: ParsedDoc) -> Self {
        Self {
            front_matter: doc.frontmatter.unwrap_or_default(),
            content_title: doc.content_title,
            excerpt: doc.excerpt,
            toc: doc.toc,
            nodes: doc.nodes,
            components: Overrides::none(),
        }
    }

    /// Parse `source` into a page with no page-level overrides.
    pub fn compile(source: &str) -> Result<Self, ParseError> {
        parse_mdx(source).map(Self::from_doc)
    }

    pub fn with_components(mut self, components: Overrides) -> Self {
        self.components = components;
        self
    }

    /// Front matter title, else the leading heading.
    pub fn title(&self) -> Option<&str> {
        self.front_matter
            .title
            .as_deref()
            .or(self.content_title.as_deref())
    }

    /// Front matter description, else the first paragraph.
    pub fn description(&self) -> Option<&str> {
        self.front_matter
            .description
            .as_deref()
            .or(self.excerpt.as_deref())
    }

    pub fn is_draft(&self) -> bool {
        self.front_matter.draft
    }

    /// Render the page under `scope`.
    ///
    /// Content is wrapped in a `wrapper` request carrying the `toc` prop. With
    /// no `wrapper` override bound it renders as a fragment.
    pub fn render(&self, scope: &Scope) -> RenderNode {
        let wrapper = create_element(
            "wrapper",
            props_from(json!({ "toc": self.toc })),
            self.nodes.clone(),
        );
        render_with(scope, &self.components, std::slice::from_ref(&wrapper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_provider::{from_fn, Target};
    use pretty_assertions::assert_eq;

    const SHAPEKT: &str = r#"---
id: shapekt
title: ShapeKt
---

ShapeKt is an extensible compiler plugin for `Kotlin`.

## Setup

```kotlin
plugins { id("shapekt") }
```
"#;

    #[test]
    fn renders_as_fragment_by_default() {
        let page = PageModule::compile(SHAPEKT).unwrap();

        assert_eq!(
            page.render(&Scope::root()).to_html(),
            "<p>ShapeKt is an extensible compiler plugin for <code>Kotlin</code>.</p>\
             <h2 id=\"setup\">Setup</h2>\
             <pre><code class=\"language-kotlin\">plugins { id(&quot;shapekt&quot;) }\n</code></pre>"
        );
    }

    #[test]
    fn title_and_description_fallbacks() {
        let page = PageModule::compile(SHAPEKT).unwrap();
        assert_eq!(page.title(), Some("ShapeKt"));
        assert_eq!(
            page.description(),
            Some("ShapeKt is an extensible compiler plugin for Kotlin.")
        );

        let page = PageModule::compile("# From Heading\n\nBody").unwrap();
        assert_eq!(page.title(), Some("From Heading"));
        assert!(!page.is_draft());
    }

    #[test]
    fn wrapper_override_receives_toc() {
        let layout = from_fn("Layout", |props, children| {
            let entries = props["toc"].as_array().map(Vec::len).unwrap_or(0);
            RenderNode::element(
                "article",
                props_from(json!({ "data-toc": entries })),
                children,
            )
        });
        let site = Scope::root().child(&Overrides::none().bind("wrapper", layout));

        let page = PageModule::compile(SHAPEKT).unwrap();
        let html = page.render(&site).to_html();

        assert!(html.starts_with("<article data-toc=\"1\"><p>"));
        assert!(html.ends_with("</pre></article>"));
    }

    #[test]
    fn page_components_shadow_site_components() {
        let site = Scope::root().child(&Overrides::none().bind("p", "section").bind("h2", "h3"));
        let page = PageModule::compile("Text\n\n## Heading")
            .unwrap()
            .with_components(Overrides::none().bind("p", Target::Fragment));

        assert_eq!(
            page.render(&site).to_html(),
            "Text<h3 id=\"heading\">Heading</h3>"
        );
        // The site scope itself is untouched.
        assert_eq!(site.lookup("p"), Some(&Target::from("section")));
    }

    #[test]
    fn compile_propagates_parse_errors() {
        let err = PageModule::compile(":::danger\nno end").unwrap_err();
        assert!(matches!(err, ParseError::Parse { line: 1, .. }));
    }
}
