//! Template engine for rendering documentation pages.

use lectern_mdx::TocEntry;
use minijinja::Environment;

use crate::metadata::NavLink;

/// A sidebar navigation item.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
    /// Child items
    pub children: Vec<NavItem>,
    /// Whether this is the active page
    pub active: bool,
}

/// Context for rendering a page template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Meta description
    pub description: String,
    /// Site title
    pub site_title: String,
    /// Rendered content HTML
    pub content: String,
    pub nav: Vec<NavItem>,
    pub toc: Vec<TocEntry>,
    /// Base URL
    pub base_url: String,
    /// This page's URL
    pub permalink: String,
    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("base.html", BASE_TEMPLATE)
            .expect("Failed to add base template");
        env.add_template("doc.html", DOC_TEMPLATE)
            .expect("Failed to add doc template");
        env.add_template("nav.html", NAV_TEMPLATE)
            .expect("Failed to add nav template");

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(&self, template: &str, context: &Context) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} | {{ site_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}<link rel="canonical" href="{{ permalink }}">
  {% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}<link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body>
  <button class="menu-btn" type="button" aria-label="Toggle navigation">&#9776;</button>
  <div class="layout">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main">
      {% block content %}{% endblock %}
    </main>
  </div>
  <script src="{{ base_url }}assets/main.js"></script>
</body>
</html>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="doc">
  {{ content | safe }}
  {% if previous or next %}
  <nav class="pagination-nav" aria-label="Docs pages navigation">
    {% if previous %}<a class="pagination-nav__link pagination-nav__link--prev" href="{{ previous.permalink }}">
      <div class="pagination-nav__sublabel">Previous</div>
      <div class="pagination-nav__label">{{ previous.title }}</div>
    </a>{% endif %}
    {% if next %}<a class="pagination-nav__link pagination-nav__link--next" href="{{ next.permalink }}">
      <div class="pagination-nav__sublabel">Next</div>
      <div class="pagination-nav__label">{{ next.title }}</div>
    </a>{% endif %}
  </nav>
  {% endif %}
</article>

{% if toc %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <a href="{{ base_url }}" class="nav-logo">{{ site_title }}</a>
</div>
<ul class="nav-list">
{% for item in nav %}
  <li class="nav-item{% if item.active %} active{% endif %}">
    <a href="{{ item.path }}">{{ item.title }}</a>
    {% if item.children %}
    <ul class="nav-children">
      {% for child in item.children %}
      <li class="nav-item{% if child.active %} active{% endif %}">
        <a href="{{ child.path }}">{{ child.title }}</a>
      </li>
      {% endfor %}
    </ul>
    {% endif %}
  </li>
{% endfor %}
</ul>"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn context(title: &str) -> Context {
        Context {
            title: title.to_string(),
            description: String::new(),
            site_title: "DiffKt".to_string(),
            content: "<p>Hello world</p>".to_string(),
            nav: vec![],
            toc: vec![],
            base_url: "/".to_string(),
            permalink: "/docs/intro".to_string(),
            styles: vec![],
            previous: None,
            next: None,
        }
    }

    #[test]
    fn renders_basic_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_page("doc.html", &context("ShapeKt")).unwrap();

        assert!(html.contains("<title>ShapeKt | DiffKt</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(!html.contains("name=\"description\""));
        assert!(!html.contains("pagination-nav"));
    }

    #[test]
    fn renders_navigation_and_toc() {
        let engine = TemplateEngine::new();
        let mut context = context("Home");
        context.nav = vec![NavItem {
            title: "Framework".to_string(),
            path: "/docs/framework".to_string(),
            children: vec![NavItem {
                title: "ShapeKt".to_string(),
                path: "/docs/framework/shapekt".to_string(),
                children: vec![],
                active: true,
            }],
            active: false,
        }];
        context.toc = vec![TocEntry {
            title: "Usage".to_string(),
            id: "usage".to_string(),
            level: 2,
        }];

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains(">ShapeKt</a>"));
        assert!(html.contains("nav-item active"));
        assert!(html.contains("<a href=\"#usage\">Usage</a>"));
    }

    #[test]
    fn renders_pagination_and_escapes() {
        let engine = TemplateEngine::new();
        let mut context = context("A <b> page");
        context.description = "Shapes & tensors".to_string();
        context.next = Some(NavLink {
            title: "Just In Time Optimization".to_string(),
            permalink: "/docs/framework/jit".to_string(),
        });

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains("<title>A &lt;b&gt; page | DiffKt</title>"));
        assert!(html.contains("content=\"Shapes &amp; tensors\""));
        assert!(html.contains("pagination-nav__link--next"));
        assert!(html.contains("Just In Time Optimization"));
        assert!(!html.contains("pagination-nav__link--prev"));
    }
}
