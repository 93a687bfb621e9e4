//! Asset pipeline for the theme stylesheet and script.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The theme stylesheet.
    pub fn generate_css() -> String {
        THEME_CSS.to_string()
    }

    /// The theme script: mobile menu, active nav item, copy buttons.
    pub fn generate_js() -> String {
        THEME_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const THEME_CSS: &str = r#"/* lectern default theme */

:root {
  --sidebar-width: 280px;
  --toc-width: 220px;
  --content-max-width: 820px;
  --color-background: #ffffff;
  --color-foreground: #1c1e21;
  --color-muted: #f5f6f7;
  --color-muted-foreground: #606770;
  --color-border: #dadde1;
  --color-primary: #25c2a0;
  --color-primary-dark: #1fa588;
  --color-code-background: #f6f7f8;
  --radius: 0.4rem;
  --font-mono: SFMono-Regular, Menlo, Monaco, Consolas, monospace;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
  background: var(--color-background);
  color: var(--color-foreground);
  line-height: 1.65;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

/* Sidebar */
.sidebar {
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
  padding: 1.5rem 1rem;
  border-right: 1px solid var(--color-border);
  background: var(--color-muted);
}

.nav-header {
  margin-bottom: 1.5rem;
}

.nav-logo {
  font-size: 1.2rem;
  font-weight: 700;
  color: var(--color-foreground);
  text-decoration: none;
}

.nav-list,
.nav-children {
  list-style: none;
  margin: 0;
  padding: 0;
}

.nav-children {
  margin-left: 0.75rem;
}

.nav-item a {
  display: block;
  padding: 0.35rem 0.75rem;
  border-radius: var(--radius);
  color: var(--color-muted-foreground);
  text-decoration: none;
}

.nav-item a:hover {
  background: rgba(0, 0, 0, 0.05);
}

.nav-item.active > a {
  color: var(--color-primary-dark);
  font-weight: 600;
}

/* Main column */
.main {
  display: grid;
  grid-template-columns: minmax(0, 1fr) var(--toc-width);
  gap: 2rem;
  padding: 2rem 2.5rem;
}

.doc {
  max-width: var(--content-max-width);
}

.markdown h1 {
  font-size: 2.5rem;
  margin: 0 0 1.5rem;
}

.markdown h2,
.markdown h3 {
  margin: 2rem 0 1rem;
}

.hash-link {
  margin-left: 0.4rem;
  opacity: 0;
  color: var(--color-primary);
  text-decoration: none;
  transition: opacity 0.15s;
}

h2:hover .hash-link,
h3:hover .hash-link {
  opacity: 1;
}

.markdown a {
  color: var(--color-primary-dark);
}

.markdown code {
  font-family: var(--font-mono);
  font-size: 0.9em;
  padding: 0.1rem 0.3rem;
  border-radius: var(--radius);
  background: var(--color-code-background);
}

.markdown table {
  border-collapse: collapse;
  margin-bottom: 1rem;
}

.markdown th,
.markdown td {
  padding: 0.5rem 0.75rem;
  border: 1px solid var(--color-border);
}

/* Code blocks */
.code-block {
  position: relative;
  margin-bottom: 1.25rem;
  border-radius: var(--radius);
  background: var(--color-code-background);
  overflow: hidden;
}

.code-block-title {
  padding: 0.5rem 1rem;
  font-family: var(--font-mono);
  font-size: 0.85rem;
  border-bottom: 1px solid var(--color-border);
}

.code-block pre {
  margin: 0;
  padding: 1rem;
  overflow-x: auto;
}

.code-block pre code {
  padding: 0;
  background: none;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.2rem 0.6rem;
  font-size: 0.75rem;
  border: 1px solid var(--color-border);
  border-radius: var(--radius);
  background: var(--color-background);
  cursor: pointer;
  opacity: 0;
  transition: opacity 0.15s;
}

.code-block:hover .copy-btn {
  opacity: 1;
}

/* Admonitions */
.admonition {
  margin-bottom: 1.25rem;
  padding: 1rem;
  border-left: 5px solid var(--admonition-color, var(--color-muted-foreground));
  border-radius: var(--radius);
  background: var(--admonition-background, var(--color-muted));
}

.admonition-heading h5 {
  display: flex;
  align-items: center;
  gap: 0.4rem;
  margin: 0 0 0.5rem;
  font-size: 0.85rem;
  text-transform: uppercase;
}

.admonition-icon svg {
  fill: var(--admonition-color, var(--color-muted-foreground));
}

.admonition-content > :last-child {
  margin-bottom: 0;
}

.alert--success {
  --admonition-color: #009400;
  --admonition-background: #e6f6e6;
}

.alert--info {
  --admonition-color: #4cb3d4;
  --admonition-background: #eef9fd;
}

.alert--warning {
  --admonition-color: #e6a700;
  --admonition-background: #fff8e6;
}

.alert--danger {
  --admonition-color: #e13238;
  --admonition-background: #ffebec;
}

/* Previous / next */
.pagination-nav {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 1rem;
  margin-top: 3rem;
}

.pagination-nav__link {
  padding: 1rem;
  border: 1px solid var(--color-border);
  border-radius: var(--radius);
  color: var(--color-foreground);
  text-decoration: none;
}

.pagination-nav__link--next {
  grid-column: 2;
  text-align: right;
}

.pagination-nav__sublabel {
  font-size: 0.8rem;
  color: var(--color-muted-foreground);
}

.pagination-nav__label {
  font-weight: 600;
}

/* Table of contents */
.toc {
  position: sticky;
  top: 2rem;
  align-self: start;
  font-size: 0.875rem;
}

.toc h2 {
  font-size: 0.75rem;
  text-transform: uppercase;
  color: var(--color-muted-foreground);
}

.toc ul {
  list-style: none;
  padding: 0;
}

.toc a {
  color: var(--color-muted-foreground);
  text-decoration: none;
}

.toc-level-3 {
  padding-left: 1rem;
}

.toc-level-4 {
  padding-left: 2rem;
}

.menu-btn {
  display: none;
}

@media (max-width: 996px) {
  .layout,
  .main {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: fixed;
    left: -100%;
    z-index: 50;
    width: var(--sidebar-width);
    transition: left 0.3s;
  }

  .sidebar.open {
    left: 0;
  }

  .toc {
    display: none;
  }

  .menu-btn {
    display: block;
    position: fixed;
    top: 1rem;
    right: 1rem;
    z-index: 100;
    padding: 0.4rem 0.6rem;
    border: none;
    border-radius: var(--radius);
    background: var(--color-primary);
    color: #fff;
  }
}
"#;

const THEME_JS: &str = r#"(function () {
  'use strict';

  const menuBtn = document.querySelector('.menu-btn');
  const sidebar = document.querySelector('.sidebar');
  if (menuBtn && sidebar) {
    menuBtn.addEventListener('click', () => sidebar.classList.toggle('open'));
  }

  const currentPath = window.location.pathname.replace(/\/$/, '');
  document.querySelectorAll('.nav-item a').forEach((link) => {
    const href = (link.getAttribute('href') || '').replace(/\/$/, '');
    if (href && href === currentPath) {
      link.parentElement.classList.add('active');
    }
  });

  document.querySelectorAll('.code-block').forEach((block) => {
    if (block.querySelector('.copy-btn')) return;

    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.type = 'button';
    btn.textContent = 'Copy';

    btn.addEventListener('click', async () => {
      const code = block.querySelector('pre code') || block.querySelector('pre');
      try {
        await navigator.clipboard.writeText(code ? code.textContent : '');
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });

    block.appendChild(btn);
  });
})();
"#;
