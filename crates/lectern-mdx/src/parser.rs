//! MDX document parser.
//!
//! The source is first split into markdown runs, `:::` admonition containers
//! and JSX component blocks; container bodies are parsed recursively. Markdown
//! runs go through pulldown-cmark and become element requests named the way
//! MDX names them (`p`, `inlineCode`, `pre > code`, ...), so every construct
//! can be overridden by a component scope at render time.
//!
//! Fenced code becomes `pre > code`, and the fence's `metastring` and `title`
//! stay on the `code` request as props for a `pre`/`code` override to consume.
//! With no such override they are written out as plain attributes of the
//! primitive `<code>` element, the same way MDX passes them to the DOM.

use std::collections::{HashMap, HashSet};

use lectern_provider::{create_element, props_from, Node, Props, Target};
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use serde_json::json;

use crate::admonition::{self, AdmonitionOpen};
use crate::fence::CodeFence;
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
use crate::jsx::{self, InlineJsx};

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Content tree
    pub nodes: Vec<Node>,

    /// Table of contents entries (levels 2 and deeper)
    pub toc: Vec<TocEntry>,

    /// Text of a leading `# Heading`
    pub content_title: Option<String>,

    /// Text of the first top-level paragraph
    pub excerpt: Option<String>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (2-6)
    pub level: u8,
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Parse an MDX document.
///
/// Extracts frontmatter, builds the content tree and generates a table of contents.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    // Extract frontmatter first
    let (frontmatter, content) = extract_frontmatter(source)?;

    // Count lines in frontmatter to offset line numbers
    let frontmatter_len = source.len() - content.len();
    let frontmatter_line_offset = source[..frontmatter_len].lines().count();

    let mut state = DocState::default();
    let nodes = parse_blocks(content, frontmatter_line_offset + 1, &mut state)?;

    let content_title = match nodes.first() {
        Some(node @ Node::Element(element)) if element.target.tag_name() == Some("h1") => {
            Some(node.text_content())
        }
        _ => None,
    };

    let excerpt = nodes
        .iter()
        .find(|node| matches!(node, Node::Element(e) if e.target.tag_name() == Some("p")))
        .map(|node| node.text_content().trim().to_string())
        .filter(|text| !text.is_empty());

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        nodes,
        toc: state.toc,
        content_title,
        excerpt,
    })
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// State shared by every block of one document.
#[derive(Debug, Default)]
struct DocState {
    toc: Vec<TocEntry>,
    slugs: HashMap<String, usize>,
    ids: HashSet<String>,
}

impl DocState {
    /// Slug for `text`, suffixed with `-1`, `-2`, ... until it is unused.
    fn unique_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };

        let count = self.slugs.entry(base.clone()).or_insert(0);
        loop {
            let id = if *count == 0 {
                base.clone()
            } else {
                format!("{}-{}", base, count)
            };
            *count += 1;
            if self.ids.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Claim an explicit `{#id}` so later generated slugs avoid it.
    fn reserve(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }
}

enum Segment<'a> {
    Markdown(&'a str),
    Admonition {
        open: AdmonitionOpen,
        body: &'a str,
        line: usize,
    },
    Jsx {
        jsx: InlineJsx,
        line: usize,
    },
}

fn parse_blocks(source: &str, first_line: usize, state: &mut DocState) -> Result<Vec<Node>, ParseError> {
    let mut nodes = Vec::new();

    for segment in segments(source, first_line)? {
        match segment {
            Segment::Markdown(text) => nodes.extend(markdown_nodes(text, state)),
            Segment::Admonition { open, body, line } => {
                let children = parse_blocks(body, line, state)?;
                nodes.push(admonition::to_node(&open, children));
            }
            Segment::Jsx { jsx, line } => nodes.push(jsx_node(jsx, line, state)?),
        }
    }

    Ok(nodes)
}

fn jsx_node(jsx: InlineJsx, line: usize, state: &mut DocState) -> Result<Node, ParseError> {
    let children = match &jsx.children {
        None => Vec::new(),
        Some(source) if source.contains('\n') => parse_blocks(source, line, state)?,
        Some(source) => {
            // Same-line children are phrasing content: no paragraph wrapper.
            let mut nodes = parse_blocks(source, line, state)?;
            let unwrapped = match nodes.as_mut_slice() {
                [Node::Element(p)] if p.target.tag_name() == Some("p") => {
                    Some(std::mem::take(&mut p.children))
                }
                _ => None,
            };
            unwrapped.unwrap_or(nodes)
        }
    };

    Ok(create_element(Target::Tag(jsx.component), jsx.props, children))
}

fn line_end(source: &str, pos: usize) -> usize {
    source[pos..]
        .find('\n')
        .map(|i| pos + i + 1)
        .unwrap_or(source.len())
}

fn starts_component(text: &str) -> bool {
    text.strip_prefix('<')
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn segments(source: &str, first_line: usize) -> Result<Vec<Segment<'_>>, ParseError> {
    let line_at = |pos: usize| first_line + source[..pos].matches('\n').count();

    let mut out = Vec::new();
    let mut markdown_start = 0;
    let mut pos = 0;
    let mut fence: Option<&str> = None;

    while pos < source.len() {
        let end = line_end(source, pos);
        let line = &source[pos..end];
        let trimmed = line.trim();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            pos = end;
            continue;
        }

        if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        } else if let Some(open) = admonition::parse_open(trimmed) {
            let Some((body_end, after)) = admonition::find_close(source, end) else {
                return Err(ParseError::Parse {
                    line: line_at(pos),
                    message: format!("unclosed admonition `{}`", trimmed),
                });
            };

            push_markdown(&mut out, &source[markdown_start..pos]);
            out.push(Segment::Admonition {
                open,
                body: &source[end..body_end],
                line: line_at(end),
            });
            pos = after;
            markdown_start = pos;
            continue;
        } else {
            let indent = line.len() - line.trim_start().len();
            if starts_component(&line[indent..]) {
                if let Some((jsx, len)) = jsx::parse_element(&source[pos + indent..]) {
                    let element_end = pos + indent + len;
                    let rest_end = line_end(source, element_end);

                    // Only a block when nothing follows the element on its last line.
                    if source[element_end..rest_end].trim().is_empty() {
                        push_markdown(&mut out, &source[markdown_start..pos]);
                        out.push(Segment::Jsx {
                            jsx,
                            line: line_at(pos),
                        });
                        pos = rest_end;
                        markdown_start = pos;
                        continue;
                    }
                }
            }
        }

        pos = end;
    }

    push_markdown(&mut out, &source[markdown_start..]);
    Ok(out)
}

fn push_markdown<'a>(out: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.trim().is_empty() {
        out.push(Segment::Markdown(text));
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

fn markdown_nodes(text: &str, state: &mut DocState) -> Vec<Node> {
    let mut builder = TreeBuilder::new(state);
    for event in Parser::new_ext(text, markdown_options()) {
        builder.event(event);
    }
    builder.finish()
}

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

enum FrameKind {
    Element,
    Heading { explicit_id: Option<String> },
    CodeBlock(CodeFence),
    Image { src: String, title: String },
    HtmlBlock,
    TableHead,
    TableBody,
    /// Constructs with no element of their own; children go to the parent.
    Transparent,
}

struct Frame {
    kind: FrameKind,
    tag: &'static str,
    props: Props,
    children: Vec<Node>,
}

/// Builds a node tree from pulldown-cmark events.
struct TreeBuilder<'s> {
    state: &'s mut DocState,
    root: Vec<Node>,
    stack: Vec<Frame>,
    alignments: Vec<Alignment>,
    cell: usize,
    in_head: bool,
}

impl<'s> TreeBuilder<'s> {
    fn new(state: &'s mut DocState) -> Self {
        Self {
            state,
            root: Vec::new(),
            stack: Vec::new(),
            alignments: Vec::new(),
            cell: 0,
            in_head: false,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(TagEnd::Table) => {
                if matches!(self.stack.last(), Some(Frame { kind: FrameKind::TableBody, .. })) {
                    self.close();
                }
                self.close();
            }
            Event::End(_) => self.close(),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.push(create_element(
                "inlineCode",
                Props::new(),
                vec![Node::Text(code.into_string())],
            )),
            Event::Html(html) | Event::InlineHtml(html) => self.push(Node::Raw(html.into_string())),
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.push(Node::element("br", vec![])),
            Event::Rule => self.push(Node::element("hr", vec![])),
            Event::FootnoteReference(label) => {
                let link = create_element(
                    "a",
                    props_from(json!({
                        "href": format!("#fn-{}", label),
                        "id": format!("fnref-{}", label),
                    })),
                    vec![Node::Text(label.into_string())],
                );
                self.push(create_element("sup", Props::new(), vec![link]));
            }
            Event::TaskListMarker(checked) => {
                if let Some(item) = self.stack.iter_mut().rev().find(|f| f.tag == "li") {
                    item.props
                        .insert("className".to_string(), json!("task-list-item"));
                }
                self.push(create_element(
                    "input",
                    props_from(json!({ "type": "checkbox", "checked": checked, "disabled": true })),
                    vec![],
                ));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open("p", Props::new()),
            Tag::Heading { level, id, .. } => {
                let tag = HEADINGS[(level as usize).clamp(1, 6) - 1];
                self.open_kind(
                    FrameKind::Heading {
                        explicit_id: id.map(|id| id.into_string()),
                    },
                    tag,
                    Props::new(),
                );
            }
            Tag::BlockQuote(..) => self.open("blockquote", Props::new()),
            Tag::CodeBlock(kind) => {
                let fence = match kind {
                    CodeBlockKind::Fenced(info) => CodeFence::parse(&info),
                    CodeBlockKind::Indented => CodeFence::default(),
                };
                self.open_kind(FrameKind::CodeBlock(fence), "pre", Props::new());
            }
            Tag::HtmlBlock => self.open_kind(FrameKind::HtmlBlock, "div", Props::new()),
            Tag::List(Some(start)) => {
                let mut props = Props::new();
                if start != 1 {
                    props.insert("start".to_string(), json!(start));
                }
                self.open("ol", props);
            }
            Tag::List(None) => self.open("ul", Props::new()),
            Tag::Item => self.open("li", Props::new()),
            Tag::FootnoteDefinition(label) => self.open(
                "div",
                props_from(json!({
                    "className": "footnote-definition",
                    "id": format!("fn-{}", label),
                })),
            ),
            Tag::Table(alignments) => {
                self.alignments = alignments;
                self.open("table", Props::new());
            }
            Tag::TableHead => {
                self.in_head = true;
                self.cell = 0;
                self.open_kind(FrameKind::TableHead, "thead", Props::new());
            }
            Tag::TableRow => {
                if matches!(self.stack.last(), Some(Frame { tag: "table", .. })) {
                    self.open_kind(FrameKind::TableBody, "tbody", Props::new());
                }
                self.cell = 0;
                self.open("tr", Props::new());
            }
            Tag::TableCell => {
                let mut props = Props::new();
                let align = match self.alignments.get(self.cell) {
                    Some(Alignment::Left) => Some("left"),
                    Some(Alignment::Center) => Some("center"),
                    Some(Alignment::Right) => Some("right"),
                    _ => None,
                };
                if let Some(align) = align {
                    props.insert("align".to_string(), json!(align));
                }
                self.cell += 1;
                self.open(if self.in_head { "th" } else { "td" }, props);
            }
            Tag::Emphasis => self.open("em", Props::new()),
            Tag::Strong => self.open("strong", Props::new()),
            Tag::Strikethrough => self.open("del", Props::new()),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut props = Props::new();
                props.insert("href".to_string(), json!(dest_url.as_ref()));
                if !title.is_empty() {
                    props.insert("title".to_string(), json!(title.as_ref()));
                }
                self.open("a", props);
            }
            Tag::Image {
                dest_url, title, ..
            } => self.open_kind(
                FrameKind::Image {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                },
                "img",
                Props::new(),
            ),
            _ => self.open_kind(FrameKind::Transparent, "", Props::new()),
        }
    }

    fn open(&mut self, tag: &'static str, props: Props) {
        self.open_kind(FrameKind::Element, tag, props);
    }

    fn open_kind(&mut self, kind: FrameKind, tag: &'static str, props: Props) {
        self.stack.push(Frame {
            kind,
            tag,
            props,
            children: Vec::new(),
        });
    }

    fn close(&mut self) {
        let Some(Frame {
            kind,
            tag,
            mut props,
            children,
        }) = self.stack.pop()
        else {
            return;
        };

        match kind {
            FrameKind::Element => self.push(create_element(tag, props, children)),
            FrameKind::Transparent => {
                for child in children {
                    self.push(child);
                }
            }
            FrameKind::Heading { explicit_id } => {
                let title = text_of(&children);
                let id = match explicit_id {
                    Some(id) => {
                        self.state.reserve(&id);
                        id
                    }
                    None => self.state.unique_slug(&title),
                };
                let level = tag[1..].parse::<u8>().unwrap_or(1);

                props.insert("id".to_string(), json!(id));
                if level >= 2 {
                    self.state.toc.push(TocEntry {
                        title: title.trim().to_string(),
                        id,
                        level,
                    });
                }
                self.push(create_element(tag, props, children));
            }
            FrameKind::CodeBlock(fence) => {
                let mut code_props = Props::new();
                if let Some(class) = fence.class_name() {
                    code_props.insert("className".to_string(), json!(class));
                }
                if let Some(meta) = fence.meta {
                    code_props.insert("metastring".to_string(), json!(meta));
                }
                if let Some(title) = fence.title {
                    code_props.insert("title".to_string(), json!(title));
                }

                let code = create_element("code", code_props, vec![Node::Text(text_of(&children))]);
                self.push(create_element(tag, props, vec![code]));
            }
            FrameKind::Image { src, title } => {
                props.insert("src".to_string(), json!(src));
                props.insert("alt".to_string(), json!(text_of(&children)));
                if !title.is_empty() {
                    props.insert("title".to_string(), json!(title));
                }
                self.push(create_element(tag, props, vec![]));
            }
            FrameKind::HtmlBlock => {
                let html: String = children
                    .iter()
                    .filter_map(|node| match node {
                        Node::Raw(html) => Some(html.as_str()),
                        _ => None,
                    })
                    .collect();
                self.push(Node::Raw(html));
            }
            FrameKind::TableHead => {
                self.in_head = false;
                let row = create_element("tr", Props::new(), children);
                self.push(create_element(tag, props, vec![row]));
            }
            FrameKind::TableBody => self.push(create_element(tag, props, children)),
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    fn push(&mut self, node: Node) {
        self.children_mut().push(node);
    }

    fn push_text(&mut self, text: &str) {
        let children = self.children_mut();
        if let Some(Node::Text(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(Node::Text(text.to_string()));
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.close();
        }
        self.root
    }
}

fn text_of(children: &[Node]) -> String {
    children.iter().map(Node::text_content).collect()
}
