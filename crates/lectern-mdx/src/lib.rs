//! MDX page compiler.
//!
//! Turns an MDX source file into a [`PageModule`]: parsed frontmatter, a table
//! of contents, and a content tree of element requests ready to be rendered
//! under an override scope.

pub mod admonition;
pub mod fence;
pub mod frontmatter;
pub mod jsx;
pub mod page;
pub mod parser;

pub use admonition::AdmonitionKind;
pub use fence::CodeFence;
pub use frontmatter::{Frontmatter, FrontmatterError};
pub use jsx::{parse_inline_jsx, InlineJsx};
pub use page::PageModule;
pub use parser::{parse_mdx, slugify, ParseError, ParsedDoc, TocEntry};
