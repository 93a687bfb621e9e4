//! Static site generator for lectern documentation.
//!
//! Builds a static documentation site from MDX files, rendering every page
//! under a site-wide component scope (the theme) extended by user overrides.

pub mod assets;
pub mod builder;
pub mod metadata;
pub mod templates;
pub mod theme;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use metadata::{Metadata, NavLink};
