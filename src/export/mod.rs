//! Writing finished page trees to ebook containers.
//!
//! Provides the `Packager` trait and the EPUB implementation.
//!
//! # Architecture
//!
//! Packagers use a builder pattern:
//! - `new()` creates a packager with default configuration
//! - `with_config()` allows customization
//! - `package()` writes a fully resolved tree to a file
//!
//! Each page is written as `<uid>.xhtml`; link rewriting relies on that name.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wikibook::{EpubPackager, Metadata, PageTree, Packager};
//!
//! let mut tree = PageTree::new();
//! tree.add("Cover", "<p>Hello</p>", None);
//!
//! let packager = EpubPackager::new(Metadata::new("My Book").with_author("Me"));
//! packager.package(&tree, Path::new("output.epub"))?;
//! # Ok::<(), wikibook::Error>(())
//! ```

use std::path::Path;

use crate::book::PageTree;
use crate::error::Result;

mod epub;

pub use epub::{DEFAULT_STYLESHEET, EpubConfig, EpubPackager};

/// Writes a resolved page tree to an ebook file.
pub trait Packager {
    fn package(&self, tree: &PageTree, path: &Path) -> Result<()>;
}

/// Book metadata (Dublin Core subset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub authors: Vec<String>,
    pub language: String,
    pub identifier: String,
    pub description: Option<String>,
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
