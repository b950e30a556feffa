//! # wikibook
//!
//! Turn wikidot pages into EPUB ebooks.
//!
//! ## Features
//!
//! - Rewrite wikidot markup (tabs, collapsibles, footnotes, quotes) into
//!   plain, portable XHTML
//! - Assemble books from sections of page URLs, each page placed at most once
//! - Rewrite links between included pages into in-book links
//! - Generate per-section author credits
//! - Write EPUB 2 files with a nested table of contents
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::path::Path;
//! use wikibook::{BookBuilder, EpubPackager, Metadata, Page, Resolver};
//!
//! let mut pages = HashMap::new();
//! pages.insert(
//!     "http://site/a".to_string(),
//!     Page::new("http://site/a", "Alpha", "<div id=\"page-content\"><p>Hi</p></div>"),
//! );
//!
//! let mut builder = BookBuilder::new(pages.keys().cloned());
//! builder.new_section("Intro", ["http://site/a"], None);
//!
//! let packager = EpubPackager::new(Metadata::new("My Book"));
//! builder.save(
//!     Path::new("book.epub"),
//!     &pages,
//!     &Resolver::new("http://site"),
//!     &packager,
//!     &(),
//! )?;
//! # Ok::<(), wikibook::Error>(())
//! ```

pub mod book;
pub mod dom;
pub mod error;
pub mod export;
#[cfg(feature = "cli")]
pub mod manifest;
pub mod source;
pub mod transform;
pub(crate) mod util;

pub use book::{
    BookBuilder, BuildObserver, CreditsBuilder, LinkContext, LogObserver, PageTree, Resolver,
    TreeNode, Uid,
};
pub use error::{Error, Result};
pub use export::{EpubConfig, EpubPackager, Metadata, Packager};
pub use source::{Page, PageSource};
pub use transform::{Transformer, WikidotTransformer, transform_page};
