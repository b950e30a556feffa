//! Book assembly.
//!
//! A book is built in two phases:
//!
//! 1. **Structure**: [`BookBuilder`] lays out section headers and one
//!    placeholder page per wiki URL. Every placeholder gets its uid up front,
//!    which is what lets links between pages be rewritten later.
//! 2. **Resolution**: [`Resolver`] fetches each placeholder's page, runs it
//!    through a [`Transformer`](crate::Transformer) and produces the final
//!    [`PageTree`], which a [`Packager`](crate::Packager) then writes out.
//!
//! [`CreditsBuilder`] can be run at any time after the structure is in
//! place; it only reads page metadata.

mod builder;
mod credits;
mod links;
mod observer;
mod resolve;
mod tree;

pub use builder::{BookBuilder, PLACEHOLDER, section_header};
pub use credits::{CREDITS_TITLE, CreditsBuilder, UNSECTIONED_TITLE, credit_line};
pub use links::LinkContext;
pub use observer::{BuildObserver, LogObserver};
pub use resolve::Resolver;
pub use tree::{PageTree, TreeNode, Uid};
