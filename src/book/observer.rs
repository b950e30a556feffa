//! Build progress reporting.

use std::path::Path;

use super::tree::Uid;

/// Receives progress events for one book build.
///
/// An observer is passed explicitly into resolution, credits and save, so
/// two builds running side by side report independently. Every method has
/// an empty default; `()` is the silent observer.
pub trait BuildObserver: Sync {
    /// Resolution is about to fetch `placeholders` pages.
    fn resolve_started(&self, _placeholders: usize) {}

    /// A placeholder has been replaced by its page.
    fn page_resolved(&self, _uid: Uid, _url: &str, _title: &str) {}

    /// Credits were assembled into `sections` subsections holding `lines`
    /// attribution lines.
    fn credits_built(&self, _sections: usize, _lines: usize) {}

    /// The packager finished writing the book.
    fn saved(&self, _path: &Path, _pages: usize) {}
}

impl BuildObserver for () {}

/// Forwards build events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl BuildObserver for LogObserver {
    fn resolve_started(&self, placeholders: usize) {
        log::info!("Resolving {placeholders} pages.");
    }

    fn page_resolved(&self, uid: Uid, url: &str, title: &str) {
        log::debug!("{uid}: {url} -> {title}");
    }

    fn credits_built(&self, sections: usize, lines: usize) {
        log::info!("Constructed credits: {lines} attributions in {sections} sections.");
    }

    fn saved(&self, path: &Path, pages: usize) {
        log::info!("Saved {pages} pages to {}.", path.display());
    }
}
