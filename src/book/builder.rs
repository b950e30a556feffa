//! Structural assembly: sections and URL placeholders.

use std::collections::HashSet;
use std::path::Path;

use super::links::LinkContext;
use super::observer::BuildObserver;
use super::resolve::Resolver;
use super::tree::{PageTree, Uid};
use crate::error::Result;
use crate::export::Packager;
use crate::source::PageSource;
use crate::transform::Transformer;

/// Content of a placeholder page until resolution replaces it.
pub const PLACEHOLDER: &str = "-";

/// Content of a section header page.
pub fn section_header(title: &str) -> String {
    format!(
        "<div class=\"title2\">{}</div>",
        crate::util::escape_xml(title)
    )
}

/// Builds the page tree of a book from wiki URLs.
///
/// Construction starts from the "heap": every URL the book may include.
/// [`add_url`](Self::add_url) takes a URL out of the heap and adds a
/// placeholder page for it, so each URL appears in the book at most once no
/// matter how many sections ask for it. Page content is only fetched when
/// the book is resolved, by which time every placeholder (and therefore
/// every in-book link target) is known.
///
/// # Example
///
/// ```
/// use wikibook::BookBuilder;
///
/// let mut builder = BookBuilder::new(["http://site/a", "http://site/b"]);
/// let intro = builder.new_section("Intro", ["http://site/a"], None);
/// assert!(intro.is_some());
///
/// // Already placed: both calls are no-ops.
/// assert!(builder.add_url("http://site/a", None).is_none());
/// assert!(builder.new_section("Again", ["http://site/a"], None).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BookBuilder {
    heap: HashSet<String>,
    tree: PageTree,
    links: LinkContext,
}

impl BookBuilder {
    /// Start a book whose pages may be drawn from `heap`.
    pub fn new<I, S>(heap: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            heap: heap.into_iter().map(Into::into).collect(),
            tree: PageTree::new(),
            links: LinkContext::new(),
        }
    }

    /// Add a page with literal content.
    pub fn add_page(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        parent: Option<Uid>,
    ) -> Uid {
        self.tree.add(title, content, parent)
    }

    /// Add a placeholder for the page at `url`.
    ///
    /// Does nothing and returns `None` if `url` is not in the heap, either
    /// because it was never eligible or because it was already placed.
    pub fn add_url(&mut self, url: &str, parent: Option<Uid>) -> Option<Uid> {
        if !self.heap.remove(url) {
            return None;
        }
        let uid = self.tree.add(url, PLACEHOLDER, parent);
        self.links.insert(url, uid);
        Some(uid)
    }

    /// Add a section header with placeholders for `urls` below it.
    ///
    /// If none of `urls` is still in the heap, nothing is added and `None`
    /// is returned, so a book never contains an empty section header.
    pub fn new_section<I, S>(&mut self, title: &str, urls: I, parent: Option<Uid>) -> Option<Uid>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls: Vec<S> = urls.into_iter().collect();
        if !urls.iter().any(|u| self.heap.contains(u.as_ref())) {
            return None;
        }

        let header = self.add_page(title, section_header(title), parent);
        for url in &urls {
            self.add_url(url.as_ref(), Some(header));
        }
        Some(header)
    }

    /// The tree as assembled so far (placeholders unresolved).
    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    pub fn links(&self) -> &LinkContext {
        &self.links
    }

    /// URLs still eligible for inclusion.
    pub fn pending(&self) -> &HashSet<String> {
        &self.heap
    }

    /// Resolve every placeholder and write the book.
    ///
    /// Any fetch failure aborts the save before the packager runs.
    pub fn save<S, T, P>(
        &self,
        path: &Path,
        source: &S,
        resolver: &Resolver<T>,
        packager: &P,
        observer: &dyn BuildObserver,
    ) -> Result<()>
    where
        S: PageSource,
        T: Transformer,
        P: Packager,
    {
        if !self.heap.is_empty() {
            log::debug!("{} pages were never placed in the book", self.heap.len());
        }
        let resolved = resolver.resolve(&self.tree, &self.links, source, observer)?;
        packager.package(&resolved, path)?;
        observer.saved(path, resolved.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> BookBuilder {
        BookBuilder::new(["https://site/a", "https://site/b", "https://site/c"])
    }

    #[test]
    fn test_add_url_creates_placeholder() {
        let mut builder = builder();
        let uid = builder.add_url("https://site/a", None).unwrap();

        let node = builder.tree().node(uid).unwrap();
        assert_eq!(node.title, "https://site/a");
        assert_eq!(node.content, PLACEHOLDER);
        assert_eq!(builder.links().get("https://site/a"), Some(uid));
        assert!(!builder.pending().contains("https://site/a"));
    }

    #[test]
    fn test_add_url_is_idempotent() {
        let mut builder = builder();
        builder.add_url("https://site/a", None);
        let tree = builder.tree().clone();
        let links = builder.links().clone();

        assert_eq!(builder.add_url("https://site/a", None), None);
        assert_eq!(builder.tree(), &tree);
        assert_eq!(builder.links(), &links);
    }

    #[test]
    fn test_add_url_ignores_unknown_url() {
        let mut builder = builder();
        assert_eq!(builder.add_url("https://site/zzz", None), None);
        assert!(builder.tree().is_empty());
        assert_eq!(builder.pending().len(), 3);
    }

    #[test]
    fn test_new_section_places_children_in_order() {
        let mut builder = builder();
        let header = builder
            .new_section("Intro", ["https://site/b", "https://site/a"], None)
            .unwrap();

        let node = builder.tree().node(header).unwrap();
        assert_eq!(node.content, "<div class=\"title2\">Intro</div>");
        let titles: Vec<_> = builder
            .tree()
            .children(header)
            .iter()
            .map(|&c| builder.tree().node(c).unwrap().title.clone())
            .collect();
        assert_eq!(titles, vec!["https://site/b", "https://site/a"]);
    }

    #[test]
    fn test_new_section_without_pending_urls_adds_nothing() {
        let mut builder = builder();
        builder.add_url("https://site/a", None);
        let before = builder.tree().len();

        assert_eq!(
            builder.new_section("Empty", ["https://site/a", "https://site/x"], None),
            None
        );
        assert_eq!(builder.tree().len(), before);
    }

    #[test]
    fn test_overlapping_sections_first_wins() {
        let mut builder = builder();
        let first = builder
            .new_section("First", ["https://site/a", "https://site/b"], None)
            .unwrap();
        let second = builder
            .new_section("Second", ["https://site/b", "https://site/c"], None)
            .unwrap();

        assert_eq!(builder.tree().children(first).len(), 2);
        assert_eq!(builder.tree().children(second).len(), 1);
        assert_eq!(
            builder.links().get("https://site/b"),
            Some(builder.tree().children(first)[1])
        );
    }

    #[test]
    fn test_nested_sections() {
        let mut builder = builder();
        let outer = builder.add_page("Part I", section_header("Part I"), None);
        let inner = builder
            .new_section("Chapter 1", ["https://site/c"], Some(outer))
            .unwrap();

        assert_eq!(builder.tree().roots(), &[outer]);
        assert_eq!(builder.tree().children(outer), &[inner]);
    }
}
