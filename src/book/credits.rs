//! Attribution pages derived from the book's structure.

use super::builder::{BookBuilder, section_header};
use super::observer::BuildObserver;
use super::tree::Uid;
use crate::error::Result;
use crate::source::{Page, PageSource};
use crate::util::escape_xml;

/// Default title of the credits section.
pub const CREDITS_TITLE: &str = "Acknowledgments and Attributions";

/// Title of the subsection collecting pages placed before any section.
pub const UNSECTIONED_TITLE: &str = "Miscellaneous";

/// Builds the credits section: one page per book section, listing the
/// authors of the pages in it.
///
/// Credits only need the structure of the book, so they can be added before
/// or after the placeholders are resolved. Page metadata is fetched from the
/// same source the resolver uses.
#[derive(Debug, Clone)]
pub struct CreditsBuilder {
    title: String,
}

impl Default for CreditsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreditsBuilder {
    pub fn new() -> Self {
        Self {
            title: CREDITS_TITLE.to_string(),
        }
    }

    /// Use a different title for the credits section.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Append the credits section to `builder` and return its header.
    ///
    /// Walking the book in document order, every page with children that is
    /// not a URL page opens a new subsection; each URL page whose author is
    /// known adds one attribution line to the current subsection.
    /// Subsections without lines are dropped.
    pub fn build<S: PageSource>(
        &self,
        builder: &mut BookBuilder,
        source: &S,
        observer: &dyn BuildObserver,
    ) -> Result<Uid> {
        log::info!("Constructing credits.");
        let header = builder.add_page(self.title.as_str(), section_header(&self.title), None);

        let mut subsections: Vec<(String, String)> = Vec::new();
        let mut lines = 0;
        for uid in builder.tree().flatten() {
            let Some(node) = builder.tree().node(uid) else {
                continue;
            };
            let links = builder.links();

            if !links.is_placeholder(uid) {
                if !node.children.is_empty() {
                    subsections.push((node.title.clone(), String::new()));
                }
                continue;
            }

            let Some(url) = links.url_of(uid) else {
                continue;
            };
            let page = source.fetch(url)?;
            let Some(line) = credit_line(uid, &page) else {
                continue;
            };

            if subsections.is_empty() {
                subsections.push((UNSECTIONED_TITLE.to_string(), String::new()));
            }
            if let Some((_, content)) = subsections.last_mut() {
                content.push_str(&line);
                lines += 1;
            }
        }

        let mut sections = 0;
        for (title, content) in subsections.into_iter().filter(|(_, c)| !c.is_empty()) {
            builder.add_page(
                title,
                format!("<div class=\"attrib\">{content}</div>"),
                Some(header),
            );
            sections += 1;
        }

        observer.credits_built(sections, lines);
        Ok(header)
    }
}

/// Attribution paragraph for one page, or `None` if its author is unknown.
pub fn credit_line(uid: Uid, page: &Page) -> Option<String> {
    let author = page.author.as_deref().filter(|a| !a.is_empty())?;

    let mut source = format!(
        "<b><a href=\"{uid}.xhtml\">{}</a></b> ({}) was written by <b>{}</b>.",
        escape_xml(&page.title),
        escape_xml(&page.url),
        escape_xml(author)
    );
    if let Some(rewrite) = page.rewrite_author.as_deref().filter(|a| !a.is_empty()) {
        source.push_str(&format!(", rewritten by <b>{}</b>.", escape_xml(rewrite)));
    }
    Some(format!("<p>{source}</p>"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn source() -> HashMap<String, Page> {
        [
            Page::new("https://site/a", "Alpha", "").with_author("Alice"),
            Page::new("https://site/b", "Beta", ""),
            Page::new("https://site/c", "Gamma", "")
                .with_author("Carol")
                .with_rewrite_author("Dave"),
            Page::new("https://site/d", "Delta", ""),
        ]
        .into_iter()
        .map(|p| (p.url.clone(), p))
        .collect()
    }

    #[test]
    fn test_credit_line_without_rewrite() {
        let page = Page::new("https://site/a", "Alpha", "").with_author("Alice");
        let line = credit_line(Uid(3), &page).unwrap();
        assert_eq!(
            line,
            "<p><b><a href=\"3.xhtml\">Alpha</a></b> (https://site/a) was written by <b>Alice</b>.</p>"
        );
        assert!(!line.contains("rewritten"));
    }

    #[test]
    fn test_credit_line_with_rewrite() {
        let page = Page::new("u", "T", "")
            .with_author("Carol")
            .with_rewrite_author("Dave");
        assert!(
            credit_line(Uid(0), &page)
                .unwrap()
                .ends_with("was written by <b>Carol</b>., rewritten by <b>Dave</b>.</p>")
        );
    }

    #[test]
    fn test_credit_line_without_author() {
        let page = Page::new("u", "T", "");
        assert_eq!(credit_line(Uid(0), &page), None);
    }

    #[test]
    fn test_credits_grouped_by_section() {
        let mut builder = BookBuilder::new(source().into_keys());
        builder.new_section("First", ["https://site/a", "https://site/b"], None);
        builder.new_section("Second", ["https://site/c"], None);
        builder.new_section("Third", ["https://site/d"], None);

        let header = CreditsBuilder::new()
            .build(&mut builder, &source(), &())
            .unwrap();

        let tree = builder.tree();
        assert_eq!(tree.node(header).unwrap().title, CREDITS_TITLE);
        let sections: Vec<_> = tree
            .children(header)
            .iter()
            .map(|&uid| tree.node(uid).unwrap())
            .collect();
        let titles: Vec<_> = sections.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);

        assert!(sections[0].content.starts_with("<div class=\"attrib\"><p>"));
        assert_eq!(sections[0].content.matches("<p>").count(), 1);
        assert!(sections[0].content.contains("written by <b>Alice</b>.</p>"));
        assert!(sections[1].content.contains("rewritten by <b>Dave</b>."));
    }

    #[test]
    fn test_nested_sections_start_new_subsections() {
        let mut builder = BookBuilder::new(source().into_keys());
        let part = builder
            .new_section("Part", ["https://site/a"], None)
            .unwrap();
        builder.new_section("Chapter", ["https://site/c"], Some(part));

        let header = CreditsBuilder::new()
            .build(&mut builder, &source(), &())
            .unwrap();

        let tree = builder.tree();
        let titles: Vec<_> = tree
            .children(header)
            .iter()
            .map(|&uid| tree.node(uid).unwrap().title.as_str())
            .collect();
        assert_eq!(titles, vec!["Part", "Chapter"]);
    }

    #[test]
    fn test_unsectioned_pages_are_collected() {
        let mut builder = BookBuilder::new(source().into_keys());
        builder.add_url("https://site/a", None);

        let header = CreditsBuilder::new()
            .with_title("Credits")
            .build(&mut builder, &source(), &())
            .unwrap();

        let tree = builder.tree();
        assert_eq!(tree.node(header).unwrap().title, "Credits");
        let child = tree.children(header)[0];
        assert_eq!(tree.node(child).unwrap().title, UNSECTIONED_TITLE);
    }
}
