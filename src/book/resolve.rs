//! Resolution: replace placeholder pages with transformed page content.

use rayon::prelude::*;

use super::links::LinkContext;
use super::observer::BuildObserver;
use super::tree::{PageTree, Uid};
use crate::error::Result;
use crate::source::PageSource;
use crate::transform::{Transformer, WikidotTransformer};

/// Fetches and transforms the page behind every placeholder of a tree.
///
/// A node is a placeholder when its title is still a URL known to the link
/// context. Section headers and literal pages never match, and neither do
/// placeholders that have already been resolved, since their title is then
/// the page's real title.
#[derive(Debug, Clone)]
pub struct Resolver<T = WikidotTransformer> {
    transformer: T,
    site: String,
}

impl Resolver<WikidotTransformer> {
    /// Resolver using the standard wikidot rules for pages of `site`
    /// (e.g. `http://www.scp-wiki.net`).
    pub fn new(site: impl Into<String>) -> Self {
        Self::with_transformer(site, WikidotTransformer)
    }
}

impl<T: Transformer> Resolver<T> {
    pub fn with_transformer(site: impl Into<String>, transformer: T) -> Self {
        Self {
            transformer,
            site: site.into(),
        }
    }

    /// Site origin prefixed to relative links.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Resolve placeholders in document order, returning the new tree.
    ///
    /// The first fetch failure is returned as is; nothing is retried.
    pub fn resolve<S: PageSource>(
        &self,
        tree: &PageTree,
        links: &LinkContext,
        source: &S,
        observer: &dyn BuildObserver,
    ) -> Result<PageTree> {
        let pending = placeholders(tree, links);
        observer.resolve_started(pending.len());

        let mut resolved = tree.clone();
        for (uid, url) in pending {
            let (title, content) = self.resolve_one(&url, links, source)?;
            observer.page_resolved(uid, &url, &title);
            overwrite(&mut resolved, uid, title, content);
        }
        Ok(resolved)
    }

    /// Like [`resolve`](Self::resolve), but fetches and transforms pages on
    /// the rayon thread pool.
    ///
    /// Pages only depend on their own URL and the (read-only) link context,
    /// so they are processed independently and merged back by uid once all
    /// of them are done. Which failure is reported when several pages fail
    /// is unspecified.
    pub fn resolve_parallel<S>(
        &self,
        tree: &PageTree,
        links: &LinkContext,
        source: &S,
        observer: &dyn BuildObserver,
    ) -> Result<PageTree>
    where
        S: PageSource + Sync,
        T: Sync,
    {
        let pending = placeholders(tree, links);
        observer.resolve_started(pending.len());

        let pages = pending
            .into_par_iter()
            .map(|(uid, url)| {
                let (title, content) = self.resolve_one(&url, links, source)?;
                Ok((uid, url, title, content))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut resolved = tree.clone();
        for (uid, url, title, content) in pages {
            observer.page_resolved(uid, &url, &title);
            overwrite(&mut resolved, uid, title, content);
        }
        Ok(resolved)
    }

    fn resolve_one<S: PageSource>(
        &self,
        url: &str,
        links: &LinkContext,
        source: &S,
    ) -> Result<(String, String)> {
        let page = source.fetch(url)?;
        let content = self
            .transformer
            .transform(&page.html, &page.title, &self.site, links);
        Ok((page.title, content))
    }
}

/// Unresolved placeholders with their URLs, in document order.
fn placeholders(tree: &PageTree, links: &LinkContext) -> Vec<(Uid, String)> {
    tree.iter()
        .filter(|node| links.contains_url(&node.title))
        .map(|node| (node.uid, node.title.clone()))
        .collect()
}

fn overwrite(tree: &mut PageTree, uid: Uid, title: String, content: String) {
    if let Some(node) = tree.node_mut(uid) {
        node.title = title;
        node.content = content;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::book::BookBuilder;
    use crate::error::Error;
    use crate::source::Page;
    use crate::transform::transform_page;

    const SITE: &str = "https://site";

    fn pages() -> HashMap<String, Page> {
        let mut pages = HashMap::new();
        pages.insert(
            "https://site/a".to_string(),
            Page::new(
                "https://site/a",
                "Alpha",
                r#"<div id="page-content"><p>See <a href="/b">B</a>.</p></div>"#,
            ),
        );
        pages.insert(
            "https://site/b".to_string(),
            Page::new(
                "https://site/b",
                "Beta",
                r#"<div id="page-content"><p>Back to <a href="/a">A</a> or <a href="/c">C</a>.</p></div>"#,
            ),
        );
        pages
    }

    fn assembled() -> BookBuilder {
        let mut builder = BookBuilder::new(["https://site/a", "https://site/b"]);
        builder.new_section("Intro", ["https://site/a", "https://site/b"], None);
        builder
    }

    #[test]
    fn test_resolve_matches_direct_transform() {
        let builder = assembled();
        let source = pages();
        let resolved = Resolver::new(SITE)
            .resolve(builder.tree(), builder.links(), &source, &())
            .unwrap();

        for (url, uid) in builder.links().iter() {
            let page = &source[url];
            let node = resolved.node(uid).unwrap();
            assert_eq!(node.title, page.title);
            assert_eq!(
                node.content,
                transform_page(&page.html, &page.title, SITE, builder.links())
            );
        }
    }

    #[test]
    fn test_resolve_rewrites_cross_links() {
        let builder = assembled();
        let resolved = Resolver::new(SITE)
            .resolve(builder.tree(), builder.links(), &pages(), &())
            .unwrap();

        let beta = resolved.node(Uid(2)).unwrap();
        assert!(beta.content.contains(r#"<a href="1.xhtml">A</a>"#));
        assert!(beta.content.contains(r#"<span class="link">C</span>"#));
    }

    #[test]
    fn test_resolve_leaves_headers_and_input_alone() {
        let builder = assembled();
        let resolved = Resolver::new(SITE)
            .resolve(builder.tree(), builder.links(), &pages(), &())
            .unwrap();

        assert_eq!(resolved.node(Uid(0)), builder.tree().node(Uid(0)));
        assert_eq!(builder.tree().node(Uid(1)).unwrap().title, "https://site/a");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let builder = assembled();
        let resolver = Resolver::new(SITE);
        let once = resolver
            .resolve(builder.tree(), builder.links(), &pages(), &())
            .unwrap();
        let twice = resolver
            .resolve(&once, builder.links(), &pages(), &())
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let builder = assembled();
        let mut source = pages();
        source.remove("https://site/b");

        let result = Resolver::new(SITE).resolve(builder.tree(), builder.links(), &source, &());
        assert!(matches!(result, Err(Error::PageNotFound(url)) if url == "https://site/b"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let builder = assembled();
        let resolver = Resolver::new(SITE);
        let sequential = resolver
            .resolve(builder.tree(), builder.links(), &pages(), &())
            .unwrap();
        let parallel = resolver
            .resolve_parallel(builder.tree(), builder.links(), &pages(), &())
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_custom_transformer() {
        struct Raw;
        impl Transformer for Raw {
            fn transform(&self, raw: &str, _: &str, _: &str, _: &LinkContext) -> String {
                raw.to_string()
            }
        }

        let builder = assembled();
        let source = pages();
        let resolver = Resolver::with_transformer(SITE, Raw);
        assert_eq!(resolver.site(), SITE);
        let resolved = resolver
            .resolve(builder.tree(), builder.links(), &source, &())
            .unwrap();
        assert_eq!(resolved.node(Uid(1)).unwrap().content, source["https://site/a"].html);
    }
}
