//! Link rewriting against the book's URL map.

use crate::book::LinkContext;
use crate::dom::{ArenaDom, ArenaNodeId};

/// Point links to pages in the book at their `<uid>.xhtml` file; turn every
/// other link into an inert `<span class="link">`. Anchors without `href`
/// (named targets) are left alone.
pub fn rewrite_links(dom: &mut ArenaDom, region: ArenaNodeId, site: &str, links: &LinkContext) {
    for anchor in dom.select(region, |d, id| d.is_tag(id, "a")) {
        let Some(href) = dom.get_attr(anchor, "href") else {
            continue;
        };
        let url = absolutize(href, site);

        match links.get(&url) {
            Some(uid) => dom.set_attr(anchor, "href", &format!("{uid}.xhtml")),
            None => {
                dom.rename(anchor, "span");
                dom.set_class(anchor, "link");
            }
        }
    }
}

/// Prefix `href` with the site origin unless it already starts with it.
fn absolutize(href: &str, site: &str) -> String {
    if href.starts_with(site) {
        href.to_string()
    } else {
        format!("{site}{href}")
    }
}
