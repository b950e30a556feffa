//! Wikidot page markup to portable ebook HTML.
//!
//! Each rule works on the page's content region (`#page-content`) of a
//! freshly parsed arena DOM. Rules never fail: when a sub-element a rule
//! expects is missing, that occurrence is left as it was.
//!
//! ## Pipeline Order
//!
//! 1. **Rating widgets** - Remove page-rating controls
//! 2. **Tabs** - Flatten tab views into titled tab bodies
//! 3. **Collapsibles** - Rebuild collapsible blocks as title + content
//! 4. **Footnote markers** - Drop the link around footnote numbers
//! 5. **Footnote footer** - Collapse footnote definitions to flat text
//! 6. **Quotes** - Retype blockquotes as quote containers
//! 7. **Links** - Point links at book pages, demote the rest to spans
//! 8. **Images** - Remove images
//! 9. **Title** - Insert the page title paragraph

mod blocks;
mod footnotes;
mod links;

use crate::book::LinkContext;
use crate::dom::{self, ArenaDom, ArenaNodeId};

/// Turns a fetched page into the HTML stored in a book node.
///
/// The default implementation is [`WikidotTransformer`]; the resolver takes
/// any implementation so callers can layer site-specific rules on top.
pub trait Transformer {
    /// Transform raw page markup into a page body fragment.
    fn transform(
        &self,
        raw_html: &str,
        page_title: &str,
        site_origin: &str,
        links: &LinkContext,
    ) -> String;
}

/// The fixed wikidot rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikidotTransformer;

impl Transformer for WikidotTransformer {
    fn transform(
        &self,
        raw_html: &str,
        page_title: &str,
        site_origin: &str,
        links: &LinkContext,
    ) -> String {
        transform_page(raw_html, page_title, site_origin, links)
    }
}

/// Run every rule over a page and serialize its content region.
///
/// # Example
///
/// ```
/// use wikibook::{LinkContext, transform_page};
///
/// let html = r#"<div id="page-content"><blockquote><p>Hi</p></blockquote></div>"#;
/// let out = transform_page(html, "Greeting", "https://example.wikidot.com", &LinkContext::new());
///
/// assert_eq!(
///     out,
///     r#"<div id="page-content"><p class="title">Greeting</p><div class="quote"><p>Hi</p></div></div>"#
/// );
/// ```
pub fn transform_page(
    raw_html: &str,
    page_title: &str,
    site_origin: &str,
    links: &LinkContext,
) -> String {
    let mut dom = dom::parse_document(raw_html);
    let region = content_region(&mut dom);

    strip_rating_widgets(&mut dom, region);
    blocks::flatten_tabs(&mut dom, region);
    blocks::rebuild_collapsibles(&mut dom, region);
    footnotes::unlink_markers(&mut dom, region);
    footnotes::flatten_footers(&mut dom, region);
    blocks::retype_quotes(&mut dom, region);
    links::rewrite_links(&mut dom, region, site_origin, links);
    strip_images(&mut dom, region);
    insert_title(&mut dom, region, page_title);

    dom::serialize_node(&dom, region)
}

/// Locate `#page-content`.
///
/// Pages saved without the wikidot chrome have no such element; their body
/// is moved into a new `<div id="page-content">` so the output shape is the
/// same either way.
fn content_region(dom: &mut ArenaDom) -> ArenaNodeId {
    if let Some(region) = dom.find_by_id("page-content") {
        return region;
    }

    log::debug!("page has no #page-content, using its body");
    let parent = dom.find_by_tag("body").unwrap_or(dom.document());
    let region = dom.create_html_element("div", "");
    dom.set_attrs(region, vec![dom::Attribute::new("id", "page-content")]);
    let children: Vec<_> = dom.children(parent).collect();
    for child in children {
        dom.append(region, child);
    }
    dom.append(parent, region);
    region
}

fn strip_rating_widgets(dom: &mut ArenaDom, region: ArenaNodeId) {
    for widget in dom.select(region, |d, id| d.has_class(id, "page-rate-widget-box")) {
        dom.detach(widget);
    }
}

fn strip_images(dom: &mut ArenaDom, region: ArenaNodeId) {
    for image in dom.select(region, |d, id| d.is_tag(id, "img")) {
        dom.detach(image);
    }
}

fn insert_title(dom: &mut ArenaDom, region: ArenaNodeId, page_title: &str) {
    let title = dom.create_html_element("p", "title");
    dom.append_text(title, page_title);
    dom.prepend(region, title);
}

/// Build `<p class="...">text</p>`, detached.
fn titled_paragraph(dom: &mut ArenaDom, class: &str, text: &str) -> ArenaNodeId {
    let p = dom.create_html_element("p", class);
    dom.append_text(p, text);
    p
}
