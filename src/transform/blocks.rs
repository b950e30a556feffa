//! Block-level wikidot widgets: tab views, collapsible blocks, quotes.

use crate::dom::{ArenaDom, ArenaNodeId};

use super::titled_paragraph;

/// Flatten `yui-navset` tab views.
///
/// ```html
/// <div class="yui-navset">
///   <ul class="yui-nav"><li><a><em>One</em></a></li>...</ul>
///   <div class="yui-content"><div>first</div>...</div>
/// </div>
/// ```
///
/// becomes
///
/// ```html
/// <div class="tabview">
///   <div class="tabview-tab"><p class="tab-title">One</p>first</div>...
/// </div>
/// ```
///
/// Titles and bodies pair by position; surplus bodies keep no title and
/// surplus titles are dropped.
pub fn flatten_tabs(dom: &mut ArenaDom, region: ArenaNodeId) {
    for view in dom.select(region, |d, id| d.has_class(id, "yui-navset")) {
        let Some(nav) = dom.find_within(view, |d, id| d.has_class(id, "yui-nav")) else {
            log::debug!("tab view without navigation, left as is");
            continue;
        };

        let titles: Vec<String> = dom
            .select(nav, |d, id| d.is_tag(id, "em"))
            .into_iter()
            .map(|em| dom.text_of(em))
            .collect();

        dom.set_class(view, "tabview");
        dom.detach(nav);
        if let Some(wrapper) = dom.find_within(view, |d, id| d.is_tag(id, "div")) {
            dom.unwrap(wrapper);
        }

        let tabs: Vec<_> = dom
            .children(view)
            .filter(|&id| dom.is_tag(id, "div"))
            .collect();
        for (tab, title) in tabs.into_iter().zip(titles) {
            dom.set_class(tab, "tabview-tab");
            let heading = titled_paragraph(dom, "tab-title", &title);
            dom.prepend(tab, heading);
        }
    }
}

/// Rebuild `collapsible-block`s as a title paragraph followed by the
/// folded content, dropping the fold/unfold link pair.
pub fn rebuild_collapsibles(dom: &mut ArenaDom, region: ArenaNodeId) {
    for block in dom.select(region, |d, id| d.has_class(id, "collapsible-block")) {
        let link = dom.find_within(block, |d, id| d.has_class(id, "collapsible-block-link"));
        let body = dom.find_within(block, |d, id| d.has_class(id, "collapsible-block-content"));
        let (Some(link), Some(body)) = (link, body) else {
            log::debug!("collapsible block without link or content, left as is");
            continue;
        };

        let title = dom.text_of(link);
        let contents: Vec<_> = dom.children(body).collect();

        dom.set_class(block, "collapsible");
        dom.clear_children(block);
        let heading = titled_paragraph(dom, "collapsible-title", &title);
        dom.append(block, heading);
        for child in contents {
            dom.append(block, child);
        }
    }
}

/// `<blockquote>` becomes `<div class="quote">` with the same children.
pub fn retype_quotes(dom: &mut ArenaDom, region: ArenaNodeId) {
    for quote in dom.select(region, |d, id| d.is_tag(id, "blockquote")) {
        dom.rename(quote, "div");
        dom.set_class(quote, "quote");
    }
}
