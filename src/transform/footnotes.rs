//! Footnote markers and definitions.

use crate::dom::{ArenaDom, ArenaNodeId};

/// `<sup class="footnoteref"><a ...>1</a></sup>` keeps only the label text.
pub fn unlink_markers(dom: &mut ArenaDom, region: ArenaNodeId) {
    let markers = dom.select(region, |d, id| {
        d.is_tag(id, "sup") && d.has_class(id, "footnoteref")
    });
    for marker in markers {
        let Some(link) = dom.find_within(marker, |d, id| d.is_tag(id, "a")) else {
            continue;
        };
        let label = dom.text_of(link);
        dom.set_text(marker, &label);
    }
}

/// Collapse each `footnote-footer` into `<div class="footnote">` holding
/// its trimmed text runs joined without separators.
pub fn flatten_footers(dom: &mut ArenaDom, region: ArenaNodeId) {
    for footer in dom.select(region, |d, id| d.has_class(id, "footnote-footer")) {
        let text = dom.stripped_strings(footer).concat();
        dom.set_class(footer, "footnote");
        dom.set_text(footer, &text);
    }
}
