//! HTML parsing into an arena DOM, and serialization back out.

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute};
pub use serialize::{serialize_children, serialize_node};

use html5ever::driver::ParseOpts;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Parse an HTML document (or fragment) into an [`ArenaDom`].
///
/// Parsing never fails: like a browser, html5ever recovers from malformed
/// markup, so whatever the page source returns yields some tree.
pub fn parse_document(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    html5ever::parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
