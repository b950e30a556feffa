//! Arena DOM to XHTML-compatible markup.
//!
//! Void elements are self-closed (`<br/>`) and all text and attribute values
//! are escaped, so the output can be embedded directly in an XHTML page body.
//! Comments are dropped. SVG and MathML subtrees get the namespace
//! declarations an XML parser needs for them.

use std::fmt::Write;

use html5ever::{Namespace, ns};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId, Attribute};
use crate::util::escape_xml;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Serialize a node, including the node itself.
pub fn serialize_node(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    walk_node(dom, id, &ns!(html), &mut out);
    out
}

/// Serialize the children of a node, excluding the node itself.
pub fn serialize_children(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    for child in dom.children(id) {
        walk_node(dom, child, &ns!(html), &mut out);
    }
    out
}

/// `parent_ns` is the default namespace in scope where `id` is written.
fn walk_node(dom: &ArenaDom, id: ArenaNodeId, parent_ns: &Namespace, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        ArenaNodeData::Document => {
            for child in dom.children(id) {
                walk_node(dom, child, parent_ns, out);
            }
        }
        ArenaNodeData::Text(text) => out.push_str(&escape_xml(text)),
        ArenaNodeData::Comment(_) | ArenaNodeData::Doctype { .. } => {}
        ArenaNodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            if name.ns != *parent_ns && !name.ns.is_empty() {
                let _ = write!(out, " xmlns=\"{}\"", escape_xml(&name.ns));
            }
            if attrs.iter().any(is_xlink) {
                let _ = write!(out, " xmlns:xlink=\"{XLINK_NS}\"");
            }
            for attr in attrs {
                let Some(attr_name) = attribute_name(attr) else {
                    continue;
                };
                let _ = write!(out, " {}=\"{}\"", attr_name, escape_xml(&attr.value));
            }

            if name.ns == ns!(html) && VOID_ELEMENTS.contains(&tag) {
                out.push_str("/>");
                return;
            }

            let scope = if name.ns.is_empty() { parent_ns } else { &name.ns };
            out.push('>');
            for child in dom.children(id) {
                walk_node(dom, child, scope, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

fn is_xlink(attr: &Attribute) -> bool {
    attr.name.prefix.as_deref() == Some("xlink")
}

/// Name to write for an attribute, or `None` to drop it.
///
/// Namespace declarations from the source are dropped: the serializer
/// writes its own. Of the prefixes html5ever assigns, only `xml` (always
/// bound) and `xlink` (declared on the element) are kept.
fn attribute_name(attr: &Attribute) -> Option<String> {
    let local = attr.name.local.as_ref();
    match attr.name.prefix.as_deref() {
        None if local == "xmlns" => None,
        None => Some(local.to_string()),
        Some(prefix @ ("xml" | "xlink")) => Some(format!("{prefix}:{local}")),
        Some(_) => None,
    }
}
