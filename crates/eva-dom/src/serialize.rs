//! HTML serialization
//!
//! Deterministic output: attributes keep insertion order and render roots
//! print as `<#render-root>` so snapshots of a host include what it rendered.

use crate::{DomTree, NodeData, NodeId};

/// Serialize the children of `id`
pub fn inner_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    for child in tree.children(id) {
        write_node(tree, child, &mut out);
    }
    out
}

/// Serialize `id` itself, including its render root
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else { return };
    match &node.data {
        NodeData::Text(text) => escape_into(text, false, out),
        NodeData::Element(elem) => {
            out.push('<');
            out.push_str(&elem.tag);
            for attr in &elem.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                if !attr.value.is_empty() {
                    out.push_str("=\"");
                    escape_into(&attr.value, true, out);
                    out.push('"');
                }
            }
            out.push('>');
            if let Some(root) = tree.render_root(id) {
                out.push_str("<#render-root>");
                out.push_str(&inner_html(tree, root));
                out.push_str("</#render-root>");
            }
            out.push_str(&inner_html(tree, id));
            out.push_str("</");
            out.push_str(&elem.tag);
            out.push('>');
        }
        NodeData::RenderRoot { .. } | NodeData::Document => out.push_str(&inner_html(tree, id)),
        NodeData::Vacant => {}
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
