//! Node record extraction.
//!
//! Builds the canonical one-line text record for a single UI node. The exact
//! serialization matters: the record string doubles as the deduplication key,
//! so semantically identical nodes seen across repeated events must render to
//! the same bytes.

use crate::types::UiNode;

/// Build the record line for `node` at the given traversal depth.
///
/// Field order is fixed: indentation, `NODE` marker, optional `[id=...]`,
/// optional `[class=...]`, mandatory `[bounds=[L,T,R,B]]`, optional
/// `text:'...'`, optional `desc:'...'`. Absent optional fields are omitted
/// entirely. A failing identifier lookup is treated as "identifier
/// unavailable", never propagated.
pub fn extract(node: &dyn UiNode, depth: usize) -> String {
    let mut line = String::with_capacity(48 + depth * 2);
    for _ in 0..depth {
        line.push_str("  ");
    }
    line.push_str("NODE ");

    if let Some(id) = node.view_id().ok().flatten() {
        line.push_str(&format!("[id={}] ", id));
    }
    if let Some(class) = node.class_name() {
        line.push_str(&format!("[class={}] ", class));
    }
    line.push_str(&format!("[bounds={}] ", node.bounds()));
    if let Some(text) = node.text().filter(|t| !t.is_empty()) {
        line.push_str(&format!(" text:'{}'", text));
    }
    if let Some(desc) = node.description().filter(|d| !d.is_empty()) {
        line.push_str(&format!(" desc:'{}'", desc));
    }

    line
}
