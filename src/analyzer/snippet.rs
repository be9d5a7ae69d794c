//! Bounded, whitespace-normalised source excerpts

use crate::syntax::{render, NodeRef};

/// Longest snippet kept, in characters, before the ellipsis
pub const MAX_SNIPPET_CHARS: usize = 200;

const UNPRINTABLE: &str = "<unprintable>";

/// Excerpt for `node`.
///
/// Slices the original bytes when they are available and the span is valid,
/// otherwise re-renders the node. Never fails.
pub fn extract_snippet(node: NodeRef<'_>, source: Option<&[u8]>) -> String {
    let span = node.span();
    if let Some(bytes) = source {
        if span.start_byte < span.end_byte && span.end_byte <= bytes.len() {
            let raw = String::from_utf8_lossy(&bytes[span.start_byte..span.end_byte]);
            return normalize(&raw);
        }
    }

    match render(node) {
        Ok(text) => normalize(&text),
        Err(_) => UNPRINTABLE.to_string(),
    }
}

/// Collapse whitespace runs and truncate
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(MAX_SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &collapsed[..cut]),
        None => collapsed,
    }
}
