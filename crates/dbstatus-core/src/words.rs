//! Word counting
//!
//! A _word_ is a run of non-whitespace characters that contains at least
//! one word character (alphanumeric or `_`, in the Unicode sense). Lone
//! punctuation like `..` or `-` does not count.

use dbstatus_dom::{Document, NodeId};

use crate::tags::TagSets;

/// Count the words in a piece of text
pub fn count_text_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(|c| c.is_alphanumeric() || c == '_'))
        .count()
}

/// Count the words in the full text content of `node`
pub fn count_words(doc: &Document, node: NodeId) -> usize {
    count_text_words(&doc.text_content(node))
}

/// Count the prose words of a content element.
///
/// Everything inside `node` is counted except the text of annotation
/// elements, which are editorial comments and not meant for publication.
pub fn count_content_words(doc: &Document, node: NodeId, tags: &TagSets) -> usize {
    count_words(doc, node).saturating_sub(remark_words(doc, node, tags))
}

/// Words inside the outermost annotation elements below `node`
fn remark_words(doc: &Document, node: NodeId, tags: &TagSets) -> usize {
    let mut words = 0;
    let mut pending: Vec<NodeId> = doc.child_elements(node).collect();
    while let Some(next) = pending.pop() {
        match doc.name(next) {
            Some(name) if tags.is_remark(name) => words += count_words(doc, next),
            _ => pending.extend(doc.child_elements(next)),
        }
    }
    words
}
