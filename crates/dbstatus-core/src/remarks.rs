//! Remark extraction
//!
//! Remarks are editorial annotations (`<remark>` elements). A remark may
//! start with an uppercase keyword such as `FIXME` or `TODO`, which is split
//! off so remarks can be grouped and filtered.

use std::sync::OnceLock;

use dbstatus_dom::{Document, NodeId};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tags::TagSets;

/// Keyword used when a remark does not start with one
pub const DEFAULT_KEYWORD: &str = "REMARK";

/// Text used for remarks without any content
pub const EMPTY_REMARK: &str = "[empty remark]";

/// A remark found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remark {
    /// Leading uppercase keyword, or [`DEFAULT_KEYWORD`]
    pub keyword: String,
    /// Remark text without the keyword
    pub text: String,
    /// File the remark was found in, as referenced by the including document
    pub file: String,
    /// Source line of the remark element
    pub line: usize,
    /// Locator of the remark element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Locator of the enclosing element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Leading run of uppercase letters, ended by whitespace, punctuation or the end
fn keyword_pattern() -> &'static Regex {
    static KEYWORD_RE: OnceLock<Regex> = OnceLock::new();
    KEYWORD_RE.get_or_init(|| {
        Regex::new(r"^(\p{Lu}+)(?:[\s\p{P}\p{S}]|$)").expect("keyword pattern is valid")
    })
}

/// Split a remark's trimmed content into keyword and text.
///
/// `starts_with_text` tells whether the remark element's first child is a
/// text node; otherwise no keyword is looked for.
pub fn split_keyword(content: &str, starts_with_text: bool) -> (String, String) {
    let content = content.trim();
    let (keyword, text) = match keyword_pattern()
        .captures(content)
        .filter(|_| starts_with_text)
    {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            (
                caps[1].to_uppercase(),
                content[whole..].trim_start().to_string(),
            )
        }
        None => (DEFAULT_KEYWORD.to_string(), content.to_string()),
    };

    if text.is_empty() {
        (keyword, EMPTY_REMARK.to_string())
    } else {
        (keyword, text)
    }
}

/// Build the record for a single remark element
pub fn remark_from_node(doc: &Document, node: NodeId, file: &str) -> Remark {
    let starts_with_text = doc.first_child(node).is_some_and(|c| doc.is_text(c));
    let (keyword, text) = split_keyword(&doc.text_content(node), starts_with_text);
    Remark {
        keyword,
        text,
        file: file.to_string(),
        line: doc.line(node),
        path: Some(doc.path(node)),
        parent: doc.parent(node).map(|p| doc.path(p)),
    }
}

/// Find all remarks of a document in document order
pub fn find_remarks_in_document(doc: &Document, file: &str, tags: &TagSets) -> Vec<Remark> {
    let root = doc.root();
    std::iter::once(root)
        .chain(doc.descendants(root))
        .filter(|id| doc.name(*id).is_some_and(|name| tags.is_remark(name)))
        .map(|id| remark_from_node(doc, id, file))
        .collect()
}

/// Keep only remarks with one of the given keywords.
///
/// Keywords compare case-insensitively. The result is grouped by filter
/// keyword, in filter order, keeping document order within each group. An
/// empty filter keeps everything.
pub fn filter_remarks<S: AsRef<str>>(remarks: Vec<Remark>, keywords: &[S]) -> Vec<Remark> {
    if keywords.is_empty() {
        return remarks;
    }
    keywords
        .iter()
        .flat_map(|keyword| {
            let wanted = keyword.as_ref().to_uppercase();
            remarks
                .iter()
                .filter(move |r| r.keyword.to_uppercase() == wanted)
                .cloned()
        })
        .collect()
}
