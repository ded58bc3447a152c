//! Structure walker
//!
//! Walks a node tree and produces a flat, document-ordered list of
//! [`StructureEvent`]s: one per content element (with its word count) and
//! one per section element (with its title and nesting level).

use dbstatus_dom::{Document, NodeId};

use crate::tags::TagSets;
use crate::words::count_content_words;

/// One classified element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureEvent {
    /// A prose element
    Content { level: usize, words: usize },
    /// A section-like element
    Section {
        level: usize,
        title: String,
        tag: String,
    },
}

impl StructureEvent {
    /// Nesting level of the element
    pub fn level(&self) -> usize {
        match self {
            StructureEvent::Content { level, .. } | StructureEvent::Section { level, .. } => *level,
        }
    }
}

/// Classifies elements into sections and content blocks
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    tags: TagSets,
}

impl Classifier {
    /// Create a classifier for the given element names
    pub fn new(tags: TagSets) -> Self {
        Self { tags }
    }

    /// Element names used by this classifier
    pub fn tags(&self) -> &TagSets {
        &self.tags
    }

    /// Classify a whole document.
    ///
    /// The root element always opens the top section at level 0, even when
    /// its name is not a section tag, so that every report has a first
    /// record carrying the document total.
    pub fn classify_document(&self, doc: &Document) -> Vec<StructureEvent> {
        let root = doc.root();
        let mut events = vec![StructureEvent::Section {
            level: 0,
            title: section_title(doc, root),
            tag: doc.name(root).unwrap_or_default().to_string(),
        }];
        for &child in doc.children(root) {
            self.walk(doc, child, 1, &mut events);
        }
        events
    }

    /// Classify the subtree rooted at `node`, starting at `level`
    pub fn classify(&self, doc: &Document, node: NodeId, level: usize) -> Vec<StructureEvent> {
        let mut events = Vec::new();
        self.walk(doc, node, level, &mut events);
        events
    }

    fn walk(&self, doc: &Document, node: NodeId, level: usize, events: &mut Vec<StructureEvent>) {
        // Children go on the stack in reverse so they pop in document order
        let mut pending = vec![(node, level)];
        while let Some((node, level)) = pending.pop() {
            let Some(name) = doc.name(node) else {
                continue;
            };

            if self.tags.is_content(name) {
                // Content elements are leaves; nested remarks are handled by the counter
                events.push(StructureEvent::Content {
                    level,
                    words: count_content_words(doc, node, &self.tags),
                });
                continue;
            }

            if self.tags.is_section(name) {
                events.push(StructureEvent::Section {
                    level,
                    title: section_title(doc, node),
                    tag: name.to_string(),
                });
            }

            pending.extend(doc.children(node).iter().rev().map(|&child| (child, level + 1)));
        }
    }
}

/// Find the title of a section: a direct `title` child, else a `title`
/// inside a direct `info` child, else the empty string.
pub fn section_title(doc: &Document, node: NodeId) -> String {
    let child_named = |parent: NodeId, name: &str| {
        doc.child_elements(parent)
            .find(|c| doc.name(*c) == Some(name))
    };

    child_named(node, "title")
        .or_else(|| child_named(node, "info").and_then(|info| child_named(info, "title")))
        .map(|title| doc.text_content(title))
        .unwrap_or_default()
}
