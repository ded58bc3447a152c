//! Section aggregation
//!
//! Folds the flat event list of the structure walker into section records
//! and optionally rolls descendant word counts up the hierarchy.

use serde::{Deserialize, Serialize};

use crate::classify::StructureEvent;

/// A section with its own word count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section title, empty if the section has none
    pub title: String,
    /// Words directly in this section (the whole document for the first record)
    pub words: usize,
    /// Nesting level, 0 for the document element
    pub level: usize,
    /// Element name (`chapter`, `section`, ...)
    pub tag: String,
    /// Words of the descendant sections, see [`sum_sections`]
    #[serde(
        rename = "subtreeWords",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub subtree_words: Option<usize>,
}

impl Section {
    /// Create a section record without rollup
    pub fn new(title: impl Into<String>, words: usize, level: usize, tag: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            words,
            level,
            tag: tag.into(),
            subtree_words: None,
        }
    }
}

/// Compute per-section word counts from classification events.
///
/// Content words are attributed to the most recently opened section. The
/// first record's count is then replaced by the total of the whole
/// document, since root-level content belongs to the implicit top section.
pub fn aggregate(events: &[StructureEvent]) -> Vec<Section> {
    let Some((first, rest)) = events.split_first() else {
        return Vec::new();
    };

    let mut sections = Vec::new();
    let mut current = match first {
        StructureEvent::Section { title, tag, .. } => Section::new(title.clone(), 0, 0, tag.clone()),
        StructureEvent::Content { .. } => Section::new("", 0, 0, ""),
    };
    let mut total = match first {
        StructureEvent::Content { words, .. } => *words,
        StructureEvent::Section { .. } => 0,
    };
    current.words = total;

    for event in rest {
        match event {
            StructureEvent::Content { words, .. } => {
                total += words;
                current.words += words;
            }
            StructureEvent::Section { level, title, tag } => {
                let next = Section::new(title.clone(), 0, *level, tag.clone());
                sections.push(std::mem::replace(&mut current, next));
            }
        }
    }
    sections.push(current);

    sections[0].words = total;
    sections
}

/// Roll up the word counts of descendant sections.
///
/// For every section at `level <= max_depth`, `subtree_words` becomes the
/// sum of `words` over the following sections whose level lies in
/// `(level, max_depth]`, scanning until the next section at the same or a
/// shallower level. Deeper sections, and sections without descendants in
/// range, get 0.
pub fn sum_sections(sections: &mut [Section], max_depth: usize) {
    for i in 0..sections.len() {
        let level = sections[i].level;
        let sum = if level > max_depth {
            0
        } else {
            sections[i + 1..]
                .iter()
                .take_while(|s| s.level > level)
                .filter(|s| s.level <= max_depth)
                .map(|s| s.words)
                .sum()
        };
        sections[i].subtree_words = Some(sum);
    }
}
