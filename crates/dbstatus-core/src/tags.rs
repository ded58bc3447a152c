//! Element names that drive classification
//!
//! The defaults follow the DocBook 5 root and division elements listed in
//! <http://docbook.org/tdg5/en/html/ch02.html#roots>, minus the
//! `refsect...` family.

use std::collections::BTreeSet;

/// Elements whose text is counted as prose. `formalpara` is covered
/// implicitly through its `para` child.
pub const CONTENT_TAGS: &[&str] = &["para", "simpara"];

/// Elements that open a titled subdivision
pub const SECTION_TAGS: &[&str] = &[
    "acknowledgements",
    "appendix",
    "article",
    "bibliography",
    "book",
    "chapter",
    "colophon",
    "dedication",
    "glossary",
    "index",
    "part",
    "preface",
    "section",
    "sect1",
    "sect2",
    "sect3",
    "sect4",
    "set",
    "simplesect",
    "toc",
];

/// Editorial annotation element
pub const REMARK_TAG: &str = "remark";

/// Immutable set of element names used by the analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSets {
    content: BTreeSet<String>,
    sections: BTreeSet<String>,
    remark: String,
}

impl Default for TagSets {
    fn default() -> Self {
        Self::new(
            CONTENT_TAGS.iter().copied(),
            SECTION_TAGS.iter().copied(),
            REMARK_TAG,
        )
    }
}

impl TagSets {
    /// Create tag sets from explicit element names
    pub fn new<C, S>(content: C, sections: S, remark: impl Into<String>) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            content: content.into_iter().map(Into::into).collect(),
            sections: sections.into_iter().map(Into::into).collect(),
            remark: remark.into(),
        }
    }

    /// Is `name` a prose element?
    pub fn is_content(&self, name: &str) -> bool {
        self.content.contains(name)
    }

    /// Is `name` a section-like element?
    pub fn is_section(&self, name: &str) -> bool {
        self.sections.contains(name)
    }

    /// Is `name` the annotation element?
    pub fn is_remark(&self, name: &str) -> bool {
        self.remark == name
    }

    /// Name of the annotation element
    pub fn remark(&self) -> &str {
        &self.remark
    }
}
