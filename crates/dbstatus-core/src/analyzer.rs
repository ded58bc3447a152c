//! Analysis entry points
//!
//! [`StatusAnalyzer`] ties the pieces together: it loads the primary
//! source, checks that it is DocBook 5, expands inclusions and produces the
//! section and remark reports. Nothing is cached between calls.

use std::path::{Path, PathBuf};

use dbstatus_dom::Document;
use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::error::{Result, StatusError};
use crate::namespace::{has_xinclude, is_docbook};
use crate::remarks::{filter_remarks, find_remarks_in_document, Remark};
use crate::sections::{aggregate, Section};
use crate::tags::TagSets;
use crate::xinclude::{expand_xincludes, resolve_xincludes, IncludeTarget, ParseMode};

/// File label for remarks of documents that were not read from a file
pub const IN_MEMORY_LABEL: &str = "-";

/// Analyzes DocBook 5 documents for structure, word counts and remarks
#[derive(Debug, Clone, Default)]
pub struct StatusAnalyzer {
    classifier: Classifier,
    source: Option<PathBuf>,
}

impl StatusAnalyzer {
    /// Create an analyzer for in-memory documents
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer for a source file
    pub fn for_file(source: impl Into<PathBuf>) -> Self {
        Self {
            classifier: Classifier::default(),
            source: Some(source.into()),
        }
    }

    /// Use different element names
    pub fn with_tags(mut self, tags: TagSets) -> Self {
        self.classifier = Classifier::new(tags);
        self
    }

    /// Element names in use
    pub fn tags(&self) -> &TagSets {
        self.classifier.tags()
    }

    /// The primary source file
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn require_source(&self) -> Result<&Path> {
        self.source.as_deref().ok_or(StatusError::NoSource)
    }

    /// Compute the section report of an already parsed document
    pub fn analyze_document(&self, doc: &Document) -> Vec<Section> {
        let events = self.classifier.classify_document(doc);
        debug!("Classified {} elements", events.len());
        aggregate(&events)
    }

    /// Load the primary source as a DocBook 5 document with inclusions expanded
    pub fn load(&self) -> Result<Document> {
        let source = self.require_source()?;
        let mut doc = Document::from_file(source)?;
        if !is_docbook(&doc) {
            return Err(StatusError::NotDocBook {
                path: source.to_path_buf(),
            });
        }
        if has_xinclude(&doc) {
            expand_xincludes(&mut doc)?;
        }
        Ok(doc)
    }

    /// Compute the section report of the primary source
    pub fn analyze_file(&self) -> Result<Vec<Section>> {
        let doc = self.load()?;
        Ok(self.analyze_document(&doc))
    }

    /// All inclusion targets of the primary source, flattened
    pub fn includes(&self) -> Result<Vec<IncludeTarget>> {
        let doc = Document::from_file(self.require_source()?)?;
        resolve_xincludes(&doc)
    }

    /// Find the remarks of the primary source and every file it includes.
    ///
    /// The primary file comes first, followed by the included files in
    /// resolution order. A non-empty `keywords` list keeps only remarks
    /// with those keywords, grouped in keyword order.
    pub fn find_remarks<S: AsRef<str>>(&self, keywords: &[S]) -> Result<Vec<Remark>> {
        let source = self.require_source()?;
        let doc = Document::from_file(source)?;
        let label = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| source.display().to_string());
        self.collect_remarks(&doc, &label, keywords)
    }

    /// Find the remarks of an in-memory document and the files it includes
    pub fn find_remarks_in<S: AsRef<str>>(&self, doc: &Document, keywords: &[S]) -> Result<Vec<Remark>> {
        let label = doc
            .source()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| IN_MEMORY_LABEL.to_string());
        self.collect_remarks(doc, &label, keywords)
    }

    fn collect_remarks<S: AsRef<str>>(
        &self,
        doc: &Document,
        label: &str,
        keywords: &[S],
    ) -> Result<Vec<Remark>> {
        let tags = self.tags();
        let mut remarks = find_remarks_in_document(doc, label, tags);

        for target in resolve_xincludes(doc)? {
            let Some(path) = &target.path else {
                warn!("Skipping remarks of remote include {}", target.href);
                continue;
            };
            if target.parse == ParseMode::Text {
                continue;
            }
            let included = Document::from_file(path)?;
            remarks.extend(find_remarks_in_document(&included, &target.href, tags));
        }

        debug!("Found {} remarks", remarks.len());
        Ok(filter_remarks(remarks, keywords))
    }
}
