//! dbstatus-core - Writing progress analysis for DocBook 5
//!
//! Analyzes DocBook 5 documents for their structure (sections), text
//! length (words per section), inclusions (XInclude) and editorial
//! remarks.
//!
//! # Example
//!
//! ```
//! use dbstatus_core::{Section, StatusAnalyzer};
//! use dbstatus_dom::Document;
//!
//! let doc = Document::parse_str(
//!     r#"<article xmlns="http://docbook.org/ns/docbook">
//!          <title>A1</title>
//!          <section><title>S1</title><para>Three little words</para></section>
//!        </article>"#,
//! )
//! .unwrap();
//!
//! let sections = StatusAnalyzer::new().analyze_document(&doc);
//! assert_eq!(sections[0], Section::new("A1", 3, 0, "article"));
//! assert_eq!(sections[1], Section::new("S1", 3, 1, "section"));
//! ```

pub mod analyzer;
pub mod classify;
pub mod config;
pub mod error;
pub mod namespace;
pub mod remarks;
pub mod sections;
pub mod tags;
pub mod words;
pub mod xinclude;

// Re-export main types and functions
pub use analyzer::StatusAnalyzer;
pub use classify::{section_title, Classifier, StructureEvent};
pub use config::Settings;
pub use error::{Result, StatusError};
pub use namespace::{docbook_version, has_xinclude, is_docbook, DOCBOOK_NS, XINCLUDE_NS};
pub use remarks::{filter_remarks, find_remarks_in_document, Remark, DEFAULT_KEYWORD, EMPTY_REMARK};
pub use sections::{aggregate, sum_sections, Section};
pub use tags::TagSets;
pub use words::{count_content_words, count_text_words, count_words};
pub use xinclude::{expand_xincludes, find_xincludes, resolve_xincludes, IncludeTarget, ParseMode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
