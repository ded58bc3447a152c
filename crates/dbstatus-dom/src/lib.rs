//! dbstatus-dom - Line-aware XML node tree
//!
//! This crate parses XML into a navigable tree: element names,
//! resolved namespaces, attributes, text content, source line numbers,
//! parent links and XPath-like path locators.
//!
//! # Example
//!
//! ```
//! use dbstatus_dom::Document;
//!
//! let doc = Document::parse_str(
//!     r#"<article xmlns="http://docbook.org/ns/docbook"><para>Hi</para></article>"#,
//! )
//! .unwrap();
//! let para = doc.child_elements(doc.root()).next().unwrap();
//! assert_eq!(doc.name(para), Some("para"));
//! assert_eq!(doc.text_content(para), "Hi");
//! ```

pub mod document;
pub mod error;
pub mod node;
mod parser;

pub use document::Document;
pub use error::{DomError, Result};
pub use node::{Attribute, Element, Namespace, NodeData, NodeId, NodeKind};
pub use parser::XML_NS;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
