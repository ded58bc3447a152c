//! XInclude discovery, resolution and expansion
//!
//! Inclusion directives are `xi:include` elements in the XInclude
//! namespace. Their `href` is either a local path (relative to the
//! including document) or a URL. URLs are reported but never fetched.
//!
//! # Example
//!
//! ```ignore
//! use dbstatus_core::xinclude::resolve_xincludes;
//! use dbstatus_dom::Document;
//!
//! let doc = Document::from_file("book.xml")?;
//! for target in resolve_xincludes(&doc)? {
//!     println!("{}", target.href);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use dbstatus_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, StatusError};
use crate::namespace::{has_xinclude, XINCLUDE_NS};

/// How the included resource is interpreted (`parse` attribute)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// The target is an XML document (default)
    #[default]
    Xml,
    /// The target is plain text
    Text,
}

impl ParseMode {
    fn of(doc: &Document, include: NodeId) -> Self {
        match doc.attribute(include, "parse") {
            Some("text") => ParseMode::Text,
            _ => ParseMode::Xml,
        }
    }
}

/// A resolved inclusion target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeTarget {
    /// The `href` as written in the including document
    pub href: String,
    /// Local file the target resolved to, `None` for remote targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// How the target is parsed
    #[serde(default)]
    pub parse: ParseMode,
}

impl IncludeTarget {
    /// Whether the target is a URL rather than a local file
    pub fn is_remote(&self) -> bool {
        self.path.is_none()
    }
}

/// Whether an href names a remote resource
pub fn is_remote_href(href: &str) -> bool {
    match href.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                && scheme != "file"
        }
        None => false,
    }
}

/// Resolve a local href: as given if it exists, else relative to `base_dir`
pub fn resolve_href(href: &str, base_dir: &Path) -> PathBuf {
    let href = href.strip_prefix("file://").unwrap_or(href);
    let as_given = Path::new(href);
    if as_given.exists() {
        as_given.to_path_buf()
    } else {
        base_dir.join(as_given)
    }
}

/// The `xi:include` elements of a document, in document order
fn include_elements(doc: &Document) -> Vec<NodeId> {
    doc.find_all(XINCLUDE_NS, "include")
}

/// The `href` values of all inclusion directives in the document.
///
/// Returns an empty list when the root element does not declare the
/// XInclude namespace.
pub fn find_xincludes(doc: &Document) -> Vec<String> {
    if !has_xinclude(doc) {
        return Vec::new();
    }
    include_elements(doc)
        .into_iter()
        .filter_map(|include| doc.attribute(include, "href").map(str::to_string))
        .collect()
}

/// Resolve all inclusions of `doc`, following local XML targets recursively.
///
/// The result lists the document's own targets first, followed by the
/// flattened results for each target in order. Relative targets resolve
/// against the directory of the including file (the current directory for
/// in-memory documents).
pub fn resolve_xincludes(doc: &Document) -> Result<Vec<IncludeTarget>> {
    let base = doc.base_dir().unwrap_or(Path::new("."));
    let mut chain = Vec::new();
    if let Some(source) = doc.source() {
        chain.push(canonical(source));
    }
    resolve_in(doc, base, &mut chain)
}

fn resolve_in(doc: &Document, base: &Path, chain: &mut Vec<PathBuf>) -> Result<Vec<IncludeTarget>> {
    if !has_xinclude(doc) {
        return Ok(Vec::new());
    }

    let direct: Vec<IncludeTarget> = include_elements(doc)
        .into_iter()
        .filter_map(|include| {
            let href = doc.attribute(include, "href")?.to_string();
            let path = (!is_remote_href(&href)).then(|| resolve_href(&href, base));
            Some(IncludeTarget {
                href,
                path,
                parse: ParseMode::of(doc, include),
            })
        })
        .collect();

    let mut targets = direct.clone();
    for target in &direct {
        let Some(path) = &target.path else {
            debug!("Not following remote include {}", target.href);
            continue;
        };
        if target.parse == ParseMode::Text {
            continue;
        }

        let key = canonical(path);
        if chain.contains(&key) {
            return Err(StatusError::IncludeCycle { path: path.clone() });
        }

        debug!("Resolving includes of {}", path.display());
        let included = Document::from_file(path)?;
        let included_base = included.base_dir().unwrap_or(Path::new(".")).to_path_buf();

        chain.push(key);
        targets.extend(resolve_in(&included, &included_base, chain)?);
        chain.pop();
    }

    Ok(targets)
}

/// Replace every inclusion directive in `doc` by the included content.
///
/// XML targets are expanded recursively and grafted in place of the
/// directive; `parse="text"` targets become text nodes. When a target
/// cannot be loaded, the children of an `xi:fallback` child are used
/// instead, otherwise the error is returned. Remote targets are left in
/// place unless a fallback exists.
pub fn expand_xincludes(doc: &mut Document) -> Result<()> {
    let base = doc.base_dir().unwrap_or(Path::new(".")).to_path_buf();
    let mut chain = Vec::new();
    if let Some(source) = doc.source() {
        chain.push(canonical(source));
    }
    expand_in(doc, &base, &mut chain)
}

fn expand_in(doc: &mut Document, base: &Path, chain: &mut Vec<PathBuf>) -> Result<()> {
    for include in include_elements(doc) {
        // Directives inside an already replaced subtree are gone
        if !is_attached(doc, include) {
            continue;
        }

        let fallback = doc.find_child(include, XINCLUDE_NS, "fallback");
        let Some(href) = doc.attribute(include, "href").map(str::to_string) else {
            debug!("Skipping xi:include without href at line {}", doc.line(include));
            continue;
        };

        if is_remote_href(&href) {
            match fallback {
                Some(fallback) => use_fallback(doc, include, fallback),
                None => warn!("Remote include {} is not fetched", href),
            }
            continue;
        }

        let path = resolve_href(&href, base);
        let line = doc.line(include);
        let loaded = match ParseMode::of(doc, include) {
            ParseMode::Text => load_text(doc, &path, line),
            ParseMode::Xml => load_xml(doc, &path, chain),
        };

        match (loaded, fallback) {
            (Ok(replacement), _) => doc.replace(include, &[replacement]),
            (Err(err @ StatusError::IncludeCycle { .. }), _) => return Err(err),
            (Err(err), Some(fallback)) => {
                debug!("Using fallback for {}: {}", href, err);
                use_fallback(doc, include, fallback);
            }
            (Err(err), None) => return Err(err),
        }
    }
    Ok(())
}

fn load_text(doc: &mut Document, path: &Path, line: usize) -> Result<NodeId> {
    let text = fs::read_to_string(path).map_err(|source| StatusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(doc.create_text(text, line))
}

fn load_xml(doc: &mut Document, path: &Path, chain: &mut Vec<PathBuf>) -> Result<NodeId> {
    let key = canonical(path);
    if chain.contains(&key) {
        return Err(StatusError::IncludeCycle {
            path: path.to_path_buf(),
        });
    }

    let mut included = Document::from_file(path)?;
    let included_base = included.base_dir().unwrap_or(Path::new(".")).to_path_buf();
    chain.push(key);
    let expanded = expand_in(&mut included, &included_base, chain);
    chain.pop();
    expanded?;

    debug!("Included {}", path.display());
    Ok(doc.import(&included, included.root()))
}

fn use_fallback(doc: &mut Document, include: NodeId, fallback: NodeId) {
    let children = doc.children(fallback).to_vec();
    doc.replace(include, &children);
}

/// Whether `node` is still reachable from the document root
fn is_attached(doc: &Document, node: NodeId) -> bool {
    let root = doc.root();
    let mut current = Some(node);
    while let Some(id) = current {
        if id == root {
            return true;
        }
        current = doc.parent(id);
    }
    false
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
