//! Document tree and navigation
//!
//! A [`Document`] owns every node of a parsed XML file in an arena.
//! Nodes reference their parent and children by [`NodeId`], so parent
//! links never own anything.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DomError, Result};
use crate::node::{Attribute, Element, Namespace, NodeData, NodeId, NodeKind};
use crate::parser;

/// A parsed XML document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    source: Option<PathBuf>,
}

impl Document {
    pub(crate) fn from_parts(nodes: Vec<NodeData>, root: NodeId) -> Self {
        Self {
            nodes,
            root,
            source: None,
        }
    }

    /// Parse a document from a string
    pub fn parse_str(xml: &str) -> Result<Self> {
        parser::parse(xml)
    }

    /// Parse a document from UTF-8 bytes
    pub fn parse_bytes(xml: &[u8]) -> Result<Self> {
        parser::parse(std::str::from_utf8(xml)?)
    }

    /// Read and parse a document from a file, remembering its location
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| DomError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc = Self::parse_bytes(&bytes)?;
        doc.source = Some(path.to_path_buf());
        Ok(doc)
    }

    /// The file this document was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Directory of the source file (`None` for in-memory documents)
    pub fn base_dir(&self) -> Option<&Path> {
        self.source.as_deref().map(|p| match p.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        })
    }

    /// The root element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Raw node data
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    /// Element data, `None` for text and comment nodes
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Local name of an element node
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    /// Whether the node is character data
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Text(_))
    }

    /// Source line of the node (1-based)
    pub fn line(&self, id: NodeId) -> usize {
        self.nodes[id.0].line
    }

    /// Parent node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Child nodes in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// First child node
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.first().copied()
    }

    /// Element children in document order
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| self.element(*c).is_some())
    }

    /// First child element with the given namespace and local name
    pub fn find_child(&self, id: NodeId, namespace: &str, name: &str) -> Option<NodeId> {
        self.child_elements(id)
            .find(|c| self.element(*c).is_some_and(|e| e.is(namespace, name)))
    }

    /// All descendants of `id` in document order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = pending.pop() {
            out.push(next);
            pending.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Descendant elements of `id` with the given namespace and local name
    pub fn find_descendants(&self, id: NodeId, namespace: &str, name: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|d| self.element(*d).is_some_and(|e| e.is(namespace, name)))
            .collect()
    }

    /// All elements of the document (root included) with the given namespace and name
    pub fn find_all(&self, namespace: &str, name: &str) -> Vec<NodeId> {
        let root = self.root;
        let mut found = Vec::new();
        if self.element(root).is_some_and(|e| e.is(namespace, name)) {
            found.push(root);
        }
        found.extend(self.find_descendants(root, namespace, name));
        found
    }

    /// Concatenated text of the node and all its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Comment(_) => String::new(),
            NodeKind::Element(_) => {
                let mut out = String::new();
                for d in self.descendants(id) {
                    if let NodeKind::Text(text) = &self.nodes[d.0].kind {
                        out.push_str(text);
                    }
                }
                out
            }
        }
    }

    /// Look up an attribute by its qualified name as written
    pub fn attribute(&self, id: NodeId, qname: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|a| a.qualified_name() == qname)
            .map(|a| a.value.as_str())
    }

    /// Look up a namespaced attribute
    pub fn attribute_ns(&self, id: NodeId, namespace: &str, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|a: &&Attribute| a.name == name && a.namespace.as_deref() == Some(namespace))
            .map(|a| a.value.as_str())
    }

    /// Namespace declarations on the root element
    pub fn root_namespaces(&self) -> &[Namespace] {
        self.element(self.root)
            .map(|e| e.namespaces.as_slice())
            .unwrap_or(&[])
    }

    /// The default namespace declared on the root element
    pub fn default_namespace(&self) -> Option<&str> {
        self.root_namespaces()
            .iter()
            .find(|ns| ns.prefix.is_none())
            .map(|ns| ns.uri.as_str())
    }

    /// XPath-like locator of a node, e.g. `/*/*[2]/*`
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            segments.push(self.path_segment(node));
            current = self.parent(node);
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    fn path_segment(&self, id: NodeId) -> String {
        let (label, same_kind): (String, Box<dyn Fn(&NodeKind) -> bool>) =
            match &self.nodes[id.0].kind {
                NodeKind::Element(e) => {
                    let label = match (&e.namespace, &e.prefix) {
                        (Some(_), None) => "*".to_string(),
                        (_, Some(prefix)) => format!("{}:{}", prefix, e.name),
                        (None, None) => e.name.clone(),
                    };
                    let anonymous = e.namespace.is_some() && e.prefix.is_none();
                    let (name, prefix) = (e.name.clone(), e.prefix.clone());
                    (
                        label,
                        Box::new(move |kind: &NodeKind| match kind {
                            NodeKind::Element(other) if anonymous => {
                                other.namespace.is_some() && other.prefix.is_none()
                            }
                            NodeKind::Element(other) => {
                                other.name == name && other.prefix == prefix
                            }
                            _ => false,
                        }),
                    )
                }
                NodeKind::Text(_) => (
                    "text()".to_string(),
                    Box::new(|kind: &NodeKind| matches!(kind, NodeKind::Text(_))),
                ),
                NodeKind::Comment(_) => (
                    "comment()".to_string(),
                    Box::new(|kind: &NodeKind| matches!(kind, NodeKind::Comment(_))),
                ),
            };

        let Some(parent) = self.parent(id) else {
            return label;
        };
        let siblings: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|s| same_kind(&self.nodes[s.0].kind))
            .collect();
        if siblings.len() > 1 {
            let position = siblings.iter().position(|s| *s == id).unwrap_or(0) + 1;
            format!("{}[{}]", label, position)
        } else {
            label
        }
    }

    /// Copy the subtree rooted at `node` of another document into this arena.
    ///
    /// The copy is detached; attach it with [`Document::replace`].
    pub fn import(&mut self, other: &Document, node: NodeId) -> NodeId {
        let top = self.push_copy(other, node, None);
        let mut pending = vec![(node, top)];
        while let Some((source, copy)) = pending.pop() {
            for &child in other.children(source) {
                let id = self.push_copy(other, child, Some(copy));
                self.nodes[copy.0].children.push(id);
                pending.push((child, id));
            }
        }
        top
    }

    fn push_copy(&mut self, other: &Document, node: NodeId, parent: Option<NodeId>) -> NodeId {
        let data = other.node(node);
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(data.kind.clone(), parent, data.line));
        id
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>, line: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(NodeData::new(NodeKind::Text(text.into()), None, line));
        id
    }

    /// Replace `target` with the given nodes, in order.
    ///
    /// `target` is detached. Replacing the root with a single element makes
    /// that element the new root.
    pub fn replace(&mut self, target: NodeId, replacements: &[NodeId]) {
        let parent = self.nodes[target.0].parent;
        for &r in replacements {
            if let Some(old_parent) = self.nodes[r.0].parent {
                self.nodes[old_parent.0].children.retain(|c| *c != r);
            }
            self.nodes[r.0].parent = parent;
        }
        match parent {
            Some(parent) => {
                let children = &mut self.nodes[parent.0].children;
                if let Some(pos) = children.iter().position(|c| *c == target) {
                    children.splice(pos..=pos, replacements.iter().copied());
                }
            }
            None => {
                if let Some(&new_root) = replacements
                    .iter()
                    .find(|r| matches!(self.nodes[r.0].kind, NodeKind::Element(_)))
                {
                    self.root = new_root;
                }
            }
        }
        self.nodes[target.0].parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<article xmlns="http://docbook.org/ns/docbook" xmlns:xi="http://www.w3.org/2001/XInclude" version="5.0">
  <title>A1</title>
  <section xml:id="s1">
    <title>S1</title>
    <para>Hello <emphasis>brave</emphasis> world</para>
    <!-- note -->
    <para><![CDATA[raw <text>]]></para>
  </section>
  <xi:include href="chapter.xml"/>
</article>"#;

    #[test]
    fn test_root_and_namespaces() {
        let doc = Document::parse_str(SAMPLE).unwrap();
        assert_eq!(doc.name(doc.root()), Some("article"));
        assert_eq!(
            doc.default_namespace(),
            Some("http://docbook.org/ns/docbook")
        );
        assert_eq!(doc.root_namespaces().len(), 2);
        assert_eq!(doc.attribute(doc.root(), "version"), Some("5.0"));
        assert!(doc.source().is_none());
        assert!(doc.base_dir().is_none());
    }

    #[test]
    fn test_line_numbers() {
        let doc = Document::parse_str(SAMPLE).unwrap();
        let root = doc.root();
        assert_eq!(doc.line(root), 2);
        let section = doc.find_child(root, "http://docbook.org/ns/docbook", "section").unwrap();
        assert_eq!(doc.line(section), 4);
        let paras = doc.find_descendants(root, "http://docbook.org/ns/docbook", "para");
        assert_eq!(paras.len(), 2);
        assert_eq!(doc.line(paras[0]), 6);
        assert_eq!(doc.line(paras[1]), 8);
    }

    #[test]
    fn test_text_content_skips_comments() {
        let doc = Document::parse_str(SAMPLE).unwrap();
        let paras = doc.find_all("http://docbook.org/ns/docbook", "para");
        assert_eq!(doc.text_content(paras[0]), "Hello brave world");
        assert_eq!(doc.text_content(paras[1]), "raw <text>");
        let section = doc.parent(paras[0]).unwrap();
        assert!(!doc.text_content(section).contains("note"));
    }

    #[test]
    fn test_prefixed_element_namespace() {
        let doc = Document::parse_str(SAMPLE).unwrap();
        let includes = doc.find_all("http://www.w3.org/2001/XInclude", "include");
        assert_eq!(includes.len(), 1);
        assert_eq!(doc.attribute(includes[0], "href"), Some("chapter.xml"));
        let section = doc.find_all("http://docbook.org/ns/docbook", "section")[0];
        assert_eq!(
            doc.attribute_ns(section, crate::XML_NS, "id"),
            Some("s1")
        );
    }

    #[test]
    fn test_first_child_is_text() {
        let doc = Document::parse_str(SAMPLE).unwrap();
        let para = doc.find_all("http://docbook.org/ns/docbook", "para")[0];
        let first = doc.first_child(para).unwrap();
        assert!(doc.is_text(first));
        let section = doc.parent(para).unwrap();
        let title = doc.child_elements(section).next().unwrap();
        assert_eq!(doc.name(title), Some("title"));
    }

    #[test]
    fn test_paths() {
        let doc = Document::parse_str(SAMPLE).unwrap();
        let root = doc.root();
        assert_eq!(doc.path(root), "/*");
        let paras = doc.find_all("http://docbook.org/ns/docbook", "para");
        // section is the 2nd element child of article, para the 2nd/3rd of section
        assert_eq!(doc.path(paras[0]), "/*/*[2]/*[2]");
        assert_eq!(doc.path(paras[1]), "/*/*[2]/*[3]");
        let include = doc.find_all("http://www.w3.org/2001/XInclude", "include")[0];
        assert_eq!(doc.path(include), "/*/xi:include");
    }

    #[test]
    fn test_import_and_replace() {
        let mut doc = Document::parse_str(SAMPLE).unwrap();
        let other = Document::parse_str(
            r#"<chapter xmlns="http://docbook.org/ns/docbook"><title>C1</title></chapter>"#,
        )
        .unwrap();

        let include = doc.find_all("http://www.w3.org/2001/XInclude", "include")[0];
        let copied = doc.import(&other, other.root());
        doc.replace(include, &[copied]);

        assert!(doc
            .find_all("http://www.w3.org/2001/XInclude", "include")
            .is_empty());
        let chapter = doc.find_all("http://docbook.org/ns/docbook", "chapter")[0];
        assert_eq!(doc.parent(chapter), Some(doc.root()));
        assert_eq!(doc.text_content(chapter), "C1");
    }

    #[test]
    fn test_import_deep_tree() {
        let depth = 20_000;
        let other = Document::parse_str(&format!(
            r#"<chapter xmlns="http://docbook.org/ns/docbook">{}<para>deep</para>{}</chapter>"#,
            "<section>".repeat(depth),
            "</section>".repeat(depth)
        ))
        .unwrap();
        let mut doc = Document::parse_str("<book/>").unwrap();
        let copied = doc.import(&other, other.root());
        let root = doc.root();
        doc.replace(root, &[copied]);

        assert_eq!(doc.name(doc.root()), Some("chapter"));
        assert_eq!(doc.descendants(doc.root()).len(), depth + 2);
        assert_eq!(doc.text_content(doc.root()), "deep");
        let para = doc.find_all("http://docbook.org/ns/docbook", "para");
        assert_eq!(para.len(), 1);
        assert_eq!(doc.path(para[0]).matches('/').count(), depth + 2);
    }

    #[test]
    fn test_replace_root() {
        let mut doc = Document::parse_str(r#"<wrapper/>"#).unwrap();
        let other = Document::parse_str(r#"<book/>"#).unwrap();
        let copied = doc.import(&other, other.root());
        let old_root = doc.root();
        doc.replace(old_root, &[copied]);
        assert_eq!(doc.name(doc.root()), Some("book"));
    }

    #[test]
    fn test_malformed_xml() {
        let err = Document::parse_str("<article>\n<para></article>").unwrap_err();
        assert!(matches!(err, DomError::Xml { .. }));
    }

    #[test]
    fn test_no_root() {
        let err = Document::parse_str("<?xml version=\"1.0\"?>\n").unwrap_err();
        assert!(matches!(err, DomError::NoRoot));
    }

    #[test]
    fn test_unbound_prefix() {
        let err = Document::parse_str("<db:article/>").unwrap_err();
        assert!(matches!(err, DomError::UnboundPrefix { .. }));
    }

    #[test]
    fn test_from_file_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        fs::write(&path, "<article/>").unwrap();
        let doc = Document::from_file(&path).unwrap();
        assert_eq!(doc.source(), Some(path.as_path()));
        assert_eq!(doc.base_dir(), Some(dir.path()));
    }

    #[test]
    fn test_from_file_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.xml");
        fs::write(&path, b"<article>Gr\xfc\xdfe</article>").unwrap();
        let err = Document::from_file(&path).unwrap_err();
        assert!(matches!(err, DomError::Utf8(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Document::from_file("does/not/exist.xml").unwrap_err();
        assert!(matches!(err, DomError::Io { .. }));
    }
}
