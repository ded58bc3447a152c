//! Node definitions
//!
//! Nodes live in the arena owned by [`crate::Document`] and refer to each
//! other through [`NodeId`] handles.

/// Handle to a node inside a [`crate::Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A namespace declaration (`xmlns="..."` or `xmlns:prefix="..."`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Declared prefix, `None` for the default namespace
    pub prefix: Option<String>,
    /// Namespace URI
    pub uri: String,
}

/// An attribute on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Prefix as written in the source
    pub prefix: Option<String>,
    /// Local part of the name
    pub name: String,
    /// Namespace URI (only for prefixed attributes)
    pub namespace: Option<String>,
    /// Unescaped value
    pub value: String,
}

impl Attribute {
    /// Qualified name as written (`prefix:name` or `name`)
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Local name
    pub name: String,
    /// Prefix as written in the source
    pub prefix: Option<String>,
    /// Resolved namespace URI
    pub namespace: Option<String>,
    /// Attributes, excluding namespace declarations
    pub attributes: Vec<Attribute>,
    /// Namespace declarations made on this element
    pub namespaces: Vec<Namespace>,
}

impl Element {
    /// Check whether this element has the given namespace and local name
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }
}

/// The kind of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element
    Element(Element),
    /// Character data (text and CDATA sections)
    Text(String),
    /// A comment
    Comment(String),
}

/// A node with its tree links
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What this node is
    pub kind: NodeKind,
    /// Parent node, `None` for the root and for detached nodes
    pub parent: Option<NodeId>,
    /// Child nodes in document order
    pub children: Vec<NodeId>,
    /// 1-based line in the source where this node starts
    pub line: usize,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind, parent: Option<NodeId>, line: usize) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            line,
        }
    }
}
