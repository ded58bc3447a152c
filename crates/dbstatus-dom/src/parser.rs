//! XML to node tree conversion
//!
//! Builds the arena of a [`Document`] from a single pass over quick-xml
//! events, resolving namespace prefixes and tracking source lines.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::node::{Attribute, Element, Namespace, NodeData, NodeId, NodeKind};

/// Namespace bound to the `xml` prefix
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Tracks the current line while the reader moves forward
struct LineCounter<'a> {
    source: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    fn advance_to(&mut self, position: usize) -> usize {
        let end = position.min(self.source.len());
        if end > self.offset {
            self.line += self.source[self.offset..end]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            self.offset = end;
        }
        self.line
    }
}

/// Stack of in-scope namespace declarations
#[derive(Default)]
struct Scopes {
    frames: Vec<Vec<Namespace>>,
}

impl Scopes {
    fn push(&mut self, declarations: Vec<Namespace>) {
        self.frames.push(declarations);
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    fn resolve(&self, prefix: Option<&str>) -> Option<String> {
        if prefix == Some("xml") {
            return Some(XML_NS.to_string());
        }
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter())
            .find(|ns| ns.prefix.as_deref() == prefix)
            .map(|ns| ns.uri.clone())
            // an empty default namespace undeclares it
            .filter(|uri| !(prefix.is_none() && uri.is_empty()))
    }
}

fn split_qname(qname: &[u8]) -> std::result::Result<(Option<String>, String), DomError> {
    let qname = std::str::from_utf8(qname)?;
    Ok(match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
        None => (None, qname.to_string()),
    })
}

/// Parse the given source into a node tree
pub(crate) fn parse(source: &str) -> Result<Document> {
    let mut reader = Reader::from_str(source);
    // Keep whitespace-only text; remark keyword detection looks at the first child
    reader.config_mut().trim_text(false);

    let mut lines = LineCounter::new(source);
    let mut scopes = Scopes::default();
    let mut nodes: Vec<NodeData> = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut root: Option<NodeId> = None;

    loop {
        let line = lines.advance_to(reader.buffer_position() as usize);
        let event = reader.read_event().map_err(|source| DomError::Xml {
            line: lines.advance_to(reader.error_position() as usize),
            source,
        })?;
        let end = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) => {
                // `<` + tag content + `>`
                let line = lines.advance_to(end.saturating_sub(e.len() + 2));
                let id = open_element(e, line, &mut scopes, &mut nodes, &stack, &mut root)?;
                stack.push(id);
            }
            Event::Empty(ref e) => {
                // `<` + tag content + `/>`
                let line = lines.advance_to(end.saturating_sub(e.len() + 3));
                open_element(e, line, &mut scopes, &mut nodes, &stack, &mut root)?;
                scopes.pop();
            }
            Event::End(_) => {
                stack.pop();
                scopes.pop();
            }
            Event::Text(ref e) => {
                if let Some(&parent) = stack.last() {
                    let text = e.unescape().map_err(|source| DomError::Xml { line, source })?;
                    push_text(&mut nodes, parent, &text, line);
                }
            }
            Event::CData(e) => {
                if let Some(&parent) = stack.last() {
                    let raw = e.into_inner();
                    let text = std::str::from_utf8(&raw)?;
                    push_text(&mut nodes, parent, text, line);
                }
            }
            Event::Comment(ref e) => {
                if let Some(&parent) = stack.last() {
                    let text = std::str::from_utf8(e)?.to_string();
                    let id = NodeId(nodes.len());
                    nodes.push(NodeData::new(NodeKind::Comment(text), Some(parent), line));
                    nodes[parent.0].children.push(id);
                }
            }
            Event::Eof => break,
            // Declarations, processing instructions and DOCTYPE are not part of the tree
            _ => {}
        }
    }

    let root = root.ok_or(DomError::NoRoot)?;
    Ok(Document::from_parts(nodes, root))
}

/// Append text to `parent`, merging with a directly preceding text node
fn push_text(nodes: &mut Vec<NodeData>, parent: NodeId, text: &str, line: usize) {
    if let Some(&last) = nodes[parent.0].children.last() {
        if let NodeKind::Text(ref mut existing) = nodes[last.0].kind {
            existing.push_str(text);
            return;
        }
    }
    let id = NodeId(nodes.len());
    nodes.push(NodeData::new(NodeKind::Text(text.to_string()), Some(parent), line));
    nodes[parent.0].children.push(id);
}

fn open_element(
    start: &BytesStart<'_>,
    line: usize,
    scopes: &mut Scopes,
    nodes: &mut Vec<NodeData>,
    stack: &[NodeId],
    root: &mut Option<NodeId>,
) -> Result<NodeId> {
    let mut namespaces = Vec::new();
    let mut raw_attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| DomError::Xml {
            line,
            source: quick_xml::Error::from(e),
        })?;
        let value = attr
            .unescape_value()
            .map_err(|source| DomError::Xml { line, source })?
            .to_string();
        let (prefix, name) = split_qname(attr.key.as_ref())?;

        match (prefix.as_deref(), name.as_str()) {
            (None, "xmlns") => namespaces.push(Namespace { prefix: None, uri: value }),
            (Some("xmlns"), _) => namespaces.push(Namespace {
                prefix: Some(name),
                uri: value,
            }),
            _ => raw_attributes.push((prefix, name, value)),
        }
    }

    scopes.push(namespaces.clone());

    let (prefix, name) = split_qname(start.name().as_ref())?;
    let namespace = scopes.resolve(prefix.as_deref());
    if let (Some(p), None) = (&prefix, &namespace) {
        return Err(DomError::UnboundPrefix {
            prefix: p.clone(),
            line,
        });
    }

    let mut attributes = Vec::with_capacity(raw_attributes.len());
    for (prefix, name, value) in raw_attributes {
        // Unprefixed attributes are in no namespace
        let namespace = match prefix.as_deref() {
            Some(p) => Some(scopes.resolve(Some(p)).ok_or_else(|| DomError::UnboundPrefix {
                prefix: p.to_string(),
                line,
            })?),
            None => None,
        };
        attributes.push(Attribute {
            prefix,
            name,
            namespace,
            value,
        });
    }

    let element = Element {
        name,
        prefix,
        namespace,
        attributes,
        namespaces,
    };

    let parent = stack.last().copied();
    let id = NodeId(nodes.len());
    nodes.push(NodeData::new(NodeKind::Element(element), parent, line));
    match parent {
        Some(parent) => nodes[parent.0].children.push(id),
        None => {
            if root.is_none() {
                *root = Some(id);
            }
        }
    }
    Ok(id)
}
