//! Namespace and version sniffing

use dbstatus_dom::Document;

/// The DocBook 5 namespace URI
pub const DOCBOOK_NS: &str = "http://docbook.org/ns/docbook";

/// The XInclude namespace URI
pub const XINCLUDE_NS: &str = "http://www.w3.org/2001/XInclude";

/// Check whether the root element declares DocBook 5 as its default namespace
pub fn is_docbook(doc: &Document) -> bool {
    doc.default_namespace()
        .is_some_and(|uri| uri.eq_ignore_ascii_case(DOCBOOK_NS))
}

/// Check whether the root element declares the XInclude namespace
pub fn has_xinclude(doc: &Document) -> bool {
    doc.root_namespaces()
        .iter()
        .any(|ns| ns.uri.eq_ignore_ascii_case(XINCLUDE_NS))
}

/// The DocBook `version` attribute of the root element
pub fn docbook_version(doc: &Document) -> Option<String> {
    doc.attribute(doc.root(), "version").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_docbook_without_namespace() {
        let doc = Document::parse_str(r#"<?xml version="1.0"?><article/>"#).unwrap();
        assert!(!is_docbook(&doc));
    }

    #[test]
    fn test_docbook_default_namespace() {
        let doc = Document::parse_str(
            r#"<?xml version="1.0"?><article xmlns="http://docbook.org/ns/docbook"/>"#,
        )
        .unwrap();
        assert!(is_docbook(&doc));
    }

    #[test]
    fn test_docbook_case_insensitive() {
        let doc =
            Document::parse_str(r#"<article xmlns="HTTP://DocBook.org/ns/docbook"/>"#).unwrap();
        assert!(is_docbook(&doc));
    }

    #[test]
    fn test_prefixed_docbook_is_not_default() {
        let doc = Document::parse_str(
            r#"<db:article xmlns:db="http://docbook.org/ns/docbook"/>"#,
        )
        .unwrap();
        assert!(!is_docbook(&doc));
    }

    #[test]
    fn test_has_xinclude() {
        let doc = Document::parse_str(
            r#"<book xmlns="http://docbook.org/ns/docbook" xmlns:xi="http://www.w3.org/2001/XInclude"/>"#,
        )
        .unwrap();
        assert!(has_xinclude(&doc));

        let plain = Document::parse_str(r#"<book xmlns="http://docbook.org/ns/docbook"/>"#).unwrap();
        assert!(!has_xinclude(&plain));
    }

    #[test]
    fn test_docbook_version() {
        let doc = Document::parse_str(
            r#"<article xmlns="http://docbook.org/ns/docbook" version="5.0"/>"#,
        )
        .unwrap();
        assert_eq!(docbook_version(&doc), Some("5.0".to_string()));

        let unversioned = Document::parse_str(r#"<article/>"#).unwrap();
        assert_eq!(docbook_version(&unversioned), None);
    }
}
