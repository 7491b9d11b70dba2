//! Builds a [`Document`] from XML text using `roxmltree`.

use crate::document::{Document, NamespaceBindings, NodeId, QualifiedName};
use crate::error::TreeError;
use log::debug;
use roxmltree::Node;

const XML_PREFIX: &str = "xml";

/// Parses an XML payload. Comments and processing instructions are dropped; CDATA
/// sections become ordinary text; whitespace-only text is preserved as-is.
pub fn parse_document(text: &str) -> Result<Document, TreeError> {
    let xml = roxmltree::Document::parse(text)?;
    let root = xml.root_element();

    let mut doc = Document::new(element_name(root));
    let root_id = doc.root();
    copy_element_details(root, root_id, &mut doc);
    copy_children(root, root_id, &mut doc);

    debug!("Parsed XML payload into a tree of {} nodes", doc.len());
    Ok(doc)
}

impl Document {
    /// Convenience wrapper around [`parse_document`].
    pub fn parse(text: &str) -> Result<Self, TreeError> {
        parse_document(text)
    }
}

fn copy_children(source: Node<'_, '_>, target: NodeId, doc: &mut Document) {
    for child in source.children() {
        if child.is_element() {
            let id = doc.append_element(target, element_name(child));
            copy_element_details(child, id, doc);
            copy_children(child, id, doc);
        } else if child.is_text()
            && let Some(text) = child.text()
        {
            doc.append_text(target, text);
        }
    }
}

fn copy_element_details(source: Node<'_, '_>, target: NodeId, doc: &mut Document) {
    for (prefix, uri) in declared_namespaces(source) {
        doc.declare_namespace(target, prefix, uri);
    }
    for attr in source.attributes() {
        let mut name = match attr.namespace() {
            Some(ns) => QualifiedName::with_namespace(attr.name(), ns),
            None => QualifiedName::new(attr.name()),
        };
        if let Some(prefix) = attr.namespace().and_then(|ns| source.lookup_prefix(ns))
            && !prefix.is_empty()
        {
            name = name.with_prefix(prefix);
        }
        doc.set_attribute(target, name, attr.value());
    }
}

fn element_name(node: Node<'_, '_>) -> QualifiedName {
    let tag = node.tag_name();
    match tag.namespace() {
        Some(ns) => {
            let name = QualifiedName::with_namespace(tag.name(), ns);
            match node.lookup_prefix(ns) {
                Some(prefix) if !prefix.is_empty() => name.with_prefix(prefix),
                _ => name,
            }
        }
        None => QualifiedName::new(tag.name()),
    }
}

fn in_scope(node: Node<'_, '_>) -> NamespaceBindings {
    node.namespaces()
        .filter(|ns| ns.name() != Some(XML_PREFIX))
        .map(|ns| (ns.name().unwrap_or("").to_string(), ns.uri().to_string()))
        .collect()
}

/// roxmltree only exposes in-scope namespaces, so declarations are recovered as the
/// bindings that differ from the parent element's scope.
fn declared_namespaces(node: Node<'_, '_>) -> NamespaceBindings {
    let own = in_scope(node);
    let inherited = node
        .parent_element()
        .map(in_scope)
        .unwrap_or_default();
    own.into_iter()
        .filter(|(prefix, uri)| inherited.get(prefix) != Some(uri))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Location;

    #[test]
    fn test_parse_elements_attributes_and_text() {
        let doc = parse_document(
            "<root><element attributeA='a' attributeB='b'><sub-element>text-value</sub-element></element></root>",
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(doc.name(root).unwrap().local_name, "root");
        let element = doc.child_elements(root).next().unwrap();
        assert_eq!(doc.attributes(element).len(), 2);
        assert_eq!(doc.attributes(element)[1].value, "b");
        let sub = doc.child_elements(element).next().unwrap();
        assert_eq!(doc.text_content(sub), "text-value");
        assert_eq!(doc.path(Location::Node(sub)), "root/element/sub-element");
    }

    #[test]
    fn test_root_namespace_declarations() {
        let doc = parse_document(
            "<ns1:root xmlns='urn:default' xmlns:ns1='urn:ns1'><ns1:a/><b/></ns1:root>",
        )
        .unwrap();
        let bindings = doc.root_namespaces();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings.get(""), Some(&"urn:default".to_string()));
        assert_eq!(bindings.get("ns1"), Some(&"urn:ns1".to_string()));

        let root_name = doc.name(doc.root()).unwrap();
        assert_eq!(root_name.namespace.as_deref(), Some("urn:ns1"));
        assert_eq!(root_name.to_string(), "ns1:root");

        let b = doc.child_elements(doc.root()).nth(1).unwrap();
        assert_eq!(doc.name(b).unwrap().namespace.as_deref(), Some("urn:default"));
    }

    #[test]
    fn test_nested_declarations_are_local() {
        let doc = parse_document("<root xmlns:a='urn:a'><child xmlns:b='urn:b'/></root>").unwrap();
        let child = doc.child_elements(doc.root()).next().unwrap();
        let declared = &doc.element(child).unwrap().namespaces;
        assert_eq!(declared.len(), 1);
        assert!(declared.contains_key("b"));
        assert_eq!(doc.in_scope_namespaces(child).len(), 2);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(matches!(
            parse_document("<root><unclosed></root>"),
            Err(TreeError::XmlParse(_))
        ));
    }
}
