//! The owned tree model shared by the parser, the path engine and the comparator.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Prefix to URI declarations. The empty prefix denotes the default namespace.
pub type NamespaceBindings = BTreeMap<String, String>;

/// A namespace-qualified name.
///
/// Identity (equality and hashing) is `(namespace, local_name)`; the prefix is kept for
/// display only, since two documents may bind the same URI to different prefixes.
#[derive(Debug, Clone)]
pub struct QualifiedName {
    pub local_name: String,
    pub namespace: Option<String>,
    pub prefix: Option<String>,
}

impl QualifiedName {
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            namespace: None,
            prefix: None,
        }
    }

    pub fn with_namespace(local_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            namespace: Some(namespace.into()),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Renders the name in `{uri}local` (Clark) notation, used in failure messages where
    /// the prefix would be misleading.
    pub fn expanded(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.local_name == other.local_name && self.namespace == other.namespace
    }
}

impl Eq for QualifiedName {}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local_name.hash(state);
        self.namespace.hash(state);
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => write!(f, "{}:{}", prefix, self.local_name),
            _ => write!(f, "{}", self.local_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualifiedName,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ElementData {
    pub name: QualifiedName,
    pub attributes: Vec<Attribute>,
    /// Namespace declarations made on this element (not the inherited ones).
    pub namespaces: NamespaceBindings,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Addresses anything a path expression can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    /// The document node sitting above the root element.
    Document,
    Node(NodeId),
    Attribute { owner: NodeId, index: usize },
}

/// A parsed message payload. The root element always lives at index 0.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    pub fn new(root: QualifiedName) -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Element(ElementData {
                    name: root,
                    attributes: Vec::new(),
                    namespaces: NamespaceBindings::new(),
                }),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn name(&self, id: NodeId) -> Option<&QualifiedName> {
        self.element(id).map(|e| &e.name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].children.iter().copied()
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(|&c| self.is_element(c))
    }

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.element(id).map(|e| e.attributes.as_slice()).unwrap_or(&[])
    }

    pub fn attribute(&self, owner: NodeId, index: usize) -> Option<&Attribute> {
        self.attributes(owner).get(index)
    }

    /// Finds an attribute by identity, returning its index on the owner.
    pub fn find_attribute(&self, owner: NodeId, name: &QualifiedName) -> Option<usize> {
        self.attributes(owner).iter().position(|a| &a.name == name)
    }

    /// All nodes below `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        result
    }

    // --- Construction ---

    pub fn append_element(&mut self, parent: NodeId, name: QualifiedName) -> NodeId {
        self.push_node(
            parent,
            NodeKind::Element(ElementData {
                name,
                attributes: Vec::new(),
                namespaces: NamespaceBindings::new(),
            }),
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push_node(parent, NodeKind::Text(text.into()))
    }

    /// Adds an attribute, replacing the value of an existing one with the same identity.
    pub fn set_attribute(&mut self, element: NodeId, name: QualifiedName, value: impl Into<String>) {
        if let NodeKind::Element(data) = &mut self.nodes[element.0].kind {
            let value = value.into();
            match data.attributes.iter_mut().find(|a| a.name == name) {
                Some(existing) => existing.value = value,
                None => data.attributes.push(Attribute { name, value }),
            }
        }
    }

    pub fn declare_namespace(
        &mut self,
        element: NodeId,
        prefix: impl Into<String>,
        uri: impl Into<String>,
    ) {
        if let NodeKind::Element(data) = &mut self.nodes[element.0].kind {
            data.namespaces.insert(prefix.into(), uri.into());
        }
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    // --- Values ---

    /// Concatenation of the direct text children of a node.
    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element(_) => self
                .children(id)
                .filter_map(|c| self.text(c))
                .collect::<String>(),
        }
    }

    /// The XPath-style string value: attribute value, text content, or the concatenation
    /// of all descendant text for elements and the document.
    pub fn string_value(&self, location: Location) -> String {
        match location {
            Location::Document => self.string_value(Location::Node(self.root())),
            Location::Attribute { owner, index } => self
                .attribute(owner, index)
                .map(|a| a.value.clone())
                .unwrap_or_default(),
            Location::Node(id) => match &self.nodes[id.0].kind {
                NodeKind::Text(text) => text.clone(),
                NodeKind::Element(_) => self
                    .descendants(id)
                    .into_iter()
                    .filter_map(|n| self.text(n))
                    .collect::<String>(),
            },
        }
    }

    // --- Namespaces ---

    pub fn root_namespaces(&self) -> &NamespaceBindings {
        static NONE: NamespaceBindings = NamespaceBindings::new();
        self.element(self.root())
            .map(|data| &data.namespaces)
            .unwrap_or(&NONE)
    }

    /// All bindings visible at `id`, inner declarations shadowing outer ones.
    pub fn in_scope_namespaces(&self, id: NodeId) -> NamespaceBindings {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        let mut bindings = NamespaceBindings::new();
        for node in chain.into_iter().rev() {
            if let Some(data) = self.element(node) {
                for (prefix, uri) in &data.namespaces {
                    bindings.insert(prefix.clone(), uri.clone());
                }
            }
        }
        bindings
    }

    // --- Addressing ---

    /// True if `location` is `ancestor` itself or lies inside its subtree.
    pub fn is_within(&self, location: Location, ancestor: Location) -> bool {
        if location == ancestor || ancestor == Location::Document {
            return true;
        }
        let Location::Node(ancestor_id) = ancestor else {
            return false;
        };
        let mut current = match location {
            Location::Document => return false,
            Location::Node(id) => Some(id),
            Location::Attribute { owner, .. } => Some(owner),
        };
        while let Some(node) = current {
            if node == ancestor_id {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// A slash-delimited structural address such as `root/item[2]/@id`.
    ///
    /// A 1-based position is appended to an element step only when siblings share its name.
    pub fn path(&self, location: Location) -> String {
        match location {
            Location::Document => "/".to_string(),
            Location::Attribute { owner, index } => {
                let attr = self
                    .attribute(owner, index)
                    .map(|a| a.name.to_string())
                    .unwrap_or_default();
                format!("{}/@{}", self.node_path(owner), attr)
            }
            Location::Node(id) => self.node_path(id),
        }
    }

    fn node_path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            segments.push(self.step_name(node));
            current = self.parent(node);
        }
        segments.reverse();
        segments.join("/")
    }

    fn step_name(&self, id: NodeId) -> String {
        let Some(name) = self.name(id) else {
            return "text()".to_string();
        };
        let Some(parent) = self.parent(id) else {
            return name.to_string();
        };
        let same_named: Vec<NodeId> = self
            .child_elements(parent)
            .filter(|&c| self.name(c) == Some(name))
            .collect();
        if same_named.len() > 1 {
            let position = same_named.iter().position(|&c| c == id).unwrap_or(0) + 1;
            format!("{}[{}]", name, position)
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_document() -> Document {
        let mut doc = Document::new(QualifiedName::new("order"));
        let root = doc.root();
        doc.declare_namespace(root, "", "urn:orders");
        let first = doc.append_element(root, QualifiedName::new("item"));
        doc.set_attribute(first, QualifiedName::new("sku"), "A-1");
        doc.append_text(first, "Widget");
        let second = doc.append_element(root, QualifiedName::new("item"));
        doc.append_text(second, "Gadget");
        doc.append_element(root, QualifiedName::new("total"));
        doc
    }

    #[test]
    fn test_qualified_name_identity_ignores_prefix() {
        let a = QualifiedName::with_namespace("root", "urn:a").with_prefix("ns1");
        let b = QualifiedName::with_namespace("root", "urn:a").with_prefix("ns2");
        let c = QualifiedName::with_namespace("root", "urn:b");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "ns1:root");
        assert_eq!(c.expanded(), "{urn:b}root");
    }

    #[test]
    fn test_paths_disambiguate_repeated_siblings() {
        let doc = order_document();
        let items: Vec<_> = doc.child_elements(doc.root()).collect();
        assert_eq!(doc.path(Location::Node(items[0])), "order/item[1]");
        assert_eq!(doc.path(Location::Node(items[1])), "order/item[2]");
        assert_eq!(doc.path(Location::Node(items[2])), "order/total");
        assert_eq!(
            doc.path(Location::Attribute { owner: items[0], index: 0 }),
            "order/item[1]/@sku"
        );
    }

    #[test]
    fn test_string_values() {
        let doc = order_document();
        assert_eq!(doc.string_value(Location::Document), "WidgetGadget");
        let first = doc.child_elements(doc.root()).next().unwrap();
        assert_eq!(doc.text_content(first), "Widget");
        assert_eq!(
            doc.string_value(Location::Attribute { owner: first, index: 0 }),
            "A-1"
        );
    }

    #[test]
    fn test_set_attribute_replaces_existing_value() {
        let mut doc = order_document();
        let first = doc.child_elements(doc.root()).next().unwrap();
        doc.set_attribute(first, QualifiedName::new("sku"), "B-2");
        assert_eq!(doc.attributes(first).len(), 1);
        assert_eq!(doc.attributes(first)[0].value, "B-2");
    }

    #[test]
    fn test_is_within_and_scoped_namespaces() {
        let doc = order_document();
        let first = doc.child_elements(doc.root()).next().unwrap();
        let attr = Location::Attribute { owner: first, index: 0 };
        assert!(doc.is_within(attr, Location::Node(first)));
        assert!(doc.is_within(attr, Location::Node(doc.root())));
        assert!(!doc.is_within(Location::Node(doc.root()), Location::Node(first)));
        assert_eq!(
            doc.in_scope_namespaces(first).get(""),
            Some(&"urn:orders".to_string())
        );
    }
}
