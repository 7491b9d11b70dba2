//! Structural message trees.
//!
//! Payloads are parsed into an owned, arena-backed [`Document`]. Elements carry a
//! namespace-qualified name, ordered attributes, ordered children and the namespace
//! bindings declared on them. Text is stored as separate leaf nodes.
//!
//! Attributes are not arena nodes of their own; a [`Location`] addresses either a node
//! or an attribute of an element, which is what path expressions and the comparator
//! report on.

pub mod document;
pub mod error;
pub mod parser;

pub use document::{
    Attribute, Document, ElementData, Location, NamespaceBindings, NodeData, NodeId, NodeKind,
    QualifiedName,
};
pub use error::TreeError;
pub use parser::parse_document;
