//! Contains pure functions for collecting locations along each axis.

use assay_tree::{Document, Location};

pub(crate) fn children(doc: &Document, location: Location) -> Vec<Location> {
    match location {
        Location::Document => vec![Location::Node(doc.root())],
        Location::Node(id) => doc.children(id).map(Location::Node).collect(),
        Location::Attribute { .. } => vec![],
    }
}

pub(crate) fn attributes(doc: &Document, location: Location) -> Vec<Location> {
    match location {
        Location::Node(owner) => (0..doc.attributes(owner).len())
            .map(|index| Location::Attribute { owner, index })
            .collect(),
        _ => vec![],
    }
}

pub(crate) fn descendants(doc: &Document, location: Location) -> Vec<Location> {
    match location {
        Location::Document => {
            let root = doc.root();
            std::iter::once(root)
                .chain(doc.descendants(root))
                .map(Location::Node)
                .collect()
        }
        Location::Node(id) => doc.descendants(id).into_iter().map(Location::Node).collect(),
        Location::Attribute { .. } => vec![],
    }
}

pub(crate) fn descendants_or_self(doc: &Document, location: Location) -> Vec<Location> {
    let mut result = vec![location];
    result.extend(descendants(doc, location));
    result
}

pub(crate) fn parent(doc: &Document, location: Location) -> Vec<Location> {
    match location {
        Location::Document => vec![],
        Location::Attribute { owner, .. } => vec![Location::Node(owner)],
        Location::Node(id) => match doc.parent(id) {
            Some(parent) => vec![Location::Node(parent)],
            None => vec![Location::Document],
        },
    }
}

/// Sort key placing every location in document order, attributes right after their owner.
pub(crate) fn document_order(location: &Location) -> (usize, usize) {
    match *location {
        Location::Document => (0, 0),
        Location::Node(id) => (id.index() + 1, 0),
        Location::Attribute { owner, index } => (owner.index() + 1, index + 1),
    }
}
