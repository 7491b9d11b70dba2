//! The evaluation engine for executing a parsed path expression against a [`Document`].

use super::ast::{Axis, Expression, LocationPath, NameTest, NodeTest, Predicate, Step};
use super::{axes, functions};
use crate::error::XPathError;
use crate::parser::parse_path_expression;
use assay_tree::{Document, Location, NamespaceBindings, QualifiedName};
use log::debug;
use std::collections::HashSet;
use std::fmt;

/// Represents the possible result types of an expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue {
    NodeSet(Vec<Location>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl XPathValue {
    /// Renders a scalar the way XPath does: integral numbers without a fraction.
    pub fn format_number(n: f64) -> String {
        if n.is_nan() {
            "NaN".to_string()
        } else if n.fract() == 0.0 && n.abs() < 1e15 {
            format!("{}", n as i64)
        } else {
            format!("{}", n)
        }
    }
}

impl fmt::Display for XPathValue {
    /// Scalars only; node-sets need the document to produce a string value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => write!(f, "node-set({})", nodes.len()),
            XPathValue::String(s) => write!(f, "{}", s),
            XPathValue::Number(n) => write!(f, "{}", XPathValue::format_number(*n)),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// A container for all state needed during expression evaluation.
pub struct EvaluationContext<'d> {
    pub document: &'d Document,
    /// Prefix bindings used to resolve prefixed name tests.
    pub namespaces: &'d NamespaceBindings,
}

impl<'d> EvaluationContext<'d> {
    pub fn new(document: &'d Document, namespaces: &'d NamespaceBindings) -> Self {
        Self {
            document,
            namespaces,
        }
    }
}

/// Parses and evaluates `path`, returning the selected locations. Scalar results are an
/// empty selection.
pub fn select(path: &str, e_ctx: &EvaluationContext<'_>) -> Result<Vec<Location>, XPathError> {
    let parsed = parse_path_expression(path)?;
    match evaluate(&parsed.expression, e_ctx)? {
        XPathValue::NodeSet(nodes) => Ok(nodes),
        _ => Ok(vec![]),
    }
}

/// Evaluates a compiled expression and returns a concrete `XPathValue`.
pub fn evaluate(expr: &Expression, e_ctx: &EvaluationContext<'_>) -> Result<XPathValue, XPathError> {
    match expr {
        Expression::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expression::LocationPath(path) => {
            let nodes = evaluate_location_path(path, e_ctx)?;
            debug!("Location path selected {} node(s)", nodes.len());
            Ok(XPathValue::NodeSet(nodes))
        }
        Expression::FunctionCall { name, args } => {
            let mut evaluated_args = Vec::with_capacity(args.len());
            for arg in args {
                evaluated_args.push(evaluate(arg, e_ctx)?);
            }
            functions::evaluate_function(name, evaluated_args, e_ctx)
        }
    }
}

fn evaluate_location_path(
    path: &LocationPath,
    e_ctx: &EvaluationContext<'_>,
) -> Result<Vec<Location>, XPathError> {
    let mut current = vec![Location::Document];
    for step in &path.steps {
        current = evaluate_step(step, &current, e_ctx)?;
    }
    Ok(current)
}

/// Evaluates a single step for every context location, applying predicates per context
/// location as positions are relative to each axis.
fn evaluate_step(
    step: &Step,
    context: &[Location],
    e_ctx: &EvaluationContext<'_>,
) -> Result<Vec<Location>, XPathError> {
    let doc = e_ctx.document;
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for &location in context {
        let selected = match step.axis {
            Axis::ChildOrAttribute => {
                let elements = filter_by_node_test(
                    doc,
                    axes::children(doc, location),
                    &step.node_test,
                    Axis::Child,
                    e_ctx,
                )?;
                if elements.is_empty() {
                    filter_by_node_test(
                        doc,
                        axes::attributes(doc, location),
                        &step.node_test,
                        Axis::Attribute,
                        e_ctx,
                    )?
                } else {
                    elements
                }
            }
            axis => {
                let candidates = match axis {
                    Axis::Child => axes::children(doc, location),
                    Axis::Attribute => axes::attributes(doc, location),
                    Axis::Descendant => axes::descendants(doc, location),
                    Axis::DescendantOrSelf => axes::descendants_or_self(doc, location),
                    Axis::Parent => axes::parent(doc, location),
                    Axis::SelfAxis | Axis::ChildOrAttribute => vec![location],
                };
                filter_by_node_test(doc, candidates, &step.node_test, axis, e_ctx)?
            }
        };

        for found in apply_predicates(doc, selected, &step.predicates, e_ctx)? {
            if seen.insert(found) {
                result.push(found);
            }
        }
    }

    result.sort_by_key(axes::document_order);
    Ok(result)
}

fn filter_by_node_test(
    doc: &Document,
    candidates: Vec<Location>,
    test: &NodeTest,
    axis: Axis,
    e_ctx: &EvaluationContext<'_>,
) -> Result<Vec<Location>, XPathError> {
    let mut kept = Vec::with_capacity(candidates.len());
    for location in candidates {
        let keep = match test {
            NodeTest::Node => true,
            NodeTest::Text => matches!(location, Location::Node(id) if doc.text(id).is_some()),
            NodeTest::Wildcard => match axis {
                Axis::Attribute => matches!(location, Location::Attribute { .. }),
                _ => matches!(location, Location::Node(id) if doc.is_element(id)),
            },
            NodeTest::Name(name_test) => match location_name(doc, location) {
                Some(name) => name_matches(name, name_test, e_ctx)?,
                None => false,
            },
        };
        if keep {
            kept.push(location);
        }
    }
    Ok(kept)
}

fn location_name(doc: &Document, location: Location) -> Option<&QualifiedName> {
    match location {
        Location::Document => None,
        Location::Node(id) => doc.name(id),
        Location::Attribute { owner, index } => doc.attribute(owner, index).map(|a| &a.name),
    }
}

fn name_matches(
    name: &QualifiedName,
    test: &NameTest,
    e_ctx: &EvaluationContext<'_>,
) -> Result<bool, XPathError> {
    if name.local_name != test.local_name {
        return Ok(false);
    }
    match &test.prefix {
        None => Ok(true),
        Some(prefix) => {
            let uri = e_ctx
                .namespaces
                .get(prefix)
                .ok_or_else(|| XPathError::UnknownPrefix(prefix.clone()))?;
            Ok(name.namespace.as_deref() == Some(uri.as_str()))
        }
    }
}

fn apply_predicates(
    doc: &Document,
    nodes: Vec<Location>,
    predicates: &[Predicate],
    e_ctx: &EvaluationContext<'_>,
) -> Result<Vec<Location>, XPathError> {
    let mut current = nodes;
    for predicate in predicates {
        current = match predicate {
            Predicate::Position(n) => current.get(n.wrapping_sub(1)).copied().into_iter().collect(),
            Predicate::Last => current.last().copied().into_iter().collect(),
            Predicate::AttributeEquals { name, value } => {
                let mut kept = Vec::new();
                for location in current {
                    if let Location::Node(id) = location {
                        for attr in doc.attributes(id) {
                            if attr.value == *value && name_matches(&attr.name, name, e_ctx)? {
                                kept.push(location);
                                break;
                            }
                        }
                    }
                }
                kept
            }
            Predicate::ChildEquals { name, value } => {
                let mut kept = Vec::new();
                for location in current {
                    if let Location::Node(id) = location {
                        for child in doc.child_elements(id) {
                            if let Some(child_name) = doc.name(child)
                                && doc.text_content(child).trim() == value.as_str()
                                && name_matches(child_name, name, e_ctx)?
                            {
                                kept.push(location);
                                break;
                            }
                        }
                    }
                }
                kept
            }
        };
    }
    Ok(current)
}
