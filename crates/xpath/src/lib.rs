//! Path expressions over [`assay_tree::Document`].
//!
//! Two notations address the same locations:
//!
//! - a slash-delimited XPath subset: `/root/a`, `//a/b`, `root/a/@id`, `item[2]`,
//!   `item[@type='x']`, `item[name='x']`, `*`, `text()`, `node()`, `..`, `.`;
//! - a dot-delimited shorthand: `root.a.b`, whose last segment falls back to an
//!   attribute when no child element carries that name.
//!
//! Either may be prefixed with a type tag (`string:`, `number:`, `boolean:`, `node:`)
//! and wrapped in one of a handful of functions such as `count(...)`.

pub mod ast;
mod axes;
pub mod engine;
pub mod error;
pub mod functions;
pub mod parser;

pub use ast::{Axis, Expression, LocationPath, NameTest, NodeTest, PathExpression, Predicate, Step, ValueType};
pub use engine::{EvaluationContext, XPathValue, evaluate, select};
pub use error::XPathError;
pub use parser::parse_path_expression;
