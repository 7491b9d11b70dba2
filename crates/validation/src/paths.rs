//! Single-value path evaluation shared by assertions and extraction.

use crate::error::{FailureKind, ValidateError, ValidationError};
use assay_tree::{Document, NamespaceBindings};
use assay_xpath::{EvaluationContext, ValueType, XPathValue, evaluate, parse_path_expression};
use itertools::Itertools;

/// The one value a path expression produced.
pub(crate) struct SelectedValue {
    pub value_type: ValueType,
    pub value: XPathValue,
    /// Trimmed string value of the node, or the rendered scalar.
    pub text: String,
    /// Structural path of the selected node, or the expression for scalars.
    pub path: String,
}

pub(crate) fn select_single(
    document: &Document,
    expression: &str,
    namespaces: &NamespaceBindings,
) -> Result<SelectedValue, ValidateError> {
    let parsed = parse_path_expression(expression)?;
    let e_ctx = EvaluationContext::new(document, namespaces);
    let value = evaluate(&parsed.expression, &e_ctx)?;

    let (text, path) = match &value {
        XPathValue::NodeSet(nodes) => match nodes.as_slice() {
            [] => {
                return Err(ValidationError::new(FailureKind::PathNotFound, expression)
                    .reason(format!("No result for path expression '{}'", expression))
                    .into());
            }
            [location] => (
                document.string_value(*location).trim().to_string(),
                document.path(*location),
            ),
            many => {
                return Err(ValidationError::new(FailureKind::AmbiguousPath, expression)
                    .actual(many.iter().map(|&l| document.path(l)).join(", "))
                    .reason(format!(
                        "Path expression '{}' selects {} nodes, expected exactly one",
                        expression,
                        many.len()
                    ))
                    .into());
            }
        },
        scalar => (scalar.to_string(), expression.to_string()),
    };

    Ok(SelectedValue {
        value_type: parsed.value_type,
        value,
        text,
        path,
    })
}
