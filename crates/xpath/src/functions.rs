//! Built-in functions usable in path expressions.

use super::engine::{EvaluationContext, XPathValue};
use crate::error::XPathError;
use assay_tree::Location;

/// Dispatches a function call to the correct implementation.
pub fn evaluate_function(
    name: &str,
    args: Vec<XPathValue>,
    e_ctx: &EvaluationContext<'_>,
) -> Result<XPathValue, XPathError> {
    match name {
        "count" => func_count(args),
        "local-name" => func_local_name(args, e_ctx),
        "name" => func_name(args, e_ctx),
        "namespace-uri" => func_namespace_uri(args, e_ctx),
        "string" => func_string(args, e_ctx),
        "string-length" => func_string_length(args, e_ctx),
        "normalize-space" => func_normalize_space(args, e_ctx),
        "boolean" => func_boolean(args),
        _ => Err(XPathError::FunctionError {
            function: name.to_string(),
            message: "Unknown function".to_string(),
        }),
    }
}

fn single_arg(function: &str, mut args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    if args.len() != 1 {
        return Err(XPathError::FunctionError {
            function: format!("{}()", function),
            message: format!("Expected 1 argument, got {}", args.len()),
        });
    }
    Ok(args.remove(0))
}

fn first_node(function: &str, value: XPathValue) -> Result<Option<Location>, XPathError> {
    match value {
        XPathValue::NodeSet(nodes) => Ok(nodes.first().copied()),
        other => Err(XPathError::FunctionError {
            function: format!("{}()", function),
            message: format!("Argument must be a node-set, got {:?}", other),
        }),
    }
}

fn string_of(value: XPathValue, e_ctx: &EvaluationContext<'_>) -> String {
    match value {
        XPathValue::NodeSet(nodes) => nodes
            .first()
            .map(|&n| e_ctx.document.string_value(n))
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn func_count(args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    match single_arg("count", args)? {
        XPathValue::NodeSet(nodes) => Ok(XPathValue::Number(nodes.len() as f64)),
        v => Err(XPathError::FunctionError {
            function: "count()".to_string(),
            message: format!("Argument must be a node-set, got {:?}", v),
        }),
    }
}

fn node_name(
    function: &str,
    args: Vec<XPathValue>,
    e_ctx: &EvaluationContext<'_>,
    render: fn(&assay_tree::QualifiedName) -> String,
) -> Result<XPathValue, XPathError> {
    let doc = e_ctx.document;
    let name = match first_node(function, single_arg(function, args)?)? {
        Some(Location::Node(id)) => doc.name(id).map(render),
        Some(Location::Attribute { owner, index }) => {
            doc.attribute(owner, index).map(|a| render(&a.name))
        }
        Some(Location::Document) | None => None,
    };
    Ok(XPathValue::String(name.unwrap_or_default()))
}

fn func_local_name(
    args: Vec<XPathValue>,
    e_ctx: &EvaluationContext<'_>,
) -> Result<XPathValue, XPathError> {
    node_name("local-name", args, e_ctx, |n| n.local_name.clone())
}

fn func_name(args: Vec<XPathValue>, e_ctx: &EvaluationContext<'_>) -> Result<XPathValue, XPathError> {
    node_name("name", args, e_ctx, |n| n.to_string())
}

fn func_namespace_uri(
    args: Vec<XPathValue>,
    e_ctx: &EvaluationContext<'_>,
) -> Result<XPathValue, XPathError> {
    node_name("namespace-uri", args, e_ctx, |n| {
        n.namespace.clone().unwrap_or_default()
    })
}

fn func_string(args: Vec<XPathValue>, e_ctx: &EvaluationContext<'_>) -> Result<XPathValue, XPathError> {
    let value = single_arg("string", args)?;
    Ok(XPathValue::String(string_of(value, e_ctx)))
}

fn func_string_length(
    args: Vec<XPathValue>,
    e_ctx: &EvaluationContext<'_>,
) -> Result<XPathValue, XPathError> {
    let value = single_arg("string-length", args)?;
    Ok(XPathValue::Number(string_of(value, e_ctx).chars().count() as f64))
}

fn func_normalize_space(
    args: Vec<XPathValue>,
    e_ctx: &EvaluationContext<'_>,
) -> Result<XPathValue, XPathError> {
    let value = single_arg("normalize-space", args)?;
    let normalized = string_of(value, e_ctx)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    Ok(XPathValue::String(normalized))
}

fn func_boolean(args: Vec<XPathValue>) -> Result<XPathValue, XPathError> {
    let result = match single_arg("boolean", args)? {
        XPathValue::NodeSet(nodes) => !nodes.is_empty(),
        XPathValue::String(s) => !s.is_empty(),
        XPathValue::Number(n) => n != 0.0 && !n.is_nan(),
        XPathValue::Boolean(b) => b,
    };
    Ok(XPathValue::Boolean(result))
}
