//! Copies values out of the actual payload into test variables.

use crate::error::ValidateError;
use crate::paths::select_single;
use assay_context::{ContextError, TestContext, cut_off_variables_prefix};
use assay_tree::{Document, NamespaceBindings};
use indexmap::IndexMap;
use log::debug;

/// For every `path -> variable` entry, stores the value the path selects in `actual`.
///
/// The path is resolved through `test_ctx` first and must select exactly one node or
/// produce a scalar. Variables are only written once every path has been selected, so a
/// failing entry leaves `test_ctx` unchanged.
pub fn extract_variables(
    actual: &Document,
    extractions: &IndexMap<String, String>,
    namespaces: &NamespaceBindings,
    test_ctx: &mut TestContext,
) -> Result<(), ValidateError> {
    let mut extracted = Vec::with_capacity(extractions.len());
    for (path, variable) in extractions {
        if cut_off_variables_prefix(variable).trim().is_empty() {
            return Err(ContextError::InvalidName(variable.clone()).into());
        }
        let path = test_ctx.resolve_in_string(path, false)?;
        let selected = select_single(actual, &path, namespaces)?;
        debug!(
            "Extracted '{}' from '{}' into variable '{}'",
            selected.text, selected.path, variable
        );
        extracted.push((variable, selected.text));
    }

    for (variable, value) in extracted {
        test_ctx.set_variable(variable, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use assay_tree::parse_document;

    fn extractions(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(p, v)| (p.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extracts_nodes_and_scalars() {
        let actual = parse_document("<order id='7'><item>a</item><item>b</item></order>").unwrap();
        let mut test_ctx = TestContext::default();
        extract_variables(
            &actual,
            &extractions(&[
                ("/order/@id", "orderId"),
                ("count(//item)", "items"),
                ("//item[last()]", "lastItem"),
            ]),
            &NamespaceBindings::new(),
            &mut test_ctx,
        )
        .unwrap();

        assert_eq!(test_ctx.get_variable("orderId").unwrap(), "7");
        assert_eq!(test_ctx.get_variable("items").unwrap(), "2");
        assert_eq!(test_ctx.get_variable("lastItem").unwrap(), "b");
    }

    #[test]
    fn test_extraction_requires_a_single_node() {
        let actual = parse_document("<order><item>a</item><item>b</item></order>").unwrap();
        let mut test_ctx = TestContext::default();
        let err = extract_variables(
            &actual,
            &extractions(&[("//item", "item")]),
            &NamespaceBindings::new(),
            &mut test_ctx,
        )
        .unwrap_err();
        assert_eq!(err.kind(), Some(FailureKind::AmbiguousPath));
        assert!(test_ctx.get_variable("item").is_err());
    }

    #[test]
    fn test_failed_extraction_leaves_context_untouched() {
        let actual = parse_document("<order><id>7</id></order>").unwrap();
        let mut test_ctx = TestContext::default();
        test_ctx.set_variable("first", "before").unwrap();

        let err = extract_variables(
            &actual,
            &extractions(&[("/order/id", "first"), ("/order/missing", "second")]),
            &NamespaceBindings::new(),
            &mut test_ctx,
        )
        .unwrap_err();
        assert_eq!(err.kind(), Some(FailureKind::PathNotFound));
        assert_eq!(test_ctx.get_variable("first").unwrap(), "before");
        assert!(test_ctx.get_variable("second").is_err());
    }

    #[test]
    fn test_invalid_variable_name_is_rejected_before_writing() {
        let actual = parse_document("<order><id>7</id></order>").unwrap();
        let mut test_ctx = TestContext::default();
        let err = extract_variables(
            &actual,
            &extractions(&[("/order/id", "first"), ("count(/order)", "${}")]),
            &NamespaceBindings::new(),
            &mut test_ctx,
        )
        .unwrap_err();
        assert!(matches!(err, ValidateError::Context(ContextError::InvalidName(_))));
        assert!(test_ctx.get_variable("first").is_err());
    }
}
