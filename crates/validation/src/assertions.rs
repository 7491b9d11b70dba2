//! Path-expression assertions against the actual tree.

use crate::comparator::{check_resolved_value, check_value};
use crate::error::{FailureKind, ValidateError, ValidationError};
use crate::paths::{SelectedValue, select_single};
use assay_context::TestContext;
use assay_matcher::{MatcherRegistry, is_placeholder};
use assay_tree::{Document, NamespaceBindings};
use assay_xpath::{ValueType, XPathValue};
use indexmap::IndexMap;
use log::{debug, info};

/// Evaluates every `path -> expected` pair against `actual`.
///
/// Paths and expected values are resolved through `test_ctx` first. A `number:` or
/// `boolean:` tag coerces the selected value and compares numerically or logically when
/// the expected value parses as that type.
pub fn validate_path_assertions(
    actual: &Document,
    assertions: &IndexMap<String, String>,
    namespaces: &NamespaceBindings,
    test_ctx: &TestContext,
    matchers: &MatcherRegistry,
) -> Result<(), ValidateError> {
    for (path, expected) in assertions {
        let path = test_ctx.resolve_in_string(path, false)?;
        let selected = select_single(actual, &path, namespaces)?;
        debug!(
            "Path assertion '{}' selected '{}' at '{}'",
            path, selected.text, selected.path
        );

        match selected.value_type {
            ValueType::Node | ValueType::String => {
                check_value(expected, &selected.text, &selected.path, test_ctx, matchers)?
            }
            ValueType::Number => {
                let value = coerce_number(&selected)?;
                compare_typed(expected, value, parse_number, &selected, test_ctx, matchers)?
            }
            ValueType::Boolean => {
                let value = coerce_boolean(&selected)?;
                compare_typed(expected, value, parse_boolean, &selected, test_ctx, matchers)?
            }
        }
    }

    if !assertions.is_empty() {
        info!("Path assertions successful: {} value(s) OK", assertions.len());
    }
    Ok(())
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim() {
        t if t.eq_ignore_ascii_case("true") => Some(true),
        t if t.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn coercion_error(selected: &SelectedValue, target: ValueType) -> ValidateError {
    ValidationError::new(FailureKind::InvalidCoercion, selected.path.as_str())
        .actual(selected.text.as_str())
        .reason(format!(
            "Value '{}' can not be converted to {}",
            selected.text,
            target.tag()
        ))
        .into()
}

fn coerce_number(selected: &SelectedValue) -> Result<f64, ValidateError> {
    match selected.value {
        XPathValue::Number(n) => Ok(n),
        _ => parse_number(&selected.text).ok_or_else(|| coercion_error(selected, ValueType::Number)),
    }
}

fn coerce_boolean(selected: &SelectedValue) -> Result<bool, ValidateError> {
    match selected.value {
        XPathValue::Boolean(b) => Ok(b),
        _ => parse_boolean(&selected.text)
            .ok_or_else(|| coercion_error(selected, ValueType::Boolean)),
    }
}

/// Typed equality when the resolved expected value parses as `T`; otherwise the regular
/// leaf pipeline on the selected text.
fn compare_typed<T: PartialEq>(
    expected_raw: &str,
    actual: T,
    parse: fn(&str) -> Option<T>,
    selected: &SelectedValue,
    test_ctx: &TestContext,
    matchers: &MatcherRegistry,
) -> Result<(), ValidateError> {
    let expected = test_ctx.resolve_in_string(expected_raw, false)?;
    if is_placeholder(&expected) {
        return check_resolved_value(&expected, &selected.text, &selected.path, matchers);
    }
    match parse(&expected) {
        Some(value) if value == actual => Ok(()),
        Some(_) => Err(ValidationError::new(FailureKind::ValueMismatch, selected.path.as_str())
            .expected(expected)
            .actual(selected.text.as_str())
            .reason("Values not equal")
            .into()),
        None => check_resolved_value(&expected, &selected.text, &selected.path, matchers),
    }
}
