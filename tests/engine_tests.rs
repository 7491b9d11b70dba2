mod common;

use assay::{
    ConditionError, FunctionLibrary, FunctionRegistry, GlobalVariables, MatchOutcome,
    MatcherRegistry, RootQNameSelector, TestContext, evaluate_condition,
};
use common::fixtures::ORDER;
use common::{TestResult, test_context};
use std::sync::Arc;

#[test]
fn condition_examples() -> TestResult {
    assert!(evaluate_condition("(1 = 1)")?);
    assert!(evaluate_condition("(4 gt 3)")?);
    assert!(!evaluate_condition("(true and false)")?);
    assert!(evaluate_condition("((1 lt 2) or (3 gt 5))")?);
    assert!(matches!(
        evaluate_condition("(1 lt"),
        Err(ConditionError::IncompleteExpression(_))
    ));
    Ok(())
}

#[test]
fn conditions_built_from_resolved_text() -> TestResult {
    let mut ctx = test_context();
    ctx.set_variable("retries", "3")?;
    let condition = ctx.resolve_in_string("(${retries} lt 5) and (assay:stringLength('abc') = 3)", false)?;
    assert!(evaluate_condition(&condition)?);
    Ok(())
}

#[test]
fn text_without_dynamic_content_is_unchanged() -> TestResult {
    let ctx = test_context();
    for text in ["plain", "user@example.com", "a: b(c)", "50% off", "{json: true}"] {
        assert_eq!(ctx.resolve_in_string(text, false)?, text);
    }
    Ok(())
}

#[test]
fn contexts_share_registries_but_not_variables() -> TestResult {
    let library = FunctionLibrary::new("shop", "shop:").with_function(
        "sku",
        |args: &[String], _ctx: &TestContext| -> Result<String, assay::ContextError> {
            Ok(format!("SKU-{}", args.join("-")))
        },
    );
    let mut registry = FunctionRegistry::default();
    registry.register(library);
    let registry = Arc::new(registry);
    let globals = GlobalVariables::new().with("env", "ci");

    let mut first = TestContext::new(globals.clone(), Arc::clone(&registry));
    let second = TestContext::new(globals, Arc::clone(&registry));
    first.set_variable("env", "local")?;

    assert_eq!(first.resolve_in_string("${env}/shop:sku(1, 2)", false)?, "local/SKU-1-2");
    assert_eq!(second.resolve_in_string("${env}/assay:upperCase(x)", false)?, "ci/X");
    Ok(())
}

#[test]
fn matcher_evaluation() {
    let matchers = MatcherRegistry::default();
    assert_eq!(matchers.evaluate("@ignore@", "whatever"), Ok(MatchOutcome::Match));
    assert_eq!(matchers.evaluate("@startsWith(ab)@", "abc"), Ok(MatchOutcome::Match));
    assert!(matches!(
        matchers.evaluate("@startsWith(ab)@", "cab"),
        Ok(MatchOutcome::NoMatch(_))
    ));
    assert_eq!(matchers.evaluate("literal", "literal"), Ok(MatchOutcome::NotApplicable));
}

#[test]
fn root_qname_selector_on_fixture() -> TestResult {
    assert!(RootQNameSelector::new("{urn:shop:orders}order")?.accept(ORDER));
    assert!(RootQNameSelector::new("order")?.accept(ORDER));
    assert!(!RootQNameSelector::new("{urn:shop:meta}order")?.accept(ORDER));
    Ok(())
}
