mod common;

use assay::{FailureKind, ValidationContext};
use common::fixtures::{ORDER, ORDER_CONTROL, order_with};
use common::{TestResult, assert_failure, failure_of, validate};

fn expected_namespaces() -> ValidationContext {
    ValidationContext::new()
        .expect_namespace("", "urn:shop:orders")
        .expect_namespace("meta", "urn:shop:meta")
}

#[test]
fn exact_bindings_pass() -> TestResult {
    validate(ORDER, ORDER_CONTROL, &expected_namespaces())?;
    Ok(())
}

#[test]
fn documented_namespace_example() -> TestResult {
    let ctx = ValidationContext::new()
        .expect_namespace("", "urn:a")
        .expect_namespace("ns1", "urn:b");
    let control = "<root xmlns='urn:a' xmlns:ns1='urn:b'/>";
    validate(control, control, &ctx)?;

    let actual = "<root xmlns='urn:a' xmlns:ns1='urn:b' xmlns:ns2='urn:c'/>";
    let failure = failure_of(validate(actual, control, &ctx));
    assert_eq!(failure.kind, FailureKind::UnexpectedNamespace);
    assert!(failure.reason.contains("unexpected extra binding"));
    Ok(())
}

#[test]
fn missing_binding_fails() {
    let actual = order_with(" xmlns:meta=\"urn:shop:meta\"", "")
        .replace("meta:trace", "trace");
    let control = ORDER_CONTROL.replace(" xmlns:meta=\"urn:shop:meta\"", "")
        .replace("meta:trace", "trace");
    assert_failure(
        validate(&actual, &control, &expected_namespaces()),
        FailureKind::MissingNamespace,
        "order",
    );
}

#[test]
fn rebound_prefix_fails() {
    let actual = order_with("urn:shop:meta", "urn:shop:metadata");
    let ctx = expected_namespaces();
    // The structural pass already fails on the renamed meta:trace namespace.
    assert_failure(validate(&actual, ORDER_CONTROL, &ctx), FailureKind::MissingChild, "order/meta:trace");

    let ignore_trace = ctx.namespace("m", "urn:shop:metadata").ignore("//m:trace");
    let control = ORDER_CONTROL.replace("<meta:trace>@ignore@</meta:trace>", "");
    assert_failure(
        validate(&actual, &control, &ignore_trace),
        FailureKind::NamespaceMismatch,
        "order",
    );
}
