pub mod fixtures;

use assay::{
    FailureKind, MatcherRegistry, TestContext, ValidateError, ValidationContext,
    XmlMessageValidator,
};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A test context with a few variables used by the fixtures.
pub fn test_context() -> TestContext {
    let mut ctx = TestContext::default();
    ctx.set_variable("orderId", "4711").expect("valid variable");
    ctx.set_variable("customer", "ACME").expect("valid variable");
    ctx
}

pub fn validator() -> XmlMessageValidator {
    XmlMessageValidator::new(Arc::new(MatcherRegistry::default()))
}

pub fn validate(
    actual: &str,
    control: &str,
    validation_ctx: &ValidationContext,
) -> Result<(), ValidateError> {
    init_logger();
    let mut test_ctx = test_context();
    validator().validate(actual, control, validation_ctx, &mut test_ctx)
}

/// Unwraps the validation failure of a result, panicking on anything else.
pub fn failure_of(result: Result<(), ValidateError>) -> assay::ValidationError {
    match result {
        Err(ValidateError::Validation(e)) => e,
        other => panic!("expected a validation failure, got {:?}", other),
    }
}

pub fn assert_failure(result: Result<(), ValidateError>, kind: FailureKind, path: &str) {
    let failure = failure_of(result);
    assert_eq!(failure.kind, kind, "unexpected failure: {}", failure);
    assert_eq!(failure.path, path, "unexpected failure: {}", failure);
}
