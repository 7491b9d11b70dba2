mod common;

use assay::{AssayError, ValidationConfig};
use common::fixtures::{ORDER, ORDER_CONTROL};
use common::{TestResult, init_logger, validator};
use std::fs;
use tempfile::tempdir;

#[test]
fn configuration_file_with_relative_control_file() -> TestResult {
    init_logger();
    let dir = tempdir()?;
    fs::write(dir.path().join("order-control.xml"), ORDER_CONTROL)?;
    let config_path = dir.path().join("validation.json");
    fs::write(
        &config_path,
        r#"{
            "global_variables": {"orderId": "4711"},
            "control_file": "order-control.xml",
            "namespaces": {"o": "urn:shop:orders"},
            "control_namespaces": {"": "urn:shop:orders", "meta": "urn:shop:meta"},
            "path_assertions": {"number://o:total": "7.25"},
            "extractions": {"/o:order/o:customer": "customer"}
        }"#,
    )?;

    let config = ValidationConfig::from_file(&config_path)?;
    let test_ctx = config.run(&validator(), ORDER)?;
    assert_eq!(test_ctx.get_variable("customer")?, "ACME");
    Ok(())
}

#[test]
fn missing_control_file_is_an_io_error() -> TestResult {
    let dir = tempdir()?;
    let config_path = dir.path().join("validation.json");
    fs::write(&config_path, r#"{"control_file": "nowhere.xml"}"#)?;

    let config = ValidationConfig::from_file(&config_path)?;
    let err = config.run(&validator(), ORDER).unwrap_err();
    assert!(matches!(err, AssayError::Io(_)));
    Ok(())
}

#[test]
fn malformed_configuration_is_a_json_error() -> TestResult {
    let dir = tempdir()?;
    let config_path = dir.path().join("validation.json");
    fs::write(&config_path, r#"{"attribute_mode": "sometimes"}"#)?;
    assert!(matches!(
        ValidationConfig::from_file(&config_path),
        Err(AssayError::Json(_))
    ));
    Ok(())
}

#[test]
fn strict_function_policy_from_configuration() {
    let config = ValidationConfig::from_json(
        r#"{"control": "<order>assay:shout('x')</order>", "unknown_functions": "fail"}"#,
    )
    .unwrap();
    let err = config.run(&validator(), "<order>x</order>").unwrap_err();
    assert!(err.to_string().contains("assay:shout"), "{}", err);

    let lenient = ValidationConfig::from_json(
        r#"{"control": "<order>assay:shout('x')</order>"}"#,
    )
    .unwrap();
    assert!(lenient.run(&validator(), "<order>assay:shout('x')</order>").is_ok());
}
