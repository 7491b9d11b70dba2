//! JSON validation configuration files.
//!
//! ```json
//! {
//!   "global_variables": { "orderId": "42" },
//!   "control_file": "order-control.xml",
//!   "ignore_paths": ["//timestamp"],
//!   "namespaces": { "o": "urn:orders" },
//!   "control_namespaces": { "": "urn:orders" },
//!   "path_assertions": { "number:/o:order/o:total": "12.5" },
//!   "extractions": { "/o:order/o:id": "orderId" },
//!   "attribute_mode": "whitelist",
//!   "unknown_functions": "fail"
//! }
//! ```

use crate::error::AssayError;
use assay_context::{FunctionRegistry, GlobalVariables, TestContext, UnknownFunctionPolicy};
use assay_tree::parse_document;
use assay_validation::{ValidationContext, XmlMessageValidator};
use indexmap::IndexMap;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Serialized form of [`UnknownFunctionPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFunctions {
    #[default]
    PassThrough,
    Fail,
}

impl From<UnknownFunctions> for UnknownFunctionPolicy {
    fn from(value: UnknownFunctions) -> Self {
        match value {
            UnknownFunctions::PassThrough => UnknownFunctionPolicy::PassThrough,
            UnknownFunctions::Fail => UnknownFunctionPolicy::Fail,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub global_variables: IndexMap<String, Value>,
    /// Inline control template.
    pub control: Option<String>,
    /// Control template file, relative to the configuration file.
    pub control_file: Option<PathBuf>,
    pub unknown_functions: UnknownFunctions,
    #[serde(flatten)]
    pub validation: ValidationContext,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ValidationConfig {
    pub fn from_json(json: &str) -> Result<Self, AssayError> {
        let config: Self = serde_json::from_str(json)?;
        if config.control.is_some() && config.control_file.is_some() {
            return Err(AssayError::Config(
                "'control' and 'control_file' are mutually exclusive".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AssayError> {
        let path = path.as_ref();
        debug!("Loading validation configuration from {}", path.display());
        let mut config = Self::from_json(&fs::read_to_string(path)?)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// The control template, read from disk when configured as a file.
    pub fn control_payload(&self) -> Result<Option<String>, AssayError> {
        if let Some(control) = &self.control {
            return Ok(Some(control.clone()));
        }
        let Some(file) = &self.control_file else {
            return Ok(None);
        };
        let path = match &self.base_dir {
            Some(base) if file.is_relative() => base.join(file),
            _ => file.clone(),
        };
        Ok(Some(fs::read_to_string(path)?))
    }

    /// A fresh test context seeded with the configured global variables.
    pub fn test_context(&self) -> TestContext {
        let globals: GlobalVariables = self
            .global_variables
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        TestContext::new(globals, Arc::new(FunctionRegistry::default()))
            .with_unknown_function_policy(self.unknown_functions.into())
    }

    /// Validates `actual` with every configured pass and returns the test context, which
    /// holds any extracted variables.
    pub fn run(&self, validator: &XmlMessageValidator, actual: &str) -> Result<TestContext, AssayError> {
        let mut test_ctx = self.test_context();
        match self.control_payload()? {
            Some(control) => validator.validate(actual, &control, &self.validation, &mut test_ctx)?,
            None => {
                let actual = parse_document(actual).map_err(assay_validation::ValidateError::from)?;
                validator.validate_documents(&actual, None, &self.validation, &mut test_ctx)?;
            }
        }
        info!("Message validation successful");
        Ok(test_ctx)
    }
}
