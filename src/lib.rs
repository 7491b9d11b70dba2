//! Dynamic content resolution and structural validation of test message payloads.
//!
//! The workspace is split into focused crates which this package re-exports:
//!
//! - [`tree`]: the structural tree and XML parser;
//! - [`xpath`]: path expressions over the tree;
//! - [`context`]: test variables, function libraries and the expression resolver;
//! - [`matcher`]: `@name(argument)@` validation matchers;
//! - [`validation`]: the tree comparator and the namespace, path and extraction passes;
//! - [`condition`]: the boolean condition evaluator.
//!
//! [`ValidationConfig`] loads a JSON description of a validation and runs it.

pub mod config;
pub mod error;

pub use assay_condition as condition;
pub use assay_context as context;
pub use assay_matcher as matcher;
pub use assay_tree as tree;
pub use assay_validation as validation;
pub use assay_xpath as xpath;

pub use assay_condition::{ConditionError, evaluate as evaluate_condition};
pub use assay_context::{
    ContextError, FunctionLibrary, FunctionRegistry, GlobalVariables, TestContext,
    UnknownFunctionPolicy,
};
pub use assay_matcher::{MatchOutcome, MatcherRegistry};
pub use assay_tree::{Document, parse_document};
pub use assay_validation::{
    AttributeMode, FailureKind, RootQNameSelector, ValidateError, ValidationContext,
    ValidationError, XmlMessageValidator,
};
pub use config::{UnknownFunctions, ValidationConfig};
pub use error::AssayError;
