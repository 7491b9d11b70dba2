//! Validation of an actual XML payload against an expected control template.
//!
//! [`XmlMessageValidator`] runs the passes in order: structural comparison of the two
//! trees, the namespace binding check on the actual root, path assertions, and finally
//! variable extraction. Each pass after the first only runs when the
//! [`ValidationContext`] configures it. The first failure aborts validation.

pub mod assertions;
pub mod comparator;
pub mod context;
pub mod error;
pub mod extraction;
pub mod namespaces;
mod paths;
pub mod selector;
pub mod validator;

pub use assertions::validate_path_assertions;
pub use comparator::{TreeComparator, resolve_ignore_paths};
pub use context::{AttributeMode, ValidationContext};
pub use error::{FailureKind, ValidateError, ValidationError};
pub use extraction::extract_variables;
pub use namespaces::validate_namespaces;
pub use selector::RootQNameSelector;
pub use validator::XmlMessageValidator;
