//! Per-message validation settings.

use assay_tree::NamespaceBindings;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

/// How attributes present only in the actual payload are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// Extra actual attributes are tolerated.
    #[default]
    Whitelist,
    /// Every actual attribute must be expected or ignored.
    Exhaustive,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValidationContext {
    /// Path expressions selecting actual nodes to skip, subtrees included.
    pub ignore_paths: IndexSet<String>,
    /// Prefix bindings used when evaluating path expressions.
    pub namespaces: NamespaceBindings,
    /// Bindings the actual root element must declare, exactly. Empty disables the check.
    pub control_namespaces: NamespaceBindings,
    /// Path expression to expected value.
    pub path_assertions: IndexMap<String, String>,
    /// Path expression to the variable receiving the selected value.
    pub extractions: IndexMap<String, String>,
    pub attribute_mode: AttributeMode,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore(mut self, path: impl Into<String>) -> Self {
        self.ignore_paths.insert(path.into());
        self
    }

    pub fn namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), uri.into());
        self
    }

    pub fn expect_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.control_namespaces.insert(prefix.into(), uri.into());
        self
    }

    pub fn assert_path(mut self, path: impl Into<String>, expected: impl Into<String>) -> Self {
        self.path_assertions.insert(path.into(), expected.into());
        self
    }

    pub fn extract(mut self, path: impl Into<String>, variable: impl Into<String>) -> Self {
        self.extractions.insert(path.into(), variable.into());
        self
    }

    pub fn attribute_mode(mut self, mode: AttributeMode) -> Self {
        self.attribute_mode = mode;
        self
    }
}
