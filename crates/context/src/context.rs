//! The per-execution [`TestContext`].

use crate::error::ContextError;
use crate::functions::{self, FunctionRegistry};
use crate::variables::{self, GlobalVariables, cut_off_variables_prefix, is_variable_name};
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// What to do with a `prefix:name(...)` call whose prefix is registered but whose function
/// is not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFunctionPolicy {
    /// Leave the call text in place.
    #[default]
    PassThrough,
    /// Fail with [`ContextError::UnknownFunction`].
    Fail,
}

/// Holds the variables of one test execution together with the shared function registry.
///
/// Global variables are copied into the local store when the context is created and on
/// [`reset`](Self::reset); later changes to the local store never touch them.
#[derive(Clone)]
pub struct TestContext {
    variables: IndexMap<String, Value>,
    global_variables: GlobalVariables,
    function_registry: Arc<FunctionRegistry>,
    unknown_function_policy: UnknownFunctionPolicy,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new(
            GlobalVariables::default(),
            Arc::new(FunctionRegistry::default()),
        )
    }
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("variables", &self.variables)
            .field("libraries", &self.function_registry.libraries().len())
            .field("unknown_function_policy", &self.unknown_function_policy)
            .finish()
    }
}

impl TestContext {
    pub fn new(global_variables: GlobalVariables, function_registry: Arc<FunctionRegistry>) -> Self {
        let variables = global_variables.variables().clone();
        Self {
            variables,
            global_variables,
            function_registry,
            unknown_function_policy: UnknownFunctionPolicy::default(),
        }
    }

    pub fn with_unknown_function_policy(mut self, policy: UnknownFunctionPolicy) -> Self {
        self.unknown_function_policy = policy;
        self
    }

    pub fn unknown_function_policy(&self) -> UnknownFunctionPolicy {
        self.unknown_function_policy
    }

    pub fn function_registry(&self) -> &Arc<FunctionRegistry> {
        &self.function_registry
    }

    pub fn variables(&self) -> &IndexMap<String, Value> {
        &self.variables
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    /// Binds `name` (with or without `${}` decoration), overwriting any existing value.
    pub fn set_variable(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ContextError> {
        let variable_name = cut_off_variables_prefix(name);
        if variable_name.trim().is_empty() {
            return Err(ContextError::InvalidName(name.to_string()));
        }
        let value = value.into();
        if value.is_null() {
            return Err(ContextError::NullValue(variable_name.to_string()));
        }
        debug!("Setting variable: {} with value: '{}'", variable_name, value);
        self.variables.insert(variable_name.to_string(), value);
        Ok(())
    }

    /// Sets every entry; `null` values are stored as the empty string.
    pub fn add_variables<I, K>(&mut self, entries: I) -> Result<(), ContextError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (name, value) in entries {
            let value = if value.is_null() {
                Value::String(String::new())
            } else {
                value
            };
            self.set_variable(name.as_ref(), value)?;
        }
        Ok(())
    }

    pub fn get_variable_object(&self, expression: &str) -> Result<&Value, ContextError> {
        let name = cut_off_variables_prefix(expression);
        self.variables
            .get(name)
            .ok_or_else(|| ContextError::UnknownVariable(name.to_string()))
    }

    pub fn get_variable(&self, expression: &str) -> Result<String, ContextError> {
        self.get_variable_object(expression)
            .map(variables::value_to_string)
    }

    /// Clears local variables and reseeds them from the global layer.
    pub fn reset(&mut self) {
        self.variables = self.global_variables.variables().clone();
    }

    /// Replaces variable references, then function calls. With `quoting` every substituted
    /// value is wrapped in single quotes.
    pub fn resolve_in_string(&self, text: &str, quoting: bool) -> Result<String, ContextError> {
        let replaced = variables::replace_variables_in_string(text, self, quoting)?;
        functions::replace_functions_in_string(&replaced, self, quoting)
    }

    /// Resolves an expression that is exactly a variable reference or a function call;
    /// anything else is returned unchanged.
    pub fn resolve_dynamic_value(&self, expression: &str) -> Result<String, ContextError> {
        if is_variable_name(expression) {
            self.get_variable(expression)
        } else if self.function_registry.is_function(expression) {
            functions::resolve_function(expression, self)
        } else {
            Ok(expression.to_string())
        }
    }

    /// Resolves every value with [`resolve_in_string`](Self::resolve_in_string) into a new map.
    pub fn resolve_in_map(
        &self,
        map: &IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>, ContextError> {
        map.iter()
            .map(|(key, value)| Ok((key.clone(), self.resolve_in_string(value, false)?)))
            .collect()
    }

    pub fn resolve_in_list(&self, list: &[String]) -> Result<Vec<String>, ContextError> {
        list.iter()
            .map(|value| self.resolve_in_string(value, false))
            .collect()
    }
}
