//! Function libraries and the registry that looks them up by prefix.

mod library;
mod resolver;

pub use library::{STANDARD_PREFIX, standard_library};
pub use resolver::{resolve_function, split_arguments};
pub(crate) use resolver::replace_functions_in_string;

use crate::context::TestContext;
use crate::error::ContextError;
use std::collections::HashMap;
use std::sync::Arc;

/// A named function callable as `prefix:name(args)`.
pub trait Function: Send + Sync {
    fn execute(&self, args: &[String], ctx: &TestContext) -> Result<String, ContextError>;
}

impl<F> Function for F
where
    F: Fn(&[String], &TestContext) -> Result<String, ContextError> + Send + Sync,
{
    fn execute(&self, args: &[String], ctx: &TestContext) -> Result<String, ContextError> {
        self(args, ctx)
    }
}

/// A set of functions sharing one prefix such as `assay:`.
#[derive(Clone)]
pub struct FunctionLibrary {
    name: String,
    prefix: String,
    functions: HashMap<String, Arc<dyn Function>>,
}

impl std::fmt::Debug for FunctionLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionLibrary")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("functions", &names)
            .finish()
    }
}

impl FunctionLibrary {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            functions: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, function: impl Function + 'static) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn with_function(mut self, name: impl Into<String>, function: impl Function + 'static) -> Self {
        self.register(name, function);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn Function> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn knows_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

/// Ordered list of function libraries. [`Default`] registers the standard library.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    libraries: Vec<FunctionLibrary>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(standard_library());
        registry
    }
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            libraries: Vec::new(),
        }
    }

    pub fn register(&mut self, library: FunctionLibrary) {
        self.libraries.push(library);
    }

    pub fn libraries(&self) -> &[FunctionLibrary] {
        &self.libraries
    }

    pub fn library_for_prefix(&self, prefix: &str) -> Option<&FunctionLibrary> {
        self.libraries.iter().find(|l| l.prefix() == prefix)
    }

    /// True when `expression` starts with the prefix of a registered library.
    pub fn is_function(&self, expression: &str) -> bool {
        let expression = crate::variables::cut_off_variables_prefix(expression);
        self.libraries
            .iter()
            .any(|l| expression.starts_with(l.prefix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_library_with_closure() {
        let library = FunctionLibrary::new("custom", "my:").with_function(
            "greet",
            |args: &[String], _ctx: &TestContext| -> Result<String, ContextError> {
                Ok(format!("hello {}", args.join(" ")))
            },
        );
        let mut registry = FunctionRegistry::new();
        registry.register(library);

        assert!(registry.is_function("my:greet('you')"));
        assert!(!registry.is_function("assay:concat('a')"));
        let ctx = TestContext::new(Default::default(), Arc::new(registry));
        assert_eq!(
            ctx.resolve_in_string("my:greet('you', 'all')!", false).unwrap(),
            "hello you all!"
        );
    }

    #[test]
    fn test_default_registry_has_standard_library() {
        let registry = FunctionRegistry::default();
        let library = registry.library_for_prefix(STANDARD_PREFIX).unwrap();
        assert!(library.knows_function("concat"));
        assert!(library.get_function("missing").is_none());
    }
}
