//! Variable store, function registry and the resolver that rewrites `${name}` references
//! and `prefix:function(args)` calls inside arbitrary text.

pub mod context;
pub mod error;
pub mod functions;
pub mod variables;

pub use context::{TestContext, UnknownFunctionPolicy};
pub use error::ContextError;
pub use functions::{Function, FunctionLibrary, FunctionRegistry, standard_library};
pub use variables::{GlobalVariables, cut_off_variables_prefix, is_variable_name};
