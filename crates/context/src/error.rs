use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    #[error("Can not create variable '{0}', please define proper variable name")]
    InvalidName(String),

    #[error("Trying to set variable: {0}, but variable value is null")]
    NullValue(String),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("Can not find function '{0}' in any registered function library")]
    UnknownFunction(String),

    #[error("Invalid use of function '{function}': {message}")]
    FunctionArguments { function: String, message: String },
}
