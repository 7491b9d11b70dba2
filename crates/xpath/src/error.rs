use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XPathError {
    #[error("Path expression parse error in '{0}': {1}")]
    XPathParse(String, String),

    #[error("Namespace prefix '{0}' is not bound in the namespace context")]
    UnknownPrefix(String),

    #[error("Function '{function}' error: {message}")]
    FunctionError { function: String, message: String },
}
