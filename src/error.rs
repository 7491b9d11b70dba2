use assay_condition::ConditionError;
use assay_context::ContextError;
use assay_validation::ValidateError;
use thiserror::Error;

/// Top-level error for configuration loading and the command line tool.
#[derive(Error, Debug)]
pub enum AssayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validate(#[from] ValidateError),

    #[error("Condition evaluation failed: {0}")]
    Condition(#[from] ConditionError),

    #[error("Configuration is invalid: {0}")]
    Config(String),
}

impl From<ContextError> for AssayError {
    fn from(e: ContextError) -> Self {
        AssayError::Validate(ValidateError::Context(e))
    }
}
