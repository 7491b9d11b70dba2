use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatcherError {
    #[error("Unknown validation matcher '{0}'")]
    UnknownMatcher(String),

    #[error("Invalid argument '{argument}' for validation matcher '{matcher}': {message}")]
    InvalidArgument {
        matcher: String,
        argument: String,
        message: String,
    },
}
