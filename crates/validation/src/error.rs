use assay_context::ContextError;
use assay_matcher::MatcherError;
use assay_tree::TreeError;
use assay_xpath::XPathError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    RootMismatch,
    MissingAttribute,
    UnexpectedAttribute,
    MissingChild,
    UnexpectedChild,
    ValueMismatch,
    MatcherFailed,
    MissingNamespace,
    UnexpectedNamespace,
    NamespaceMismatch,
    PathNotFound,
    AmbiguousPath,
    InvalidCoercion,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureKind::RootMismatch => "root element mismatch",
            FailureKind::MissingAttribute => "missing attribute",
            FailureKind::UnexpectedAttribute => "unexpected attribute",
            FailureKind::MissingChild => "missing child element",
            FailureKind::UnexpectedChild => "unexpected child element",
            FailureKind::ValueMismatch => "value mismatch",
            FailureKind::MatcherFailed => "validation matcher failed",
            FailureKind::MissingNamespace => "missing namespace",
            FailureKind::UnexpectedNamespace => "unexpected namespace",
            FailureKind::NamespaceMismatch => "namespace mismatch",
            FailureKind::PathNotFound => "path not found",
            FailureKind::AmbiguousPath => "ambiguous path",
            FailureKind::InvalidCoercion => "invalid coercion",
        };
        f.write_str(text)
    }
}

/// A single validation failure with the location it was found at.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Validation failed ({kind}) at '{path}': {reason} (expected '{expected}', actual '{actual}')")]
pub struct ValidationError {
    pub kind: FailureKind,
    pub path: String,
    pub expected: String,
    pub actual: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(kind: FailureKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            expected: String::new(),
            actual: String::new(),
            reason: kind.to_string(),
        }
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = actual.into();
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to parse message payload: {0}")]
    Tree(#[from] TreeError),

    #[error("Path expression error: {0}")]
    XPath(#[from] XPathError),

    #[error("Failed to resolve dynamic content: {0}")]
    Context(#[from] ContextError),

    #[error("Validation matcher error: {0}")]
    Matcher(#[from] MatcherError),

    #[error("Invalid root element selector '{0}'")]
    InvalidSelector(String),
}

impl ValidateError {
    /// The validation failure, if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ValidateError::Validation(e) => Some(e),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<FailureKind> {
        self.as_validation().map(|e| e.kind)
    }
}
