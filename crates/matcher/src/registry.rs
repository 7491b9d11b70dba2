//! Name-keyed matcher lookup and placeholder evaluation.

use crate::error::MatcherError;
use crate::matchers;
use crate::placeholder::parse_placeholder;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of a single matcher predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Match,
    NoMatch(String),
}

/// Result of evaluating an expected value that may or may not be a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The expected value is not a placeholder; compare it by equality instead.
    NotApplicable,
    Match,
    NoMatch(String),
}

/// A predicate over an actual value and the placeholder's argument (empty when absent).
pub trait ValidationMatcher: Send + Sync {
    fn validate(&self, actual: &str, argument: &str) -> Result<MatchResult, MatcherError>;
}

impl<F> ValidationMatcher for F
where
    F: Fn(&str, &str) -> Result<MatchResult, MatcherError> + Send + Sync,
{
    fn validate(&self, actual: &str, argument: &str) -> Result<MatchResult, MatcherError> {
        self(actual, argument)
    }
}

#[derive(Clone)]
pub struct MatcherRegistry {
    matchers: HashMap<String, Arc<dyn ValidationMatcher>>,
}

impl std::fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.matchers.keys().collect();
        names.sort();
        f.debug_struct("MatcherRegistry")
            .field("matchers", &names)
            .finish()
    }
}

impl Default for MatcherRegistry {
    /// A registry holding every built-in matcher.
    fn default() -> Self {
        let mut registry = Self::new();
        matchers::register_builtins(&mut registry);
        registry
    }
}

impl MatcherRegistry {
    pub fn new() -> Self {
        Self {
            matchers: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, matcher: impl ValidationMatcher + 'static) {
        self.matchers.insert(name.into(), Arc::new(matcher));
    }

    pub fn with_matcher(
        mut self,
        name: impl Into<String>,
        matcher: impl ValidationMatcher + 'static,
    ) -> Self {
        self.register(name, matcher);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn ValidationMatcher> {
        self.matchers.get(name).map(|m| m.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.matchers.contains_key(name)
    }

    /// Checks `actual` against `expected_raw` when the latter is a placeholder.
    pub fn evaluate(&self, expected_raw: &str, actual: &str) -> Result<MatchOutcome, MatcherError> {
        let Some(expression) = parse_placeholder(expected_raw) else {
            return Ok(MatchOutcome::NotApplicable);
        };
        let matcher = self
            .get(&expression.name)
            .ok_or_else(|| MatcherError::UnknownMatcher(expression.name.clone()))?;
        let argument = expression.argument.as_deref().unwrap_or_default();

        let outcome = match matcher.validate(actual, argument)? {
            MatchResult::Match => MatchOutcome::Match,
            MatchResult::NoMatch(reason) => MatchOutcome::NoMatch(reason),
        };
        debug!(
            "Validation matcher '{}' on '{}' gave {:?}",
            expression.name, actual, outcome
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_placeholder_is_not_applicable() {
        let registry = MatcherRegistry::default();
        assert_eq!(
            registry.evaluate("plain", "plain").unwrap(),
            MatchOutcome::NotApplicable
        );
    }

    #[test]
    fn test_unknown_matcher() {
        let registry = MatcherRegistry::default();
        assert_eq!(
            registry.evaluate("@frobnicate('x')@", "x"),
            Err(MatcherError::UnknownMatcher("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_custom_closure_matcher() {
        let registry = MatcherRegistry::new().with_matcher(
            "isUpper",
            |actual: &str, _argument: &str| -> Result<MatchResult, MatcherError> {
                Ok(if actual.chars().all(char::is_uppercase) {
                    MatchResult::Match
                } else {
                    MatchResult::NoMatch(format!("'{}' is not upper case", actual))
                })
            },
        );
        assert_eq!(registry.evaluate("@isUpper@", "ABC").unwrap(), MatchOutcome::Match);
        assert_eq!(
            registry.evaluate("@isUpper@", "AbC").unwrap(),
            MatchOutcome::NoMatch("'AbC' is not upper case".to_string())
        );
        assert!(!registry.contains("ignore"));
    }
}
