//! Validation matchers: expected values written as `@name(argument)@` or `@name@` are
//! checked by a named predicate instead of by string equality.

pub mod error;
pub mod matchers;
pub mod placeholder;
pub mod registry;

pub use error::MatcherError;
pub use placeholder::{MatcherExpression, is_placeholder, parse_placeholder};
pub use registry::{MatchOutcome, MatchResult, MatcherRegistry, ValidationMatcher};
