//! Built-in validation matchers.

use crate::error::MatcherError;
use crate::registry::{MatchResult, MatcherRegistry};
use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

type Outcome = Result<MatchResult, MatcherError>;

pub(crate) fn register_builtins(registry: &mut MatcherRegistry) {
    registry.register("ignore", ignore);
    registry.register("startsWith", starts_with);
    registry.register("endsWith", ends_with);
    registry.register("contains", contains);
    registry.register("containsIgnoreCase", contains_ignore_case);
    registry.register("equalsIgnoreCase", equals_ignore_case);
    registry.register("matches", matches);
    registry.register("isNumber", is_number);
    registry.register("greaterThan", greater_than);
    registry.register("lowerThan", lower_than);
    registry.register("isEmpty", is_empty);
    registry.register("notEmpty", not_empty);
    registry.register("stringLength", string_length);
    registry.register("matchesDatePattern", matches_date_pattern);
}

fn check(condition: bool, reason: impl FnOnce() -> String) -> Outcome {
    Ok(if condition {
        MatchResult::Match
    } else {
        MatchResult::NoMatch(reason())
    })
}

fn invalid_argument(matcher: &str, argument: &str, message: impl Into<String>) -> MatcherError {
    MatcherError::InvalidArgument {
        matcher: matcher.to_string(),
        argument: argument.to_string(),
        message: message.into(),
    }
}

fn numeric_argument(matcher: &str, argument: &str) -> Result<f64, MatcherError> {
    argument
        .trim()
        .parse()
        .map_err(|_| invalid_argument(matcher, argument, "not a number"))
}

fn ignore(_actual: &str, _argument: &str) -> Outcome {
    Ok(MatchResult::Match)
}

fn starts_with(actual: &str, argument: &str) -> Outcome {
    check(actual.starts_with(argument), || {
        format!("'{}' does not start with '{}'", actual, argument)
    })
}

fn ends_with(actual: &str, argument: &str) -> Outcome {
    check(actual.ends_with(argument), || {
        format!("'{}' does not end with '{}'", actual, argument)
    })
}

fn contains(actual: &str, argument: &str) -> Outcome {
    check(actual.contains(argument), || {
        format!("'{}' does not contain '{}'", actual, argument)
    })
}

fn contains_ignore_case(actual: &str, argument: &str) -> Outcome {
    check(
        actual.to_lowercase().contains(&argument.to_lowercase()),
        || format!("'{}' does not contain '{}' ignoring case", actual, argument),
    )
}

fn equals_ignore_case(actual: &str, argument: &str) -> Outcome {
    check(actual.to_lowercase() == argument.to_lowercase(), || {
        format!("'{}' is not equal to '{}' ignoring case", actual, argument)
    })
}

/// The whole value must match the regular expression.
fn matches(actual: &str, argument: &str) -> Outcome {
    let regex = Regex::new(&format!("^(?:{})$", argument))
        .map_err(|e| invalid_argument("matches", argument, e.to_string()))?;
    check(regex.is_match(actual), || {
        format!("'{}' does not match pattern '{}'", actual, argument)
    })
}

fn is_number(actual: &str, _argument: &str) -> Outcome {
    check(actual.trim().parse::<f64>().is_ok(), || {
        format!("'{}' is not a number", actual)
    })
}

fn greater_than(actual: &str, argument: &str) -> Outcome {
    let limit = numeric_argument("greaterThan", argument)?;
    let value = actual.trim().parse::<f64>().ok();
    check(value.is_some_and(|v| v > limit), || {
        format!("'{}' is not greater than {}", actual, argument)
    })
}

fn lower_than(actual: &str, argument: &str) -> Outcome {
    let limit = numeric_argument("lowerThan", argument)?;
    let value = actual.trim().parse::<f64>().ok();
    check(value.is_some_and(|v| v < limit), || {
        format!("'{}' is not lower than {}", actual, argument)
    })
}

fn is_empty(actual: &str, _argument: &str) -> Outcome {
    check(actual.is_empty(), || format!("'{}' is not empty", actual))
}

fn not_empty(actual: &str, _argument: &str) -> Outcome {
    check(!actual.is_empty(), || "value is empty".to_string())
}

fn string_length(actual: &str, argument: &str) -> Outcome {
    let expected: usize = argument
        .trim()
        .parse()
        .map_err(|_| invalid_argument("stringLength", argument, "not a valid length"))?;
    let length = actual.chars().count();
    check(length == expected, || {
        format!("'{}' has length {}, expected {}", actual, length, expected)
    })
}

/// Accepts values parseable as a date-time, date or time in the given strftime format.
fn matches_date_pattern(actual: &str, argument: &str) -> Outcome {
    if argument.is_empty() || StrftimeItems::new(argument).any(|item| matches!(item, Item::Error)) {
        return Err(invalid_argument(
            "matchesDatePattern",
            argument,
            "not a valid date format",
        ));
    }
    let parsed = NaiveDateTime::parse_from_str(actual, argument).is_ok()
        || NaiveDate::parse_from_str(actual, argument).is_ok()
        || NaiveTime::parse_from_str(actual, argument).is_ok();
    check(parsed, || {
        format!("'{}' does not match date pattern '{}'", actual, argument)
    })
}
