//! Recognition of `@name(argument)@` placeholders.

pub const MATCHER_MARKER: char = '@';
const ARGUMENT_END: &str = ")@";

/// A parsed placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherExpression {
    pub name: String,
    /// The argument with one pair of surrounding single quotes removed.
    pub argument: Option<String>,
}

fn is_matcher_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Parses `expected` as a placeholder. Anything that is not exactly one placeholder
/// (after trimming surrounding whitespace) yields `None`.
pub fn parse_placeholder(expected: &str) -> Option<MatcherExpression> {
    let trimmed = expected.trim();
    let inner = trimmed
        .strip_prefix(MATCHER_MARKER)?
        .strip_suffix(MATCHER_MARKER)?;

    let Some(open) = inner.find('(') else {
        return is_matcher_name(inner).then(|| MatcherExpression {
            name: inner.to_string(),
            argument: None,
        });
    };

    let name = &inner[..open];
    let argument = inner[open + 1..].strip_suffix(')')?;
    if !is_matcher_name(name) || argument.contains(ARGUMENT_END) {
        return None;
    }
    let argument = argument
        .strip_prefix('\'')
        .and_then(|a| a.strip_suffix('\''))
        .unwrap_or(argument);

    Some(MatcherExpression {
        name: name.to_string(),
        argument: Some(argument.to_string()),
    })
}

pub fn is_placeholder(expected: &str) -> bool {
    parse_placeholder(expected).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(name: &str, argument: Option<&str>) -> Option<MatcherExpression> {
        Some(MatcherExpression {
            name: name.to_string(),
            argument: argument.map(str::to_string),
        })
    }

    #[test]
    fn test_bare_and_argument_forms() {
        assert_eq!(parse_placeholder("@ignore@"), expr("ignore", None));
        assert_eq!(
            parse_placeholder("  @startsWith('Hello')@ \n"),
            expr("startsWith", Some("Hello"))
        );
        assert_eq!(
            parse_placeholder("@greaterThan(5)@"),
            expr("greaterThan", Some("5"))
        );
        assert_eq!(parse_placeholder("@isEmpty()@"), expr("isEmpty", Some("")));
        assert_eq!(
            parse_placeholder("@matches('(a|b)+')@"),
            expr("matches", Some("(a|b)+"))
        );
    }

    #[test]
    fn test_non_placeholders() {
        for value in [
            "plain",
            "@",
            "@@",
            "user@example.com",
            "@startsWith('a'",
            "@contains(a)@ and @contains(b)@",
            "@bad name@",
            "x @ignore@",
        ] {
            assert!(!is_placeholder(value), "value {:?}", value);
        }
    }
}
