//! Finds `prefix:name(args)` calls in text and runs them.

use crate::context::{TestContext, UnknownFunctionPolicy};
use crate::error::ContextError;
use crate::variables::{cut_off_variables_prefix, replace_variables_in_string};
use log::debug;

pub(crate) fn replace_functions_in_string(
    text: &str,
    ctx: &TestContext,
    quoting: bool,
) -> Result<String, ContextError> {
    let mut result = text.to_string();
    for library in ctx.function_registry().libraries() {
        if result.contains(library.prefix()) {
            result = replace_library_calls(&result, library.prefix(), ctx, quoting)?;
        }
    }
    Ok(result)
}

fn replace_library_calls(
    text: &str,
    prefix: &str,
    ctx: &TestContext,
    quoting: bool,
) -> Result<String, ContextError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(prefix) {
        let after = &rest[start + prefix.len()..];
        let Some(call_len) = call_length(after) else {
            out.push_str(&rest[..start + prefix.len()]);
            rest = after;
            continue;
        };
        let end = start + prefix.len() + call_len;
        let expression = &rest[start..end];
        out.push_str(&rest[..start]);
        match call_function(expression, ctx)? {
            Some(value) if quoting => {
                out.push('\'');
                out.push_str(&value);
                out.push('\'');
            }
            Some(value) => out.push_str(&value),
            None => out.push_str(expression),
        }
        rest = &rest[end..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Length of `name(args)` at the start of `text`, or `None` if it is not a complete call.
fn call_length(text: &str) -> Option<usize> {
    let name_len = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(text.len());
    if name_len == 0 || !text[name_len..].starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_quotes = false;
    for (offset, c) in text[name_len..].char_indices() {
        match c {
            '\'' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => {
                depth -= 1;
                if depth == 0 {
                    return Some(name_len + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Runs a single function call expression such as `assay:concat('a', 'b')`.
///
/// Unknown functions follow the context's [`UnknownFunctionPolicy`]; with `PassThrough`
/// the expression is returned unchanged.
pub fn resolve_function(expression: &str, ctx: &TestContext) -> Result<String, ContextError> {
    Ok(call_function(expression, ctx)?.unwrap_or_else(|| expression.to_string()))
}

fn call_function(expression: &str, ctx: &TestContext) -> Result<Option<String>, ContextError> {
    let expression = cut_off_variables_prefix(expression).trim();
    let malformed = || ContextError::FunctionArguments {
        function: expression.to_string(),
        message: "Unable to resolve function".to_string(),
    };

    let colon = expression.find(':').ok_or_else(malformed)?;
    let open = expression.find('(').ok_or_else(malformed)?;
    if open < colon || !expression.ends_with(')') {
        return Err(malformed());
    }
    let prefix = &expression[..=colon];
    let name = &expression[colon + 1..open];
    let parameters = &expression[open + 1..expression.len() - 1];

    let function = ctx
        .function_registry()
        .library_for_prefix(prefix)
        .and_then(|library| library.get_function(name));
    let Some(function) = function else {
        return match ctx.unknown_function_policy() {
            UnknownFunctionPolicy::PassThrough => {
                debug!("Leaving unknown function call '{}' unresolved", expression);
                Ok(None)
            }
            UnknownFunctionPolicy::Fail => {
                Err(ContextError::UnknownFunction(format!("{}{}", prefix, name)))
            }
        };
    };

    let parameters = replace_variables_in_string(parameters, ctx, false)?;
    let parameters = replace_functions_in_string(&parameters, ctx, true)?;
    let args = split_arguments(&parameters);
    let value = function.execute(&args, ctx)?;
    debug!("Function {}{} resolved to '{}'", prefix, name, value);
    Ok(Some(value))
}

/// Splits a parameter string on commas outside quotes and parentheses. Each argument is
/// trimmed and loses one pair of surrounding single quotes.
pub fn split_arguments(parameters: &str) -> Vec<String> {
    if parameters.trim().is_empty() {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quotes = false;

    for c in parameters.chars() {
        match c {
            '\'' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth = depth.saturating_sub(1),
            ',' if !in_quotes && depth == 0 => {
                args.push(finish_argument(&current));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    args.push(finish_argument(&current));
    args
}

fn finish_argument(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_arguments() {
        assert_eq!(split_arguments(""), Vec::<String>::new());
        assert_eq!(split_arguments("'a', 'b'"), vec!["a", "b"]);
        assert_eq!(split_arguments("'a,b', c"), vec!["a,b", "c"]);
        assert_eq!(split_arguments("f(1, 2), 3"), vec!["f(1, 2)", "3"]);
        assert_eq!(split_arguments(" '' "), vec![""]);
    }

    #[test]
    fn test_call_length() {
        assert_eq!(call_length("concat('a', ')')!"), Some(16));
        assert_eq!(call_length("concat('a'"), None);
        assert_eq!(call_length("concat"), None);
        assert_eq!(call_length("(x)"), None);
    }

    #[test]
    fn test_nested_calls_resolve_first() {
        let ctx = TestContext::default();
        assert_eq!(
            resolve_function("assay:concat(assay:upperCase('a'), 'b')", &ctx).unwrap(),
            "Ab"
        );
        assert_eq!(
            resolve_function("assay:concat(assay:concat('x', ','), 'y')", &ctx).unwrap(),
            "x,y"
        );
    }

    #[test]
    fn test_text_without_calls_is_unchanged() {
        let ctx = TestContext::default();
        assert_eq!(
            replace_functions_in_string("assay: not a call", &ctx, false).unwrap(),
            "assay: not a call"
        );
        assert_eq!(
            replace_functions_in_string("a assay:upperCase('b') c", &ctx, true).unwrap(),
            "a 'B' c"
        );
    }

    #[test]
    fn test_malformed_expression() {
        let ctx = TestContext::default();
        assert!(matches!(
            resolve_function("assay:concat", &ctx),
            Err(ContextError::FunctionArguments { .. })
        ));
    }
}
