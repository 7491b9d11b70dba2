//! Variable reference syntax and the global variable layer.

use crate::context::TestContext;
use crate::error::ContextError;
use indexmap::IndexMap;
use serde_json::Value;

pub const VARIABLE_PREFIX: &str = "${";
pub const VARIABLE_SUFFIX: &str = "}";

/// True when `expression` is exactly one `${name}` reference.
pub fn is_variable_name(expression: &str) -> bool {
    expression
        .strip_prefix(VARIABLE_PREFIX)
        .and_then(|rest| rest.strip_suffix(VARIABLE_SUFFIX))
        .is_some_and(|name| !name.contains(VARIABLE_SUFFIX))
}

/// Strips the `${` / `}` decoration if present.
pub fn cut_off_variables_prefix(expression: &str) -> &str {
    expression
        .strip_prefix(VARIABLE_PREFIX)
        .and_then(|rest| rest.strip_suffix(VARIABLE_SUFFIX))
        .unwrap_or(expression)
}

/// Renders a stored value the way it is substituted into text.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Variables defined once per suite. Every [`TestContext`] starts from a copy of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalVariables {
    variables: IndexMap<String, Value>,
}

impl GlobalVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn variables(&self) -> &IndexMap<String, Value> {
        &self.variables
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for GlobalVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Replaces every `${name}` in `text`. An unterminated `${` or an empty `${}` is kept as
/// literal text.
pub(crate) fn replace_variables_in_string(
    text: &str,
    ctx: &TestContext,
    quoting: bool,
) -> Result<String, ContextError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(VARIABLE_PREFIX) {
        let after = &rest[start + VARIABLE_PREFIX.len()..];
        let Some(end) = after.find(VARIABLE_SUFFIX) else {
            break;
        };
        let name = &after[..end];
        out.push_str(&rest[..start]);
        if name.is_empty() {
            out.push_str(VARIABLE_PREFIX);
            out.push_str(VARIABLE_SUFFIX);
        } else {
            let value = ctx.get_variable(name)?;
            if quoting {
                out.push('\'');
                out.push_str(&value);
                out.push('\'');
            } else {
                out.push_str(&value);
            }
        }
        rest = &after[end + VARIABLE_SUFFIX.len()..];
    }

    out.push_str(rest);
    Ok(out)
}
