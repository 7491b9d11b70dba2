//! Splits a condition expression into tokens.

use crate::error::ConditionError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    And,
    Or,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Operator::Equals),
            "and" => Some(Operator::And),
            "or" => Some(Operator::Or),
            "lt" => Some(Operator::LessThan),
            "lt=" => Some(Operator::LessThanOrEqual),
            "gt" => Some(Operator::GreaterThan),
            "gt=" => Some(Operator::GreaterThanOrEqual),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::LessThan => "lt",
            Operator::LessThanOrEqual => "lt=",
            Operator::GreaterThan => "gt",
            Operator::GreaterThanOrEqual => "gt=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    OpenParen,
    CloseParen,
    Operator(Operator),
    Integer(i64),
    Boolean(bool),
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

/// Tokenizes `expression`. Digit runs become integers; any other run of non-separator,
/// non-digit characters must be `true`, `false` or a known operator.
pub fn tokenize(expression: &str) -> Result<Vec<Token>, ConditionError> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '(' {
            tokens.push(Token::OpenParen);
            i += 1;
        } else if c == ')' {
            tokens.push(Token::CloseParen);
            i += 1;
        } else if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let digits: String = chars[start..i].iter().collect();
            let value = digits
                .parse::<i64>()
                .map_err(|_| ConditionError::InvalidOperand(digits.clone()))?;
            tokens.push(Token::Integer(value));
        } else {
            let start = i;
            while i < chars.len() && !chars[i].is_ascii_digit() && !is_separator(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let token = match word.as_str() {
                "true" => Token::Boolean(true),
                "false" => Token::Boolean(false),
                other => Token::Operator(
                    Operator::from_symbol(other)
                        .ok_or_else(|| ConditionError::UnknownOperator(other.to_string()))?,
                ),
            };
            tokens.push(token);
        }
    }

    Ok(tokens)
}
