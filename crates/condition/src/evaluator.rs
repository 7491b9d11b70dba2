//! Two-stack evaluation of tokenized condition expressions.

use crate::error::ConditionError;
use crate::lexer::{Operator, Token, tokenize};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Integer(i64),
    Boolean(bool),
}

impl Operand {
    fn as_integer(self) -> i64 {
        match self {
            Operand::Integer(n) => n,
            Operand::Boolean(b) => i64::from(b),
        }
    }

    fn as_bool(self) -> bool {
        match self {
            Operand::Integer(n) => n != 0,
            Operand::Boolean(b) => b,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StackOperator {
    Open,
    Binary(Operator),
}

struct Stacks<'e> {
    expression: &'e str,
    operators: Vec<StackOperator>,
    values: Vec<Operand>,
}

impl Stacks<'_> {
    fn incomplete(&self) -> ConditionError {
        ConditionError::IncompleteExpression(self.expression.to_string())
    }

    fn pop_value(&mut self) -> Result<Operand, ConditionError> {
        self.values.pop().ok_or_else(|| self.incomplete())
    }

    fn pop_operator(&mut self) -> Result<StackOperator, ConditionError> {
        self.operators.pop().ok_or_else(|| self.incomplete())
    }

    /// Pops `value1` then `value2` and pushes `value2 OP value1`.
    fn reduce(&mut self, operator: StackOperator) -> Result<(), ConditionError> {
        let value1 = self.pop_value()?;
        let value2 = self.pop_value()?;
        let StackOperator::Binary(op) = operator else {
            // An unmatched '(' surfaced as an operator during the final reduction.
            return Err(ConditionError::UnknownOperator("(".to_string()));
        };
        self.values.push(Operand::Boolean(apply(op, value1, value2)));
        Ok(())
    }
}

fn apply(op: Operator, value1: Operand, value2: Operand) -> bool {
    match op {
        Operator::LessThan => value2.as_integer() < value1.as_integer(),
        Operator::LessThanOrEqual => value2.as_integer() <= value1.as_integer(),
        Operator::GreaterThan => value2.as_integer() > value1.as_integer(),
        Operator::GreaterThanOrEqual => value2.as_integer() >= value1.as_integer(),
        Operator::Equals => value2.as_integer() == value1.as_integer(),
        Operator::And => value2.as_bool() && value1.as_bool(),
        Operator::Or => value2.as_bool() || value1.as_bool(),
    }
}

/// Evaluates a boolean condition expression.
///
/// Booleans enter the operand stack as the integers `1`/`0`, so `true = 1` holds.
pub fn evaluate(expression: &str) -> Result<bool, ConditionError> {
    let tokens = tokenize(expression)?;
    let mut stacks = Stacks {
        expression,
        operators: Vec::new(),
        values: Vec::new(),
    };

    for token in tokens {
        match token {
            Token::OpenParen => stacks.operators.push(StackOperator::Open),
            Token::CloseParen => loop {
                match stacks.pop_operator()? {
                    StackOperator::Open => break,
                    operator => stacks.reduce(operator)?,
                }
            },
            Token::Operator(op) => stacks.operators.push(StackOperator::Binary(op)),
            Token::Integer(n) => stacks.values.push(Operand::Integer(n)),
            Token::Boolean(b) => stacks.values.push(Operand::Integer(i64::from(b))),
        }
    }

    while let Some(operator) = stacks.operators.pop() {
        stacks.reduce(operator)?;
    }

    let result = stacks.pop_value()?.as_bool();
    debug!("Boolean expression {} evaluates to {}", expression, result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        assert!(evaluate("(1 = 1)").unwrap());
        assert!(evaluate("(4 gt 3)").unwrap());
        assert!(!evaluate("(true and false)").unwrap());
        assert!(evaluate("((1 lt 2) or (3 gt 5))").unwrap());
    }

    #[test]
    fn test_comparison_operators() {
        assert!(evaluate("3 gt= 3").unwrap());
        assert!(!evaluate("2 lt= 1").unwrap());
        assert!(evaluate("(2 lt 10)").unwrap());
        assert!(!evaluate("(5 = 6)").unwrap());
    }

    #[test]
    fn test_boolean_combinations() {
        assert!(evaluate("(true or false)").unwrap());
        assert!(evaluate("((1 = 1) and (2 = 2))").unwrap());
        assert!(!evaluate("((1 = 1) and (2 = 3))").unwrap());
        assert!(evaluate("(true = 1)").unwrap());
        assert!(evaluate("((1 lt 2) = (3 lt 4))").unwrap());
    }

    #[test]
    fn test_unparenthesized_operators_reduce_right_to_left() {
        // 2 = 1 is reduced first, then 1 lt false(0).
        assert!(!evaluate("1 lt 2 = 1").unwrap());
        assert!(evaluate("(1 lt 2) = 1").unwrap());
    }

    #[test]
    fn test_incomplete_expressions() {
        for expression in ["", "(1 =", ")", "(1 = 1", "and"] {
            assert_eq!(
                evaluate(expression),
                Err(ConditionError::IncompleteExpression(expression.to_string())),
                "expression {:?}",
                expression
            );
        }
    }

    #[test]
    fn test_unknown_operator() {
        assert_eq!(
            evaluate("(1 ne 2)"),
            Err(ConditionError::UnknownOperator("ne".to_string()))
        );
    }
}
