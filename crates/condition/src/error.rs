use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("Unable to parse boolean expression '{0}'. Maybe expression is incomplete!")]
    IncompleteExpression(String),

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("Invalid operand '{0}'")]
    InvalidOperand(String),
}
