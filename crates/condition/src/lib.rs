//! Boolean condition expressions such as `((1 lt 2) or (3 gt 5))`.
//!
//! The grammar has no precedence beyond parentheses: a tokenizer produces operands,
//! operators and parentheses, and a two-stack evaluator reduces them. Reduction order
//! is significant and fixed: `)` reduces back to its `(`, and whatever remains after
//! the scan is reduced from the top of the stacks down.

pub mod error;
pub mod evaluator;
pub mod lexer;

pub use error::ConditionError;
pub use evaluator::evaluate;
pub use lexer::{Operator, Token, tokenize};
