//! Statement parsing: text to tokens, tokens to postfix, postfix to an
//! expression tree. Problem files built from such statements are read by
//! [`Problem`].

mod lexer;
mod operator;
mod postfix;
mod problem;
mod tree;

use thiserror::Error;

pub use lexer::{tokenize, Lexer};
pub use operator::OperatorTable;
pub use postfix::infix_to_postfix;
pub use problem::{Problem, ProblemError};
pub use tree::{Environment, ExpressionNode};

/// Errors raised while turning statement text into an expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing left parenthesis")]
    MissingLeftParenthesis,

    #[error("missing right parenthesis")]
    MissingRightParenthesis,

    #[error("compound expression used as an argument of `{0}`")]
    CompoundArgument(String),

    #[error("`{name}` expects {expected} argument(s), found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("unexpected `{0}`")]
    UnexpectedToken(String),

    #[error("unexpected character `{character}` at offset {offset}")]
    UnexpectedCharacter { character: char, offset: usize },

    #[error("unterminated string literal starting at offset {0}")]
    UnterminatedString(usize),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("`{0}` is missing an operand")]
    MissingOperand(String),

    #[error("{0} operands are not joined by any operator")]
    DanglingOperands(usize),

    #[error("empty expression")]
    EmptyExpression,

    #[error("`{0}` is not followed by any variable")]
    EmptyQuantifier(String),
}
