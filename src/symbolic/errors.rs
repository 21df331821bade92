//! Typed failures shared by the builders, parser, evaluator and differentiator.
//!
//! Every failure is deterministic for a given input and is surfaced exactly once
//! to the caller; nothing falls back to NaN or an empty string. The `Display`
//! messages are the one-line strings the command-line front end prints.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Malformed input text. `position` is the byte offset into the input.
    #[error("parse error at position {position}: {reason}")]
    Parse { position: usize, reason: String },

    /// Operator symbol outside `{+, -, *, /, ^}`.
    #[error("invalid operator `{0}`")]
    InvalidOperator(char),

    /// Function name outside `{sin, cos, ln, exp}`.
    #[error("invalid function `{0}`")]
    InvalidFunction(String),

    /// Variable name that is empty or not `[A-Za-z_][A-Za-z0-9_]*`.
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    /// Evaluation reached a variable with no binding.
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    /// The divisor evaluated to exactly 0.0.
    #[error("division by zero")]
    DivisionByZero,

    /// `ln` applied to a non-positive argument.
    #[error("ln is undefined for non-positive argument {0}")]
    DomainError(f64),

    /// Input nesting deeper than the engine is willing to recurse into.
    #[error("expression nesting exceeds the supported depth")]
    RecursionLimitExceeded,
}

impl ExprError {
    pub fn parse(position: usize, reason: impl Into<String>) -> Self {
        ExprError::Parse {
            position,
            reason: reason.into(),
        }
    }
}
