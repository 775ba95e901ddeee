// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reducing a term.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Unbound variable: '{0}'")]
    UnboundVariable(String),
    #[error("Cannot apply a non-function value: {0}")]
    NotAFunction(String),
    #[error("Type error: '{op}' expects {expected}, but got {found}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: String,
    },
}

impl EvalError {
    pub fn type_mismatch(op: &'static str, expected: &'static str, found: impl ToString) -> Self {
        EvalError::TypeMismatch { op, expected, found: found.to_string() }
    }
}

#[derive(Debug, PartialEq, Error)]
#[error("Parse error at {line}:{col}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("Unexpected character: '{0}'")]
    UnexpectedChar(char),
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),
}

/// Everything that can stop a program run, including conditions imposed by
/// the caller (the step budget) rather than by the evaluator itself.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("Evaluation exceeded the step limit of {0}")]
    StepLimitExceeded(usize),
    #[error("Failed to read file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
