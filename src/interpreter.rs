// src/interpreter.rs

use std::path::Path;

use tracing::debug;

use crate::ast::Term;
use crate::error::RunError;
use crate::evaluator::{Evaluator, StepBudget};
use crate::parser::parse;

/// Source text in, printable result out. Evaluation is unbounded unless a
/// step limit is configured.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    step_limit: Option<usize>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::default()
    }

    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn step_limit(&self) -> Option<usize> {
        self.step_limit
    }

    pub fn run(&self, source: &str) -> Result<Term, RunError> {
        let term = parse(source)?;
        debug!(term = %term, "parsed");
        self.run_term(term)
    }

    pub fn run_term(&self, term: Term) -> Result<Term, RunError> {
        let (result, steps) = match self.step_limit {
            Some(limit) => {
                let mut evaluator = Evaluator::new(StepBudget::new(limit));
                (evaluator.normalize(term)?, evaluator.steps())
            }
            None => {
                let mut evaluator = Evaluator::unbounded();
                (evaluator.normalize(term)?, evaluator.steps())
            }
        };
        debug!(steps, result = %result, "evaluated");
        Ok(result)
    }

    pub fn interpret(&self, source: &str) -> Result<String, RunError> {
        Ok(self.run(source)?.to_string())
    }
}

/// Parses and evaluates `source` without a step limit, rendering the result.
pub fn interpret(source: &str) -> Result<String, RunError> {
    Interpreter::new().interpret(source)
}

/// An argument naming an existing file is read from disk; anything else is
/// taken to be the program text itself.
pub fn read_program(input: &str) -> Result<String, RunError> {
    let path = Path::new(input);
    if path.is_file() {
        std::fs::read_to_string(path).map_err(|source| RunError::Io {
            path: path.to_path_buf(),
            source,
        })
    } else {
        Ok(input.to_string())
    }
}
