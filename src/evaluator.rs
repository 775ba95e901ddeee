// src/evaluator.rs

use tracing::trace;

use crate::ast::{BinOp, Term};
use crate::error::{EvalError, RunError};
use crate::subst::substitute;

// --- Step limits ---

/// Observes every contraction the evaluator performs, including the ones made
/// while forcing operands of strict primitives. A limit can stop evaluation by
/// returning an error.
pub trait Limit {
    type Error: From<EvalError>;

    fn tick(&mut self, term: &Term) -> Result<(), Self::Error>;
}

/// No bound at all: a diverging program never returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbounded;

impl Limit for Unbounded {
    type Error = EvalError;

    fn tick(&mut self, _term: &Term) -> Result<(), EvalError> {
        Ok(())
    }
}

/// A caller-imposed ceiling on the number of contractions.
#[derive(Debug, Clone)]
pub struct StepBudget {
    limit: usize,
    used: usize,
}

impl StepBudget {
    pub fn new(limit: usize) -> Self {
        StepBudget { limit, used: 0 }
    }

    pub fn used(&self) -> usize {
        self.used
    }
}

impl Limit for StepBudget {
    type Error = RunError;

    fn tick(&mut self, _term: &Term) -> Result<(), RunError> {
        if self.used >= self.limit {
            return Err(RunError::StepLimitExceeded(self.limit));
        }
        self.used += 1;
        Ok(())
    }
}

// --- The Evaluator ---

/// Leftmost-outermost reducer. Stops as soon as the head of the term is
/// irreducible; bodies of unapplied abstractions are never touched.
pub struct Evaluator<L: Limit = Unbounded> {
    limit: L,
    steps: usize,
}

impl Evaluator<Unbounded> {
    pub fn unbounded() -> Self {
        Evaluator::new(Unbounded)
    }
}

impl<L: Limit> Evaluator<L> {
    pub fn new(limit: L) -> Self {
        Evaluator { limit, steps: 0 }
    }

    /// Contractions performed so far, nested ones included.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn into_limit(self) -> L {
        self.limit
    }

    /// Reduces `term` until no head redex remains.
    pub fn evaluate(&mut self, term: Term) -> Result<Term, L::Error> {
        let mut current = term;
        while let Some(next) = self.step(&current)? {
            self.limit.tick(&next)?;
            self.steps += 1;
            trace!(step = self.steps, term = %next, "reduced");
            current = next;
        }
        match current {
            Term::Var(name) => Err(EvalError::UnboundVariable(name).into()),
            done => Ok(done),
        }
    }

    /// Like `evaluate`, but also forces every element of a resulting list so
    /// that the list can be printed. Abstractions are still left alone.
    pub fn normalize(&mut self, term: Term) -> Result<Term, L::Error> {
        let mut heads = Vec::new();
        let mut current = self.evaluate(term)?;
        while let Term::Cons(head, tail) = current {
            heads.push(self.normalize(*head)?);
            current = self.evaluate(*tail)?;
        }
        Ok(heads.into_iter().rev().fold(current, |tail, head| Term::cons(head, tail)))
    }

    /// Performs one head reduction. `None` means the head is irreducible.
    pub fn step(&mut self, term: &Term) -> Result<Option<Term>, L::Error> {
        match term {
            Term::App(func, arg) => {
                if let Term::Abs(param, body) = func.as_ref() {
                    return Ok(Some(substitute(body, param, arg)));
                }
                match self.step(func)? {
                    Some(func) => Ok(Some(Term::App(Box::new(func), arg.clone()))),
                    None => Err(match func.as_ref() {
                        Term::Var(name) => EvalError::UnboundVariable(name.clone()),
                        other => EvalError::NotAFunction(other.to_string()),
                    }
                    .into()),
                }
            }

            Term::BinOp(op, left, right) => {
                let left = self.evaluate((**left).clone())?;
                let right = self.evaluate((**right).clone())?;
                self.apply_binop(*op, left, right).map(Some)
            }

            Term::Neg(operand) => match self.evaluate((**operand).clone())? {
                Term::Num(n) => Ok(Some(Term::Num(-n))),
                other => Err(EvalError::type_mismatch("-", "a number", other).into()),
            },

            Term::If(cond, then_branch, else_branch) => match self.evaluate((**cond).clone())? {
                Term::Num(n) if n != 0.0 => Ok(Some((**then_branch).clone())),
                Term::Num(_) => Ok(Some((**else_branch).clone())),
                other => Err(EvalError::type_mismatch("if", "a number", other).into()),
            },

            Term::Let(name, value, body) => Ok(Some(Term::App(
                Box::new(Term::Abs(name.clone(), body.clone())),
                value.clone(),
            ))),

            Term::LetRec(name, value, body) => {
                trace!(name = %name, "unfolding recursive binding");
                let unfolded = Term::LetRec(name.clone(), value.clone(), value.clone());
                Ok(Some(substitute(body, name, &unfolded)))
            }

            Term::Hd(list) => match self.evaluate((**list).clone())? {
                Term::Cons(head, _) => Ok(Some(*head)),
                other => Err(EvalError::type_mismatch("hd", "a non-empty list", other).into()),
            },

            Term::Tl(list) => match self.evaluate((**list).clone())? {
                Term::Cons(_, tail) => Ok(Some(*tail)),
                other => Err(EvalError::type_mismatch("tl", "a non-empty list", other).into()),
            },

            Term::Seq(first, second) => {
                self.evaluate((**first).clone())?;
                Ok(Some((**second).clone()))
            }

            Term::Var(_) | Term::Abs(_, _) | Term::Num(_) | Term::Nil | Term::Cons(_, _) => Ok(None),
        }
    }

    fn apply_binop(&mut self, op: BinOp, left: Term, right: Term) -> Result<Term, L::Error> {
        if op == BinOp::Eq {
            return Ok(truth(self.structurally_equal(left, right)?));
        }
        let (a, b) = match (left, right) {
            (Term::Num(a), Term::Num(b)) => (a, b),
            (Term::Num(_), other) | (other, _) => {
                return Err(EvalError::type_mismatch(op.symbol(), "a number", other).into())
            }
        };
        Ok(match op {
            BinOp::Add => Term::Num(a + b),
            BinOp::Sub => Term::Num(a - b),
            BinOp::Mul => Term::Num(a * b),
            BinOp::Le => truth(a <= b),
            BinOp::Eq => truth(a == b),
        })
    }

    /// `==` on evaluated operands: numbers compare numerically, lists compare
    /// element by element (forcing as it goes), mismatched shapes are unequal.
    fn structurally_equal(&mut self, left: Term, right: Term) -> Result<bool, L::Error> {
        let (mut left, mut right) = (left, right);
        loop {
            match (left, right) {
                (Term::Num(a), Term::Num(b)) => return Ok(a == b),
                (Term::Nil, Term::Nil) => return Ok(true),
                (Term::Cons(h1, t1), Term::Cons(h2, t2)) => {
                    let h1 = self.evaluate(*h1)?;
                    let h2 = self.evaluate(*h2)?;
                    if !self.structurally_equal(h1, h2)? {
                        return Ok(false);
                    }
                    left = self.evaluate(*t1)?;
                    right = self.evaluate(*t2)?;
                }
                (abs @ Term::Abs(_, _), _) | (_, abs @ Term::Abs(_, _)) => {
                    return Err(EvalError::type_mismatch("==", "a number or a list", abs).into())
                }
                _ => return Ok(false),
            }
        }
    }
}

fn truth(b: bool) -> Term {
    Term::Num(if b { 1.0 } else { 0.0 })
}

// --- Convenience entry points without a step limit ---

pub fn step(term: &Term) -> Result<Option<Term>, EvalError> {
    Evaluator::unbounded().step(term)
}

pub fn evaluate(term: Term) -> Result<Term, EvalError> {
    Evaluator::unbounded().evaluate(term)
}

pub fn normalize(term: Term) -> Result<Term, EvalError> {
    Evaluator::unbounded().normalize(term)
}
