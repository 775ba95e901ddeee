// src/subst.rs

use std::collections::HashSet;

use crate::ast::Term;
use crate::fresh::fresh_name;

/// Capture-avoiding substitution: `target[replacement/name]`.
///
/// Binders that would capture a free variable of `replacement` are renamed
/// first. Binders equal to `name` shadow it, so nothing below them changes.
pub fn substitute(target: &Term, name: &str, replacement: &Term) -> Term {
    Substitution {
        name,
        replacement,
        captures: replacement.free_vars(),
    }
    .apply(target)
}

/// Renames free occurrences of `old` to `new` inside `term`.
fn rename(term: &Term, old: &str, new: &str) -> Term {
    substitute(term, old, &Term::Var(new.to_string()))
}

struct Substitution<'a> {
    name: &'a str,
    replacement: &'a Term,
    // Free variables of `replacement`; a binder with one of these names would capture it.
    captures: HashSet<String>,
}

impl Substitution<'_> {
    fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Var(n) if n == self.name => self.replacement.clone(),
            Term::Var(_) | Term::Num(_) | Term::Nil => term.clone(),

            Term::Abs(param, body) => {
                if param == self.name {
                    return term.clone();
                }
                match self.fresh_binder(param, &[body.as_ref()]) {
                    Some(fresh) => {
                        let body = rename(body, param, &fresh);
                        Term::Abs(fresh, Box::new(self.apply(&body)))
                    }
                    None => Term::Abs(param.clone(), Box::new(self.apply(body))),
                }
            }

            Term::Let(n, value, body) => {
                let value = Box::new(self.apply(value));
                if n == self.name {
                    return Term::Let(n.clone(), value, body.clone());
                }
                match self.fresh_binder(n, &[body.as_ref()]) {
                    Some(fresh) => {
                        let body = rename(body, n, &fresh);
                        Term::Let(fresh, value, Box::new(self.apply(&body)))
                    }
                    None => Term::Let(n.clone(), value, Box::new(self.apply(body))),
                }
            }

            Term::LetRec(n, value, body) => {
                if n == self.name {
                    return term.clone();
                }
                match self.fresh_binder(n, &[value.as_ref(), body.as_ref()]) {
                    Some(fresh) => {
                        let value = rename(value, n, &fresh);
                        let body = rename(body, n, &fresh);
                        Term::LetRec(fresh, Box::new(self.apply(&value)), Box::new(self.apply(&body)))
                    }
                    None => Term::LetRec(n.clone(), Box::new(self.apply(value)), Box::new(self.apply(body))),
                }
            }

            Term::App(func, arg) => Term::App(Box::new(self.apply(func)), Box::new(self.apply(arg))),
            Term::BinOp(op, left, right) => {
                Term::BinOp(*op, Box::new(self.apply(left)), Box::new(self.apply(right)))
            }
            Term::Neg(operand) => Term::Neg(Box::new(self.apply(operand))),
            Term::If(cond, then_branch, else_branch) => Term::If(
                Box::new(self.apply(cond)),
                Box::new(self.apply(then_branch)),
                Box::new(self.apply(else_branch)),
            ),
            Term::Cons(head, tail) => Term::Cons(Box::new(self.apply(head)), Box::new(self.apply(tail))),
            Term::Hd(list) => Term::Hd(Box::new(self.apply(list))),
            Term::Tl(list) => Term::Tl(Box::new(self.apply(list))),
            Term::Seq(first, second) => Term::Seq(Box::new(self.apply(first)), Box::new(self.apply(second))),
        }
    }

    /// Returns a replacement name for `binder` when keeping it would capture a
    /// free variable of the replacement term. `scope` is everything the binder covers.
    fn fresh_binder(&self, binder: &str, scope: &[&Term]) -> Option<String> {
        if !self.captures.contains(binder) {
            return None;
        }
        let mut avoid = self.captures.clone();
        avoid.insert(self.name.to_string());
        for term in scope {
            avoid.extend(term.names());
        }
        Some(fresh_name(binder, &avoid))
    }
}
