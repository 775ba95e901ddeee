// src/ast.rs

use std::collections::HashSet;
use std::fmt;

/// Binary primitives. All of them are strict in both operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Eq,
    Le,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Eq => "==",
            BinOp::Le => "<=",
        }
    }
}

// AST Definition
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Var(String),
    Abs(String, Box<Term>),
    App(Box<Term>, Box<Term>),
    Num(f64),
    BinOp(BinOp, Box<Term>, Box<Term>),
    Neg(Box<Term>),
    If(Box<Term>, Box<Term>, Box<Term>),
    Let(String, Box<Term>, Box<Term>),
    LetRec(String, Box<Term>, Box<Term>),
    Nil,
    Cons(Box<Term>, Box<Term>),
    Hd(Box<Term>),
    Tl(Box<Term>),
    Seq(Box<Term>, Box<Term>),
}

// --- Constructors ---
impl Term {
    pub fn var(name: impl Into<String>) -> Term {
        Term::Var(name.into())
    }

    pub fn num(value: f64) -> Term {
        Term::Num(value)
    }

    pub fn abs(param: impl Into<String>, body: Term) -> Term {
        Term::Abs(param.into(), Box::new(body))
    }

    pub fn app(func: Term, arg: Term) -> Term {
        Term::App(Box::new(func), Box::new(arg))
    }

    pub fn binop(op: BinOp, left: Term, right: Term) -> Term {
        Term::BinOp(op, Box::new(left), Box::new(right))
    }

    pub fn neg(operand: Term) -> Term {
        Term::Neg(Box::new(operand))
    }

    pub fn if_then_else(cond: Term, then_branch: Term, else_branch: Term) -> Term {
        Term::If(Box::new(cond), Box::new(then_branch), Box::new(else_branch))
    }

    pub fn let_in(name: impl Into<String>, value: Term, body: Term) -> Term {
        Term::Let(name.into(), Box::new(value), Box::new(body))
    }

    pub fn let_rec(name: impl Into<String>, value: Term, body: Term) -> Term {
        Term::LetRec(name.into(), Box::new(value), Box::new(body))
    }

    pub fn cons(head: Term, tail: Term) -> Term {
        Term::Cons(Box::new(head), Box::new(tail))
    }

    pub fn hd(list: Term) -> Term {
        Term::Hd(Box::new(list))
    }

    pub fn tl(list: Term) -> Term {
        Term::Tl(Box::new(list))
    }

    pub fn seq(first: Term, second: Term) -> Term {
        Term::Seq(Box::new(first), Box::new(second))
    }
}

// --- Variable queries ---
impl Term {
    /// Names occurring free in the term.
    pub fn free_vars(&self) -> HashSet<String> {
        let mut free = HashSet::new();
        let mut bound = Vec::new();
        collect_free(self, &mut bound, &mut free);
        free
    }

    pub fn occurs_free(&self, name: &str) -> bool {
        self.free_vars().contains(name)
    }

    pub fn is_closed(&self) -> bool {
        self.free_vars().is_empty()
    }

    /// Every name in the term, free or bound, binders included.
    pub fn names(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        collect_names(self, &mut names);
        names
    }
}

fn collect_free(term: &Term, bound: &mut Vec<String>, free: &mut HashSet<String>) {
    match term {
        Term::Var(name) => {
            if !bound.iter().any(|b| b == name) {
                free.insert(name.clone());
            }
        }
        Term::Abs(param, body) => {
            bound.push(param.clone());
            collect_free(body, bound, free);
            bound.pop();
        }
        Term::Let(name, value, body) => {
            collect_free(value, bound, free);
            bound.push(name.clone());
            collect_free(body, bound, free);
            bound.pop();
        }
        Term::LetRec(name, value, body) => {
            // The recursive name scopes over its own definition as well.
            bound.push(name.clone());
            collect_free(value, bound, free);
            collect_free(body, bound, free);
            bound.pop();
        }
        Term::Num(_) | Term::Nil => {}
        Term::Neg(inner) | Term::Hd(inner) | Term::Tl(inner) => collect_free(inner, bound, free),
        Term::App(a, b) | Term::BinOp(_, a, b) | Term::Cons(a, b) | Term::Seq(a, b) => {
            collect_free(a, bound, free);
            collect_free(b, bound, free);
        }
        Term::If(cond, then_branch, else_branch) => {
            collect_free(cond, bound, free);
            collect_free(then_branch, bound, free);
            collect_free(else_branch, bound, free);
        }
    }
}

fn collect_names(term: &Term, names: &mut HashSet<String>) {
    match term {
        Term::Var(name) => {
            names.insert(name.clone());
        }
        Term::Abs(param, body) => {
            names.insert(param.clone());
            collect_names(body, names);
        }
        Term::Let(name, value, body) | Term::LetRec(name, value, body) => {
            names.insert(name.clone());
            collect_names(value, names);
            collect_names(body, names);
        }
        Term::Num(_) | Term::Nil => {}
        Term::Neg(inner) | Term::Hd(inner) | Term::Tl(inner) => collect_names(inner, names),
        Term::App(a, b) | Term::BinOp(_, a, b) | Term::Cons(a, b) | Term::Seq(a, b) => {
            collect_names(a, names);
            collect_names(b, names);
        }
        Term::If(cond, then_branch, else_branch) => {
            collect_names(cond, names);
            collect_names(then_branch, names);
            collect_names(else_branch, names);
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// Fully parenthesized surface syntax; numbers always carry a fractional part.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "{}", name),
            Term::Num(n) => write!(f, "{:?}", n),
            Term::Abs(param, body) => write!(f, "(\\{}.{})", param, body),
            Term::App(func, arg) => write!(f, "({} {})", func, arg),
            Term::BinOp(op, left, right) => write!(f, "({} {} {})", left, op, right),
            Term::Neg(operand) => write!(f, "(-{})", operand),
            Term::If(cond, then_branch, else_branch) => {
                write!(f, "(if {} then {} else {})", cond, then_branch, else_branch)
            }
            Term::Let(name, value, body) => write!(f, "(let {} = {} in {})", name, value, body),
            Term::LetRec(name, value, body) => write!(f, "(letrec {} = {} in {})", name, value, body),
            Term::Nil => write!(f, "#"),
            Term::Cons(head, tail) => write!(f, "({} : {})", head, tail),
            Term::Hd(list) => write!(f, "(hd {})", list),
            Term::Tl(list) => write!(f, "(tl {})", list),
            Term::Seq(first, second) => write!(f, "({} ;; {})", first, second),
        }
    }
}
