// src/fresh.rs

use std::collections::HashSet;

use crate::ast::Term;

/// Derives a name from `base` that is not in `avoid`: trailing digits are
/// dropped and the smallest counter suffix that is still unused is appended
/// (`x` -> `x1`, `x1` -> `x2` when `x1` is taken, ...).
pub fn fresh_name(base: &str, avoid: &HashSet<String>) -> String {
    let stem = match base.trim_end_matches(|c: char| c.is_ascii_digit()) {
        "" => base,
        stem => stem,
    };
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{}{}", stem, counter);
        if !avoid.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// A name based on `base` that occurs nowhere in `term`, neither free nor bound.
pub fn fresh_for(term: &Term, base: &str) -> String {
    fresh_name(base, &term.names())
}
