// src/lib.rs

// --- Module Declarations ---
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod fresh;
pub mod interpreter;
pub mod parser;
pub mod subst;

// --- Public API Re-exports ---
pub use ast::{BinOp, Term};
pub use error::{EvalError, ParseError, ParseErrorKind, RunError};
pub use evaluator::{evaluate, normalize, step, Evaluator, Limit, StepBudget, Unbounded};
pub use interpreter::{interpret, read_program, Interpreter};
pub use parser::parse;
pub use subst::substitute;


#[cfg(test)]
mod tests {
    use super::*;

    fn eval_ok(input: &str) -> Term {
        normalize(parse(input).unwrap()).unwrap()
    }

    fn eval_num(input: &str) -> f64 {
        match eval_ok(input) {
            Term::Num(n) => n,
            other => panic!("expected a number, got {}", other),
        }
    }

    fn eval_err(input: &str) -> EvalError {
        evaluate(parse(input).unwrap()).unwrap_err()
    }

    // --- Parser ---

    #[test]
    fn test_parse_number() {
        assert_eq!(parse("42").unwrap(), Term::Num(42.0));
        assert_eq!(parse("3.25").unwrap(), Term::Num(3.25));
        assert_eq!(parse("-1").unwrap(), Term::neg(Term::Num(1.0)));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse("x").unwrap(), Term::var("x"));
        assert_eq!(parse("foo_bar'").unwrap(), Term::var("foo_bar'"));
        // Keyword prefixes are ordinary names.
        assert_eq!(parse("iff").unwrap(), Term::var("iff"));
        assert_eq!(parse("lets").unwrap(), Term::var("lets"));
    }

    #[test]
    fn test_parse_lambda() {
        let lambda = parse("\\x.x").unwrap();
        assert_eq!(lambda, Term::abs("x", Term::var("x")));
        assert_eq!(parse("λx.x").unwrap(), lambda);
    }

    #[test]
    fn test_parse_application_is_left_associative() {
        assert_eq!(
            parse("f x y").unwrap(),
            Term::app(Term::app(Term::var("f"), Term::var("x")), Term::var("y"))
        );
    }

    #[test]
    fn test_parse_lambda_body_extends_right() {
        assert_eq!(
            parse("\\x.(\\y.y)x").unwrap(),
            Term::abs("x", Term::app(Term::abs("y", Term::var("y")), Term::var("x")))
        );
    }

    #[test]
    fn test_parse_precedence() {
        // 1-2*3-4 = (1 - (2*3)) - 4
        let expected = Term::binop(
            BinOp::Sub,
            Term::binop(
                BinOp::Sub,
                Term::num(1.0),
                Term::binop(BinOp::Mul, Term::num(2.0), Term::num(3.0)),
            ),
            Term::num(4.0),
        );
        assert_eq!(parse("1-2*3-4").unwrap(), expected);

        // application binds tighter than *
        assert_eq!(
            parse("f 2 * 3").unwrap(),
            Term::binop(BinOp::Mul, Term::app(Term::var("f"), Term::num(2.0)), Term::num(3.0))
        );
    }

    #[test]
    fn test_parse_double_negation() {
        assert_eq!(
            parse("1--2").unwrap(),
            Term::binop(BinOp::Sub, Term::num(1.0), Term::neg(Term::num(2.0)))
        );
    }

    #[test]
    fn test_parse_cons_is_right_associative() {
        assert_eq!(
            parse("1:2:#").unwrap(),
            Term::cons(Term::num(1.0), Term::cons(Term::num(2.0), Term::Nil))
        );
    }

    #[test]
    fn test_parse_hd_takes_whole_list() {
        assert_eq!(
            parse("hd 1:2:#").unwrap(),
            Term::hd(Term::cons(Term::num(1.0), Term::cons(Term::num(2.0), Term::Nil)))
        );
    }

    #[test]
    fn test_parse_comparison_binds_looser_than_cons() {
        let pair = Term::cons(Term::num(1.0), Term::num(2.0));
        assert_eq!(parse("1:2 == 1:2").unwrap(), Term::binop(BinOp::Eq, pair.clone(), pair));
    }

    #[test]
    fn test_parse_let_and_letrec() {
        assert_eq!(
            parse("let x = 1 in x").unwrap(),
            Term::let_in("x", Term::num(1.0), Term::var("x"))
        );
        let letrec = parse("letrec f = \\n.f n in f").unwrap();
        assert!(matches!(letrec, Term::LetRec(_, _, _)));
        assert_eq!(parse("let rec f = \\n.f n in f").unwrap(), letrec);
    }

    #[test]
    fn test_parse_sequence() {
        assert_eq!(
            parse("1 ;; 2 ;; 3").unwrap(),
            Term::seq(Term::num(1.0), Term::seq(Term::num(2.0), Term::num(3.0)))
        );
    }

    #[test]
    fn test_parse_comments() {
        let src = "
            // the answer
            let x = 41 in // bound here
            x + 1
        ";
        assert_eq!(eval_num(src), 42.0);
    }

    #[test]
    fn test_robust_parser_keywords() {
        assert!(parse("if 1 thenn 2 else 3").is_err());
        assert!(parse("if 1 then 2 elsee 3").is_err());
        assert!(parse("let in = 1 in 2").is_err());
        assert!(parse("\\then.1").is_err());
        assert_eq!(eval_num("(\\iff.iff) 42"), 42.0);
    }

    #[test]
    fn test_parse_errors_carry_position() {
        let err = parse("(1 + 2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEnd);
        assert_eq!((err.line, err.col), (1, 7));

        let err = parse("1 +\n  )").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar(')'));
        assert_eq!((err.line, err.col), (2, 3));

        assert!(parse("()").is_err());
        assert!(parse("\\x x").is_err());
    }

    #[test]
    fn test_printed_terms_parse_back() {
        let sources = [
            "\\x.(\\y.y) x",
            "let f = \\x.x * 6 in f (1 : 2 : #)",
            "letrec f = \\n.if n == 0 then 1 else n * f (n - 1) in f",
            "\\xs.hd xs ;; tl xs",
            "\\a.a <= 2",
        ];
        for src in sources {
            let term = parse(src).unwrap();
            assert_eq!(parse(&term.to_string()).unwrap(), term, "round trip of {}", src);
        }
    }

    // --- Printer ---

    #[test]
    fn test_display() {
        assert_eq!(Term::num(3.0).to_string(), "3.0");
        assert_eq!(Term::num(-9.0).to_string(), "-9.0");
        assert_eq!(Term::Nil.to_string(), "#");
        assert_eq!(
            Term::cons(Term::num(1.0), Term::cons(Term::num(2.0), Term::Nil)).to_string(),
            "(1.0 : (2.0 : #))"
        );
        assert_eq!(
            Term::abs("x", Term::app(Term::abs("y", Term::var("y")), Term::var("x"))).to_string(),
            "(\\x.((\\y.y) x))"
        );
        assert_eq!(Term::neg(Term::var("a")).to_string(), "(-a)");
    }

    // --- Evaluator ---

    #[test]
    fn test_number_is_a_value() {
        assert_eq!(eval_ok("42"), Term::Num(42.0));
    }

    #[test]
    fn test_lambda_application() {
        assert_eq!(eval_num("(\\x.x) 42"), 42.0);
        assert_eq!(eval_num("(\\x.\\y.x) 1 2"), 1.0);
    }

    #[test]
    fn test_lone_lambda_is_a_value() {
        assert_eq!(eval_ok("\\x.x"), Term::abs("x", Term::var("x")));
    }

    #[test]
    fn test_no_reduction_under_lambda() {
        let term = parse("\\x.(\\y.y) x").unwrap();
        assert_eq!(evaluate(term.clone()).unwrap(), term);
        assert_eq!(step(&term).unwrap(), None);
    }

    #[test]
    fn test_step_is_single_contraction() {
        let term = parse("(\\x.\\y.x) 1 2").unwrap();
        let once = step(&term).unwrap().unwrap();
        assert_eq!(once, Term::app(Term::abs("y", Term::num(1.0)), Term::num(2.0)));
        let twice = step(&once).unwrap().unwrap();
        assert_eq!(twice, Term::num(1.0));
        assert_eq!(step(&twice).unwrap(), None);
    }

    #[test]
    fn test_let_rewrites_to_application() {
        let term = parse("let x = 1 in x").unwrap();
        assert_eq!(
            step(&term).unwrap(),
            Some(Term::app(Term::abs("x", Term::var("x")), Term::num(1.0)))
        );
    }

    #[test]
    fn test_letrec_unfolds_on_demand() {
        let value = Term::abs("n", Term::app(Term::var("f"), Term::var("n")));
        let term = Term::let_rec("f", value.clone(), Term::var("f"));
        let unfolded = Term::let_rec("f", value.clone(), value);
        assert_eq!(step(&term).unwrap(), Some(unfolded));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_num("2 + 3"), 5.0);
        assert_eq!(eval_num("10 - 3 - 2"), 5.0);
        assert_eq!(eval_num("2 * 3 + 4 * 5"), 26.0);
        assert_eq!(eval_num("--5"), 5.0);
    }

    #[test]
    fn test_comparisons_yield_numerals() {
        assert_eq!(eval_num("0 == 0"), 1.0);
        assert_eq!(eval_num("0 == 1"), 0.0);
        assert_eq!(eval_num("0 <= 1"), 1.0);
        assert_eq!(eval_num("1 <= 0"), 0.0);
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(eval_num("if 0 then 2 else 1"), 1.0);
        assert_eq!(eval_num("if 1 then 2 else 1"), 2.0);
        assert_eq!(eval_num("if -3 then 2 else 1"), 2.0);
        assert_eq!(eval_num("if 0.5 then 2 else 1"), 2.0);
    }

    #[test]
    fn test_if_only_touches_selected_branch() {
        assert_eq!(eval_num("if 1 then 7 else hd #"), 7.0);
        assert_eq!(eval_num("if 0 then undefined else 8"), 8.0);
    }

    #[test]
    fn test_list_equality() {
        assert_eq!(eval_num("1:2 == 1:2"), 1.0);
        assert_eq!(eval_num("1:2 == 1:3"), 0.0);
        assert_eq!(eval_num("# == #"), 1.0);
        assert_eq!(eval_num("(1:#) == #"), 0.0);
        assert_eq!(eval_num("1 == #"), 0.0);
        assert_eq!(eval_num("((\\x.x+1) 0 : #) == (1 : #)"), 1.0);
    }

    #[test]
    fn test_sequence_discards_first() {
        assert_eq!(eval_num("1 ;; 2"), 2.0);
        assert_eq!(eval_num("1 ;; 2 ;; 3"), 3.0);
    }

    #[test]
    fn test_sequence_forces_first() {
        assert_eq!(eval_err("hd # ;; 2"), EvalError::type_mismatch("hd", "a non-empty list", "#"));
    }

    #[test]
    fn test_normalize_forces_list_elements() {
        assert_eq!(eval_ok("(\\x.x) 1 : (2 + 3) : #").to_string(), "(1.0 : (5.0 : #))");
        // evaluate alone stops at the outer constructor
        let head_only = evaluate(parse("(1 + 1) : #").unwrap()).unwrap();
        assert_eq!(
            head_only,
            Term::cons(Term::binop(BinOp::Add, Term::num(1.0), Term::num(1.0)), Term::Nil)
        );
    }

    // --- Error Condition Tests ---

    #[test]
    fn test_unbound_variable() {
        assert_eq!(eval_err("x"), EvalError::UnboundVariable("x".to_string()));
        assert_eq!(eval_err("z 10"), EvalError::UnboundVariable("z".to_string()));
        assert_eq!(eval_err("1 + (z 10)"), EvalError::UnboundVariable("z".to_string()));
    }

    #[test]
    fn test_application_of_non_function() {
        assert_eq!(eval_err("10 20"), EvalError::NotAFunction("10.0".to_string()));
        assert_eq!(eval_err("# 2"), EvalError::NotAFunction("#".to_string()));
        assert_eq!(eval_err("(1 + 1) 2"), EvalError::NotAFunction("2.0".to_string()));
    }

    #[test]
    fn test_arithmetic_type_errors() {
        assert_eq!(
            eval_err("1 + \\x.x"),
            EvalError::type_mismatch("+", "a number", "(\\x.x)")
        );
        assert_eq!(eval_err("-#"), EvalError::type_mismatch("-", "a number", "#"));
        assert_eq!(eval_err("# <= 1"), EvalError::type_mismatch("<=", "a number", "#"));
        assert!(matches!(eval_err("(\\x.x) == 1"), EvalError::TypeMismatch { op: "==", .. }));
        assert!(matches!(eval_err("if # then 1 else 2"), EvalError::TypeMismatch { op: "if", .. }));
    }

    #[test]
    fn test_hd_tl_type_errors() {
        assert_eq!(eval_err("hd #"), EvalError::type_mismatch("hd", "a non-empty list", "#"));
        assert_eq!(eval_err("tl 1"), EvalError::type_mismatch("tl", "a non-empty list", "1.0"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(EvalError::UnboundVariable("x".into()).to_string(), "Unbound variable: 'x'");
        assert_eq!(
            EvalError::type_mismatch("hd", "a non-empty list", "#").to_string(),
            "Type error: 'hd' expects a non-empty list, but got #"
        );
        let err = parse("1 )").unwrap_err();
        assert_eq!(err.to_string(), "Parse error at 1:3: Unexpected character: ')'");
    }
}
