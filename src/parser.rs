// src/parser.rs

use crate::ast::{BinOp, Term};
use crate::error::{ParseError, ParseErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Let,
    Rec,
    LetRec,
    In,
    If,
    Then,
    Else,
    Hd,
    Tl,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf::phf_map! {
    "let" => Keyword::Let,
    "rec" => Keyword::Rec,
    "letrec" => Keyword::LetRec,
    "in" => Keyword::In,
    "if" => Keyword::If,
    "then" => Keyword::Then,
    "else" => Keyword::Else,
    "hd" => Keyword::Hd,
    "tl" => Keyword::Tl,
};

// --- The Parser ---
pub struct Parser {
    input: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Parser {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current_char(&self) -> Option<char> { self.input.get(self.pos).copied() }
    fn peek_char(&self) -> Option<char> { self.input.get(self.pos + 1).copied() }

    fn advance(&mut self) {
        if let Some(c) = self.current_char() {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            while let Some(c) = self.current_char() {
                if c.is_whitespace() {
                    self.advance();
                } else {
                    break;
                }
            }

            // `//` comments run to the end of the line.
            if self.current_char() == Some('/') && self.peek_char() == Some('/') {
                while let Some(c) = self.current_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError { kind, line: self.line, col: self.col }
    }

    fn starts_with(&self, token: &str) -> bool {
        token.chars().enumerate().all(|(i, c)| self.input.get(self.pos + i) == Some(&c))
    }

    /// Consumes `token` after skipping whitespace, or fails without consuming anything.
    fn expect(&mut self, token: &str) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.starts_with(token) {
            for _ in token.chars() {
                self.advance();
            }
            Ok(())
        } else {
            Err(self.error(ParseErrorKind::InvalidSyntax(format!("Expected '{}'", token))))
        }
    }

    pub fn parse(&mut self) -> Result<Term, ParseError> {
        self.skip_whitespace();
        let term = self.parse_sequence()?;
        self.skip_whitespace();
        if let Some(c) = self.current_char() {
            Err(self.error(ParseErrorKind::UnexpectedChar(c)))
        } else {
            Ok(term)
        }
    }

    fn parse_sequence(&mut self) -> Result<Term, ParseError> {
        let first = self.parse_expr()?;
        self.skip_whitespace();
        if self.starts_with(";;") {
            self.expect(";;")?;
            let second = self.parse_sequence()?;
            return Ok(Term::seq(first, second));
        }
        Ok(first)
    }

    fn parse_expr(&mut self) -> Result<Term, ParseError> {
        self.skip_whitespace();
        match self.current_char() {
            Some('λ') | Some('\\') => self.parse_lambda(),
            _ => match self.peek_keyword() {
                Some(Keyword::Let) => self.parse_let(),
                Some(Keyword::LetRec) => {
                    self.consume_keyword(Keyword::LetRec)?;
                    self.parse_binding(true)
                }
                Some(Keyword::If) => self.parse_if(),
                _ => self.parse_comparison(),
            },
        }
    }

    fn parse_comparison(&mut self) -> Result<Term, ParseError> {
        let mut left = self.parse_cons()?;
        loop {
            self.skip_whitespace();
            let op = if self.starts_with("==") {
                BinOp::Eq
            } else if self.starts_with("<=") {
                BinOp::Le
            } else {
                break;
            };
            self.expect(op.symbol())?;
            let right = self.parse_cons()?;
            left = Term::binop(op, left, right);
        }
        Ok(left)
    }

    fn parse_cons(&mut self) -> Result<Term, ParseError> {
        let head = self.parse_additive()?;
        self.skip_whitespace();
        if self.current_char() == Some(':') {
            self.advance();
            let tail = self.parse_cons()?;
            return Ok(Term::cons(head, tail));
        }
        Ok(head)
    }

    fn parse_additive(&mut self) -> Result<Term, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            self.skip_whitespace();
            let op = match self.current_char() {
                Some('+') => BinOp::Add,
                Some('-') => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Term::binop(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Term, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            self.skip_whitespace();
            if self.current_char() != Some('*') {
                break;
            }
            self.advance();
            let right = self.parse_unary()?;
            left = Term::binop(BinOp::Mul, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Term, ParseError> {
        self.skip_whitespace();
        if self.current_char() == Some('-') {
            self.advance();
            return Ok(Term::neg(self.parse_unary()?));
        }
        match self.peek_keyword() {
            Some(Keyword::Hd) => {
                self.consume_keyword(Keyword::Hd)?;
                Ok(Term::hd(self.parse_cons()?))
            }
            Some(Keyword::Tl) => {
                self.consume_keyword(Keyword::Tl)?;
                Ok(Term::tl(self.parse_cons()?))
            }
            _ => self.parse_application(),
        }
    }

    fn parse_application(&mut self) -> Result<Term, ParseError> {
        let mut app = self.parse_atom()?;
        loop {
            self.skip_whitespace();
            match self.current_char() {
                Some('(') | Some('#') => {}
                Some('λ') | Some('\\') => {
                    // A lambda swallows the rest of the expression, so it is the last argument.
                    let arg = self.parse_lambda()?;
                    return Ok(Term::app(app, arg));
                }
                Some(c) if c.is_ascii_digit() || c.is_alphabetic() || c == '_' => {
                    match self.peek_keyword() {
                        None => {}
                        Some(Keyword::Let) | Some(Keyword::LetRec) | Some(Keyword::If) => {
                            let arg = self.parse_expr()?;
                            return Ok(Term::app(app, arg));
                        }
                        Some(_) => break,
                    }
                }
                _ => break,
            }
            let arg = self.parse_atom()?;
            app = Term::app(app, arg);
        }
        Ok(app)
    }

    fn parse_atom(&mut self) -> Result<Term, ParseError> {
        self.skip_whitespace();
        match self.current_char() {
            Some('(') => {
                self.advance();
                let inner = self.parse_sequence()?;
                self.skip_whitespace();
                match self.current_char() {
                    Some(')') => {
                        self.advance();
                        Ok(inner)
                    }
                    Some(c) => Err(self.error(ParseErrorKind::UnexpectedChar(c))),
                    None => Err(self.error(ParseErrorKind::UnexpectedEnd)),
                }
            }
            Some('#') => {
                self.advance();
                Ok(Term::Nil)
            }
            Some('λ') | Some('\\') => self.parse_lambda(),
            Some(c) if c.is_ascii_digit() => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => match self.peek_keyword() {
                None => Ok(Term::Var(self.parse_identifier_string()?)),
                Some(Keyword::Let) | Some(Keyword::LetRec) | Some(Keyword::If) => self.parse_expr(),
                Some(_) => {
                    let word = self.peek_exact_word();
                    Err(self.error(ParseErrorKind::InvalidSyntax(format!("Unexpected keyword '{}'", word))))
                }
            },
            Some(c) => Err(self.error(ParseErrorKind::UnexpectedChar(c))),
            None => Err(self.error(ParseErrorKind::UnexpectedEnd)),
        }
    }

    fn peek_exact_word(&self) -> String {
        self.input[self.pos..]
            .iter()
            .take_while(|c| is_identifier_char(**c))
            .collect()
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        KEYWORDS.get(self.peek_exact_word().as_str()).copied()
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        self.skip_whitespace();
        let word = self.peek_exact_word();
        if KEYWORDS.get(word.as_str()) == Some(&keyword) {
            for _ in word.chars() {
                self.advance();
            }
            return Ok(());
        }
        let expected = KEYWORDS
            .entries()
            .find(|(_, k)| **k == keyword)
            .map_or("keyword", |(name, _)| *name);
        Err(self.error(ParseErrorKind::InvalidSyntax(format!("Expected keyword '{}'", expected))))
    }

    fn parse_let(&mut self) -> Result<Term, ParseError> {
        self.consume_keyword(Keyword::Let)?;
        self.skip_whitespace();

        // `let rec` is accepted as a spelling of `letrec`.
        let is_rec = if self.peek_keyword() == Some(Keyword::Rec) {
            self.consume_keyword(Keyword::Rec)?;
            true
        } else {
            false
        };
        self.parse_binding(is_rec)
    }

    fn parse_binding(&mut self, is_rec: bool) -> Result<Term, ParseError> {
        self.skip_whitespace();
        let name = self.parse_identifier_string()?;
        self.skip_whitespace();
        if self.starts_with("==") {
            return Err(self.error(ParseErrorKind::InvalidSyntax("Expected '=' in binding".to_string())));
        }
        self.expect("=")?;
        let value = self.parse_expr()?;
        self.consume_keyword(Keyword::In)?;
        let body = self.parse_expr()?;

        if is_rec {
            Ok(Term::let_rec(name, value, body))
        } else {
            Ok(Term::let_in(name, value, body))
        }
    }

    fn parse_if(&mut self) -> Result<Term, ParseError> {
        self.consume_keyword(Keyword::If)?;
        let cond = self.parse_expr()?;
        self.consume_keyword(Keyword::Then)?;
        let then_branch = self.parse_expr()?;
        self.consume_keyword(Keyword::Else)?;
        let else_branch = self.parse_expr()?;
        Ok(Term::if_then_else(cond, then_branch, else_branch))
    }

    fn parse_lambda(&mut self) -> Result<Term, ParseError> {
        self.advance(); // consume 'λ' or '\'
        self.skip_whitespace();
        let param = self.parse_identifier_string()?;
        self.skip_whitespace();
        if self.current_char() != Some('.') {
            return Err(self.error(ParseErrorKind::InvalidSyntax("Expected '.' in lambda".to_string())));
        }
        self.advance(); // consume '.'
        let body = self.parse_expr()?;
        Ok(Term::abs(param, body))
    }

    fn parse_number(&mut self) -> Result<Term, ParseError> {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();

        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // Only a '.' followed by a digit belongs to the number.
        if self.current_char() == Some('.') && self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            s.push('.');
            self.advance();
            while let Some(c) = self.current_char() {
                if c.is_ascii_digit() {
                    s.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        s.parse::<f64>()
            .map(Term::Num)
            .map_err(|_| ParseError {
                kind: ParseErrorKind::InvalidNumber(s),
                line: start_line,
                col: start_col,
            })
    }

    fn parse_identifier_string(&mut self) -> Result<String, ParseError> {
        let start_line = self.line;
        let start_col = self.col;

        let starts_identifier = self.current_char().map_or(false, |c| c.is_alphabetic() || c == '_');
        let name = if starts_identifier { self.peek_exact_word() } else { String::new() };
        if name.is_empty() {
            return Err(ParseError {
                kind: ParseErrorKind::InvalidSyntax("Expected an identifier".to_string()),
                line: start_line,
                col: start_col,
            });
        }
        if KEYWORDS.contains_key(name.as_str()) {
            return Err(ParseError {
                kind: ParseErrorKind::InvalidSyntax(format!("'{}' is a keyword", name)),
                line: start_line,
                col: start_col,
            });
        }
        for _ in name.chars() {
            self.advance();
        }
        Ok(name)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

// Convenience function for parsing
pub fn parse(input: &str) -> Result<Term, ParseError> {
    Parser::new(input).parse()
}
