#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Lexer and precedence-climbing parser for propositional formulas.
//!
//! Grammar, loosest binding first: `<->` (non-associative), `->`
//! (right-associative), `|`, `&`, `~`, with parentheses and identifiers
//! `[A-Za-z_]+`.
//!
//! The parser writes every subformula it finishes into the store that the
//! Tseitin encoding numbers its variables from; identifiers are interned so
//! repeated occurrences share one entry.

use super::{Connective, Formula, Subformula};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Not,
    And,
    Or,
    Imp,
    Iff,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '~' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '&' => {
                chars.next();
                tokens.push(Token::And);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Or);
            }
            '-' => {
                chars.next();
                if chars.next() != Some('>') {
                    return Err("unknown token: expected '->'".to_string());
                }
                tokens.push(Token::Imp);
            }
            '<' => {
                chars.next();
                if chars.next() != Some('-') || chars.next() != Some('>') {
                    return Err("unknown token: expected '<->'".to_string());
                }
                tokens.push(Token::Iff);
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphabetic() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            other => return Err(format!("unknown token '{other}'")),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    subs: Vec<Subformula>,
    atoms: FxHashMap<String, usize>,
}

/// Binding powers per connective: a right power below the left one makes the
/// operator right-associative.
const fn binding_power(op: Connective) -> (u8, u8) {
    match op {
        Connective::And => (8, 9),
        Connective::Or => (6, 7),
        Connective::Imp => (5, 4),
        Connective::Iff => (2, 3),
    }
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            // index 0 is reserved so subformula indices double as DIMACS
            // variables
            subs: vec![Subformula::Atom],
            atoms: FxHashMap::default(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn atom(&mut self, name: String) -> usize {
        if let Some(&idx) = self.atoms.get(&name) {
            return idx;
        }
        self.subs.push(Subformula::Atom);
        let idx = self.subs.len() - 1;
        self.atoms.insert(name, idx);
        idx
    }

    fn store(&mut self, sub: Subformula) -> usize {
        self.subs.push(sub);
        self.subs.len() - 1
    }

    fn parse_primary(&mut self) -> Result<usize, String> {
        match self.next() {
            Some(Token::Not) => {
                let inner = self.parse_primary()?;
                Ok(self.store(Subformula::Not(inner)))
            }
            Some(Token::Ident(name)) => Ok(self.atom(name)),
            Some(Token::LParen) => {
                let inner = self.parse_expr(0)?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("expected ')'".to_string()),
                }
            }
            _ => Err("syntax error: expected a formula".to_string()),
        }
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<usize, String> {
        let mut lhs = self.parse_primary()?;

        loop {
            let op = match self.peek() {
                Some(Token::And) => Connective::And,
                Some(Token::Or) => Connective::Or,
                Some(Token::Imp) => Connective::Imp,
                Some(Token::Iff) => Connective::Iff,
                _ => break,
            };
            let (left_bp, right_bp) = binding_power(op);
            if left_bp < min_bp {
                break;
            }
            self.next();

            let rhs = self.parse_expr(right_bp)?;
            lhs = self.store(Subformula::Binary(op, lhs, rhs));

            if op == Connective::Iff && self.peek() == Some(&Token::Iff) {
                return Err("'<->' does not associate; parenthesise".to_string());
            }
        }

        Ok(lhs)
    }
}

/// Parses an infix formula into a subformula store.
///
/// # Errors
///
/// Returns a message for lexical errors, syntax errors, trailing input, or a
/// chained `<->`.
pub(crate) fn parse(input: &str) -> Result<Formula, String> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens);
    let root = parser.parse_expr(0)?;
    if parser.peek().is_some() {
        return Err("syntax error: unexpected trailing input".to_string());
    }
    Ok(Formula {
        subs: parser.subs,
        root,
        atoms: parser.atoms,
    })
}
