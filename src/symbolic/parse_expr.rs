//! a module turns a String expression into a symbolic expression
//!
//! Tokenizer plus recursive-descent parser with conventional operator
//! precedence. Binding power, tightest first: parenthesized expression or
//! atom, function call, `^` (right-associative), unary minus, `*` and `/`
//! (left-associative), `+` and `-` (left-associative). Whitespace between
//! tokens is insignificant.
//!
//! Every failure is a `ParseError` carrying the byte position and a reason:
//! empty input, an unexpected token, an unmatched parenthesis, trailing
//! tokens after a complete expression, a call with zero or more than one
//! argument, or an unknown name in call position. Nesting of parentheses,
//! unary minus and calls is capped, failing with `RecursionLimitExceeded`
//! rather than overflowing the stack.
//!
//! # Example
//! ```
//! use symbolic_diff::symbolic::symbolic_engine::Expr;
//! let parsed = Expr::parse_expression("x ^ 2.0 + sin(x) / 3.0").unwrap();
//! println!("parsed: {}", parsed);
//! ```

use std::sync::Arc;

use log::debug;

use crate::symbolic::errors::ExprError;
use crate::symbolic::symbolic_engine::{Expr, MAX_DEPTH, UnaryFn};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(val) => format!("number `{}`", val),
            Token::Ident(name) => format!("identifier `{}`", name),
            Token::Plus => "`+`".to_string(),
            Token::Minus => "`-`".to_string(),
            Token::Star => "`*`".to_string(),
            Token::Slash => "`/`".to_string(),
            Token::Caret => "`^`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::Comma => "`,`".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push((pos, Token::Plus));
            }
            '-' => {
                chars.next();
                tokens.push((pos, Token::Minus));
            }
            '*' => {
                chars.next();
                tokens.push((pos, Token::Star));
            }
            '/' => {
                chars.next();
                tokens.push((pos, Token::Slash));
            }
            '^' => {
                chars.next();
                tokens.push((pos, Token::Caret));
            }
            '(' => {
                chars.next();
                tokens.push((pos, Token::LParen));
            }
            ')' => {
                chars.next();
                tokens.push((pos, Token::RParen));
            }
            ',' => {
                chars.next();
                tokens.push((pos, Token::Comma));
            }
            '0'..='9' => {
                let mut end = pos;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() {
                        end = i + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(&(dot_pos, '.')) = chars.peek() {
                    chars.next();
                    end = dot_pos + 1;
                    let mut saw_digit = false;
                    while let Some(&(i, d)) = chars.peek() {
                        if d.is_ascii_digit() {
                            saw_digit = true;
                            end = i + 1;
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if !saw_digit {
                        return Err(ExprError::parse(
                            dot_pos,
                            "expected digits after decimal point",
                        ));
                    }
                }
                let text = &input[pos..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ExprError::parse(pos, format!("malformed number `{}`", text)))?;
                tokens.push((pos, Token::Number(value)));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = pos;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        end = i + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((pos, Token::Ident(input[pos..end].to_string())));
            }
            other => {
                return Err(ExprError::parse(
                    pos,
                    format!("unexpected character `{}`", other),
                ));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    /// Byte length of the input, reported as the position of end-of-input
    /// errors.
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // expression := term (('+' | '-') term)*
    fn parse_expression(&mut self, depth: usize) -> Result<Arc<Expr>, ExprError> {
        if depth > MAX_DEPTH {
            return Err(ExprError::RecursionLimitExceeded);
        }
        let mut lhs = self.parse_term(depth)?;
        loop {
            match self.peek() {
                Some((_, Token::Plus)) => {
                    self.pos += 1;
                    let rhs = self.parse_term(depth)?;
                    lhs = Expr::add(lhs, rhs);
                }
                Some((_, Token::Minus)) => {
                    self.pos += 1;
                    let rhs = self.parse_term(depth)?;
                    lhs = Expr::sub(lhs, rhs);
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    // term := unary (('*' | '/') unary)*
    fn parse_term(&mut self, depth: usize) -> Result<Arc<Expr>, ExprError> {
        let mut lhs = self.parse_unary(depth)?;
        loop {
            match self.peek() {
                Some((_, Token::Star)) => {
                    self.pos += 1;
                    let rhs = self.parse_unary(depth)?;
                    lhs = Expr::mul(lhs, rhs);
                }
                Some((_, Token::Slash)) => {
                    self.pos += 1;
                    let rhs = self.parse_unary(depth)?;
                    lhs = Expr::div(lhs, rhs);
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    // unary := '-' unary | power
    fn parse_unary(&mut self, depth: usize) -> Result<Arc<Expr>, ExprError> {
        if depth > MAX_DEPTH {
            return Err(ExprError::RecursionLimitExceeded);
        }
        if matches!(self.peek(), Some((_, Token::Minus))) {
            self.pos += 1;
            let operand = self.parse_unary(depth + 1)?;
            // a negated literal folds to a negative constant; anything else
            // becomes (-1) * operand
            return Ok(match &*operand {
                Expr::Const(val) => Expr::constant(-*val),
                _ => Expr::mul(Expr::constant(-1.0), operand),
            });
        }
        self.parse_power(depth)
    }

    // power := atom ('^' unary)?   -- right-associative, binds tighter than
    // unary minus on its left
    fn parse_power(&mut self, depth: usize) -> Result<Arc<Expr>, ExprError> {
        let base = self.parse_atom(depth)?;
        if matches!(self.peek(), Some((_, Token::Caret))) {
            self.pos += 1;
            let exponent = self.parse_unary(depth + 1)?;
            return Ok(Expr::pow(base, exponent));
        }
        Ok(base)
    }

    // atom := number | ident | ident '(' expression ')' | '(' expression ')'
    fn parse_atom(&mut self, depth: usize) -> Result<Arc<Expr>, ExprError> {
        match self.advance() {
            None => Err(ExprError::parse(
                self.end,
                "unexpected end of input, expected a value",
            )),
            Some((_, Token::Number(val))) => Ok(Expr::constant(val)),
            Some((pos, Token::Ident(name))) => {
                if matches!(self.peek(), Some((_, Token::LParen))) {
                    self.pos += 1;
                    let fun = UnaryFn::from_name(&name)
                        .map_err(|_| ExprError::parse(pos, format!("unknown function `{}`", name)))?;
                    if matches!(self.peek(), Some((_, Token::RParen))) {
                        return Err(ExprError::parse(
                            pos,
                            format!("function `{}` expects exactly one argument", name),
                        ));
                    }
                    let arg = self.parse_expression(depth + 1)?;
                    match self.advance() {
                        Some((_, Token::RParen)) => Ok(Expr::unary(fun, arg)),
                        Some((comma_pos, Token::Comma)) => Err(ExprError::parse(
                            comma_pos,
                            format!("function `{}` expects exactly one argument", name),
                        )),
                        Some((p, tok)) => Err(ExprError::parse(
                            p,
                            format!("expected `)`, found {}", tok.describe()),
                        )),
                        None => Err(ExprError::parse(self.end, "unmatched `(` in function call")),
                    }
                } else {
                    Expr::variable(&name)
                }
            }
            Some((_, Token::LParen)) => {
                let inner = self.parse_expression(depth + 1)?;
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(inner),
                    Some((p, tok)) => Err(ExprError::parse(
                        p,
                        format!("expected `)`, found {}", tok.describe()),
                    )),
                    None => Err(ExprError::parse(self.end, "unmatched `(`")),
                }
            }
            Some((pos, tok)) => Err(ExprError::parse(
                pos,
                format!("unexpected {}", tok.describe()),
            )),
        }
    }
}

impl Expr {
    /// Parses a mathematical expression from its string representation.
    ///
    /// Accepts the canonical rendered form as well as ordinary
    /// precedence-based input like `"x^2.3 * sin(x + y)"`.
    pub fn parse_expression(input: &str) -> Result<Arc<Expr>, ExprError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(ExprError::parse(0, "empty expression"));
        }
        debug!("parsing `{}` ({} tokens)", input, tokens.len());
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: input.len(),
        };
        let expr = parser.parse_expression(0)?;
        if let Some((pos, tok)) = parser.peek() {
            return Err(ExprError::parse(
                *pos,
                format!("trailing input starting with {}", tok.describe()),
            ));
        }
        Ok(expr)
    }
}
