// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Arithmetic captchas: recognized text like `12+3=?` evaluated to a number
//!
//! The recognized text is sanitized down to digits, `+-*/` and parentheses and
//! then parsed with a small recursive-descent grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! Integer arithmetic stays integral; `/` always yields a float.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExpressionError {
    #[error("no arithmetic expression in recognized text")]
    Empty,

    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken { found: char, position: usize },

    #[error("expression ends unexpectedly")]
    UnexpectedEnd,

    #[error("number too large: {0}")]
    NumberTooLarge(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("expression nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

/// Parentheses and unary signs allowed around a single operand
pub const MAX_DEPTH: usize = 256;

/// Result of an evaluation; serializes as a bare JSON number
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn negate(self) -> Result<Number, ExpressionError> {
        match self {
            Number::Int(i) => i.checked_neg().map(Number::Int).ok_or(ExpressionError::Overflow),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }

    fn finite(self) -> Result<Number, ExpressionError> {
        match self {
            Number::Float(f) if !f.is_finite() => Err(ExpressionError::Overflow),
            n => Ok(n),
        }
    }

    fn apply(self, op: Op, rhs: Number) -> Result<Number, ExpressionError> {
        if op == Op::Div {
            let divisor = rhs.as_f64();
            if divisor == 0.0 {
                return Err(ExpressionError::DivisionByZero);
            }
            return Number::Float(self.as_f64() / divisor).finite();
        }

        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                let value = match op {
                    Op::Add => a.checked_add(b),
                    Op::Sub => a.checked_sub(b),
                    Op::Mul => a.checked_mul(b),
                    Op::Div => unreachable!("division handled above"),
                };
                value.map(Number::Int).ok_or(ExpressionError::Overflow)
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                Number::Float(match op {
                    Op::Add => a + b,
                    Op::Sub => a - b,
                    Op::Mul => a * b,
                    Op::Div => unreachable!("division handled above"),
                })
                .finite()
            }
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(i64),
    Op(Op),
    Open,
    Close,
}

fn answer_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)=.*$").expect("valid regex"))
}

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9+\-*/()]").expect("valid regex"))
}

/// Drop everything from the first `=` on, then anything that is not a digit,
/// an operator or a parenthesis
pub fn sanitize(text: &str) -> String {
    let without_answer = answer_suffix().replace(text, "");
    disallowed_chars().replace_all(&without_answer, "").into_owned()
}

fn tokenize(expr: &str) -> Result<Vec<(usize, Token)>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();
    while let Some((position, c)) = chars.next() {
        let token = match c {
            '0'..='9' => {
                let mut end = position + c.len_utf8();
                while let Some(&(i, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                let digits = &expr[position..end];
                let value = digits
                    .parse::<i64>()
                    .map_err(|_| ExpressionError::NumberTooLarge(digits.to_string()))?;
                Token::Num(value)
            }
            '+' => Token::Op(Op::Add),
            '-' => Token::Op(Op::Sub),
            '*' => Token::Op(Op::Mul),
            '/' => Token::Op(Op::Div),
            '(' => Token::Open,
            ')' => Token::Close,
            found => return Err(ExpressionError::UnexpectedToken { found, position }),
        };
        tokens.push((position, token));
    }
    Ok(tokens)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn unexpected(&self) -> ExpressionError {
        match self.tokens.get(self.pos) {
            Some((position, _)) => ExpressionError::UnexpectedToken {
                found: self.source[*position..].chars().next().unwrap_or('?'),
                position: *position,
            },
            None => ExpressionError::UnexpectedEnd,
        }
    }

    fn descend(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::TooDeep);
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Number, ExpressionError> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ (Op::Add | Op::Sub))) = self.peek().cloned() {
            self.pos += 1;
            value = value.apply(op, self.term()?)?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Number, ExpressionError> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ (Op::Mul | Op::Div))) = self.peek().cloned() {
            self.pos += 1;
            value = value.apply(op, self.unary()?)?;
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<Number, ExpressionError> {
        let negate = match self.peek() {
            Some(Token::Op(Op::Add)) => false,
            Some(Token::Op(Op::Sub)) => true,
            _ => return self.primary(),
        };
        self.pos += 1;
        self.descend()?;
        let value = self.unary()?;
        self.depth -= 1;
        if negate {
            value.negate()
        } else {
            Ok(value)
        }
    }

    fn primary(&mut self) -> Result<Number, ExpressionError> {
        match self.peek().cloned() {
            Some(Token::Num(n)) => {
                self.pos += 1;
                Ok(Number::Int(n))
            }
            Some(Token::Open) => {
                self.pos += 1;
                self.descend()?;
                let value = self.expr()?;
                if self.peek() != Some(&Token::Close) {
                    return Err(self.unexpected());
                }
                self.pos += 1;
                self.depth -= 1;
                Ok(value)
            }
            _ => Err(self.unexpected()),
        }
    }
}

/// Evaluate a sanitized expression
pub fn evaluate(expr: &str) -> Result<Number, ExpressionError> {
    if expr.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut parser = Parser {
        source: expr,
        tokens: tokenize(expr)?,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.unexpected());
    }
    Ok(value)
}

/// Sanitize recognized captcha text and evaluate it
pub fn solve_text(text: &str) -> Result<Number, ExpressionError> {
    evaluate(&sanitize(text))
}
