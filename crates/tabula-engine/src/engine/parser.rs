//! Formula expression parser.
//!
//! A recursive descent parser for arithmetic expressions:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | CELL | '(' expr ')'
//! ```
//!
//! The input is the expression text without the leading formula sign.

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::position::Position;
use crate::error::{FormulaParseError, Result};

/// Parse expression text into an [`Expr`].
pub fn parse_expression(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FormulaParseError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;

    // Make sure we consumed all input
    if let Some(spanned) = parser.peek() {
        return Err(FormulaParseError::UnexpectedToken {
            found: spanned.token.describe(),
            offset: spanned.offset,
        });
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Cell(String),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Cell(text) => format!("reference {}", text),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    offset: usize,
}

// === Token scanning ===

fn tokenize(input: &str) -> Result<Vec<Spanned>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LeftParen,
            b')' => Token::RightParen,
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let text = &input[start..i];
                let bad_number = || FormulaParseError::BadNumber {
                    text: text.to_string(),
                    offset: start,
                };
                let n = text.parse::<f64>().map_err(|_| bad_number())?;
                if !n.is_finite() {
                    return Err(bad_number());
                }
                tokens.push(Spanned {
                    token: Token::Number(n),
                    offset: start,
                });
                continue;
            }
            b'A'..=b'Z' => {
                while i < bytes.len() && bytes[i].is_ascii_uppercase() {
                    i += 1;
                }
                let letters_end = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if i == letters_end {
                    let ch = input[letters_end..].chars().next();
                    return Err(match ch {
                        Some(ch) => FormulaParseError::UnexpectedChar {
                            ch,
                            offset: letters_end,
                        },
                        None => FormulaParseError::UnexpectedEnd,
                    });
                }
                tokens.push(Spanned {
                    token: Token::Cell(input[start..i].to_string()),
                    offset: start,
                });
                continue;
            }
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(FormulaParseError::UnexpectedChar { ch, offset: start });
            }
        };
        tokens.push(Spanned {
            token,
            offset: start,
        });
        i += 1;
    }

    Ok(tokens)
}

/// Return the end offset of the number literal starting at `i`.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.peek().and_then(|s| match s.token {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            _ => None,
        }) {
            self.pos += 1;
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek().and_then(|s| match s.token {
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            _ => None,
        }) {
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek().map(|s| &s.token) {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        self.pos += 1;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let Some(spanned) = self.next() else {
            return Err(FormulaParseError::UnexpectedEnd);
        };
        match spanned.token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Cell(text) => {
                let pos = Position::from_text(&text);
                if pos.is_valid() {
                    Ok(Expr::Cell(pos))
                } else {
                    Ok(Expr::BadRef(text))
                }
            }
            Token::LeftParen => {
                let inner = self.parse_expr()?;
                match self.next() {
                    Some(Spanned {
                        token: Token::RightParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(FormulaParseError::UnexpectedToken {
                        found: other.token.describe(),
                        offset: other.offset,
                    }),
                    None => Err(FormulaParseError::UnexpectedEnd),
                }
            }
            other => Err(FormulaParseError::UnexpectedToken {
                found: other.describe(),
                offset: spanned.offset,
            }),
        }
    }
}
