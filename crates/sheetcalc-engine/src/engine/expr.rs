//! Arithmetic evaluation of preprocessed formula text.
//!
//! A small recursive-descent parser over numbers, `+ - * /` and parentheses.
//! It evaluates while parsing and never executes anything else: any leftover
//! identifier is an error. Division by zero is not trapped, so `Infinity` and
//! `NaN` propagate like ordinary IEEE results.
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | 'Infinity' | 'NaN' | '(' expr ')'
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("Empty expression")]
    Empty,

    #[error("Unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Invalid number literal at {pos}")]
    InvalidNumber { pos: usize },

    #[error("Unknown identifier '{name}' at {pos}")]
    UnknownIdentifier { name: String, pos: usize },

    #[error("Increment/decrement operator at {pos}")]
    IncrementOperator { pos: usize },

    #[error("Unexpected token at {pos}")]
    UnexpectedToken { pos: usize },

    #[error("Unexpected end of expression")]
    UnexpectedEnd,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TokenKind {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Clone, Copy, Debug)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

/// Evaluate an arithmetic expression.
pub fn evaluate_expression(text: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value),
        Some(tok) => Err(ExprError::UnexpectedToken { pos: tok.pos }),
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let (pos, ch) = chars[i];
        let next = chars.get(i + 1).map(|(_, c)| *c);

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match ch {
            '+' | '-' if next == Some(ch) => return Err(ExprError::IncrementOperator { pos }),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        };
        if let Some(kind) = simple {
            tokens.push(Token { kind, pos });
            i += 1;
            continue;
        }

        if ch.is_ascii_digit() || (ch == '.' && next.is_some_and(|c| c.is_ascii_digit())) {
            let (value, end) = lex_number(text, &chars, i)?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                pos,
            });
            i = end;
            continue;
        }

        if is_ident_start(ch) {
            let mut end = i + 1;
            while end < chars.len() && is_ident_part(chars[end].1) {
                end += 1;
            }
            let stop = chars.get(end).map(|(p, _)| *p).unwrap_or(text.len());
            let name = &text[pos..stop];
            let value = match name {
                "Infinity" => f64::INFINITY,
                "NaN" => f64::NAN,
                _ => {
                    return Err(ExprError::UnknownIdentifier {
                        name: name.to_string(),
                        pos,
                    });
                }
            };
            tokens.push(Token {
                kind: TokenKind::Number(value),
                pos,
            });
            i = end;
            continue;
        }

        return Err(ExprError::UnexpectedChar { ch, pos });
    }

    Ok(tokens)
}

/// Lex `digits [. digits] [e|E [+|-] digits]` starting at `chars[start]`.
/// Returns the value and the index just past the literal.
fn lex_number(text: &str, chars: &[(usize, char)], start: usize) -> Result<(f64, usize), ExprError> {
    let pos = chars[start].0;
    let digit_at = |i: usize| chars.get(i).is_some_and(|(_, c)| c.is_ascii_digit());
    let char_at = |i: usize| chars.get(i).map(|(_, c)| *c);

    let mut i = start;
    while digit_at(i) {
        i += 1;
    }
    if char_at(i) == Some('.') {
        i += 1;
        while digit_at(i) {
            i += 1;
        }
    }
    if matches!(char_at(i), Some('e' | 'E')) {
        i += 1;
        if matches!(char_at(i), Some('+' | '-')) {
            i += 1;
        }
        if !digit_at(i) {
            return Err(ExprError::InvalidNumber { pos });
        }
        while digit_at(i) {
            i += 1;
        }
    }

    // A literal may not run straight into a name (`3A`).
    if char_at(i).is_some_and(is_ident_part) {
        return Err(ExprError::InvalidNumber { pos });
    }

    let stop = chars.get(i).map(|(p, _)| *p).unwrap_or(text.len());
    let value = text[pos..stop]
        .parse::<f64>()
        .map_err(|_| ExprError::InvalidNumber { pos })?;
    Ok((value, i))
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut acc = self.term()?;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Plus => {
                    self.pos += 1;
                    acc += self.term()?;
                }
                TokenKind::Minus => {
                    self.pos += 1;
                    acc -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut acc = self.unary()?;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Star => {
                    self.pos += 1;
                    acc *= self.unary()?;
                }
                TokenKind::Slash => {
                    self.pos += 1;
                    acc /= self.unary()?;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<f64, ExprError> {
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.unary()
            }
            Some(TokenKind::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, ExprError> {
        let tok = self.next().ok_or(ExprError::UnexpectedEnd)?;
        match tok.kind {
            TokenKind::Number(n) => Ok(n),
            TokenKind::LParen => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(value),
                    Some(other) => Err(ExprError::UnexpectedToken { pos: other.pos }),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            _ => Err(ExprError::UnexpectedToken { pos: tok.pos }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(evaluate_expression("1+2*3"), Ok(7.0));
        assert_eq!(evaluate_expression("(1+2)*3"), Ok(9.0));
        assert_eq!(evaluate_expression("10-4-3"), Ok(3.0));
        assert_eq!(evaluate_expression("8/4/2"), Ok(1.0));
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(evaluate_expression("-3"), Ok(-3.0));
        assert_eq!(evaluate_expression("5+-3"), Ok(2.0));
        assert_eq!(evaluate_expression("5- -3"), Ok(8.0));
        assert_eq!(evaluate_expression("-(2+3)*2"), Ok(-10.0));
        assert_eq!(evaluate_expression("+4"), Ok(4.0));
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(evaluate_expression("1.5e3"), Ok(1500.0));
        assert_eq!(evaluate_expression("1e+21"), Ok(1e21));
        assert_eq!(evaluate_expression(".5+5."), Ok(5.5));
        assert_eq!(evaluate_expression("1E+2"), Ok(100.0));
    }

    #[test]
    fn test_division_by_zero_propagates() {
        assert_eq!(evaluate_expression("5/0"), Ok(f64::INFINITY));
        assert_eq!(evaluate_expression("-5/0"), Ok(f64::NEG_INFINITY));
        assert!(evaluate_expression("0/0").unwrap().is_nan());
    }

    #[test]
    fn test_non_finite_literals() {
        assert_eq!(evaluate_expression("Infinity-1"), Ok(f64::INFINITY));
        assert!(evaluate_expression("NaN+1").unwrap().is_nan());
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(evaluate_expression(""), Err(ExprError::Empty));
        assert_eq!(evaluate_expression("   "), Err(ExprError::Empty));
        assert_eq!(evaluate_expression("5+"), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate_expression("(5"), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate_expression("5)"), Err(ExprError::UnexpectedToken { pos: 1 }));
        assert_eq!(evaluate_expression("()"), Err(ExprError::UnexpectedToken { pos: 1 }));
        assert_eq!(evaluate_expression("5 3"), Err(ExprError::UnexpectedToken { pos: 2 }));
        assert!(matches!(
            evaluate_expression("MAX(1)"),
            Err(ExprError::UnknownIdentifier { .. })
        ));
        assert!(matches!(
            evaluate_expression("INFINITY"),
            Err(ExprError::UnknownIdentifier { .. })
        ));
        assert!(matches!(
            evaluate_expression("2%3"),
            Err(ExprError::UnexpectedChar { ch: '%', .. })
        ));
    }

    #[test]
    fn test_increment_operators_rejected() {
        assert_eq!(
            evaluate_expression("5--3"),
            Err(ExprError::IncrementOperator { pos: 1 })
        );
        assert_eq!(
            evaluate_expression("5++3"),
            Err(ExprError::IncrementOperator { pos: 1 })
        );
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(evaluate_expression("1e"), Err(ExprError::InvalidNumber { pos: 0 }));
        assert_eq!(evaluate_expression("3A"), Err(ExprError::InvalidNumber { pos: 0 }));
        assert_eq!(evaluate_expression("1.2.3"), Err(ExprError::UnexpectedToken { pos: 3 }));
    }
}
