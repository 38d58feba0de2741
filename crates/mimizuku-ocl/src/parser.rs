//! 制約式パーサー
//!
//! Recursive descent over the token stream. Precedence, loosest first:
//! `implies`, `or`/`xor`, `and`, comparisons, `+`/`-`, `*`/`/`, `not`,
//! then `.`/`->` postfix navigation.
//!
//! Bare identifiers that are not bound iterator variables are resolved as
//! navigation from the innermost implicit iterator variable, or from `self`.
//!
//! Nesting is bounded: every unary operator, primary, binary operand and
//! navigation step counts one level, and the parse fails with
//! [`ConstraintError::NestingTooDeep`] past the limit.

use crate::ast::{Arithmetic, CollectionKind, Comparison, Expr, IteratorKind, Literal, Operation};
use crate::lexer::{tokenize, Token};
use crate::ConstraintError;
use std::collections::HashSet;
use std::ops::Range;

pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Constraint parser trait
pub trait ConstraintParser {
    fn parse(&self, text: &str) -> Result<Expr, ConstraintError>;
}

/// Default implementation
#[derive(Debug, Clone, Copy)]
pub struct DefaultConstraintParser {
    max_nesting: usize,
}

impl Default for DefaultConstraintParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

impl DefaultConstraintParser {
    pub fn new(max_nesting: usize) -> Self {
        Self { max_nesting }
    }

    pub fn max_nesting(&self) -> usize {
        self.max_nesting
    }
}

impl ConstraintParser for DefaultConstraintParser {
    fn parse(&self, text: &str) -> Result<Expr, ConstraintError> {
        let tokens = tokenize(text)?;
        let written = tokens
            .iter()
            .filter_map(|(token, _)| match token {
                Token::Ident(name) => Some(*name),
                _ => None,
            })
            .collect();
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: text.len(),
            depth: 0,
            max_depth: self.max_nesting,
            bound: vec!["self".to_string()],
            implicit: Vec::new(),
            written,
            generated: 0,
        };
        let expr = parser.parse_expression()?;
        if let Some((token, span)) = parser.tokens.get(parser.pos) {
            return Err(ConstraintError::Parse {
                position: span.start,
                message: format!("unexpected trailing {:?}", token),
            });
        }
        Ok(expr)
    }
}

/// Convenience wrapper around [`DefaultConstraintParser`]
pub fn parse(text: &str) -> Result<Expr, ConstraintError> {
    DefaultConstraintParser::default().parse(text)
}

struct Parser<'a> {
    tokens: Vec<(Token<'a>, Range<usize>)>,
    pos: usize,
    end: usize,
    depth: usize,
    max_depth: usize,
    /// Variables in scope, innermost last
    bound: Vec<String>,
    /// Generated variables of iterators written without one
    implicit: Vec<String>,
    /// Identifiers in the text, never reused for generated variables
    written: HashSet<&'a str>,
    generated: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn peek_at(&self, offset: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + offset).map(|(t, _)| *t)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(_, span)| span.start)
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, ConstraintError> {
        Err(ConstraintError::Parse {
            position: self.position(),
            message: message.into(),
        })
    }

    fn descend(&mut self) -> Result<(), ConstraintError> {
        if self.depth >= self.max_depth {
            return Err(ConstraintError::NestingTooDeep {
                limit: self.max_depth,
                position: self.position(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: Token<'a>) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token<'a>) -> Result<(), ConstraintError> {
        if self.eat(expected) {
            Ok(())
        } else {
            match self.peek() {
                Some(found) => self.error(format!("expected {:?}, found {:?}", expected, found)),
                None => self.error(format!("expected {:?}, found end of input", expected)),
            }
        }
    }

    fn expect_ident(&mut self) -> Result<&'a str, ConstraintError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(name)
            }
            Some(found) => self.error(format!("expected identifier, found {:?}", found)),
            None => self.error("expected identifier, found end of input"),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, ConstraintError> {
        self.parse_implies()
    }

    fn parse_implies(&mut self) -> Result<Expr, ConstraintError> {
        let base = self.depth;
        let mut left = self.parse_or()?;
        while self.eat(Token::Implies) {
            self.descend()?;
            let right = self.parse_or()?;
            left = Expr::binary(Operation::Implies, left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ConstraintError> {
        let base = self.depth;
        let mut left = self.parse_and()?;
        loop {
            let op = match self.peek() {
                Some(Token::Or) => Operation::Or,
                Some(Token::Xor) => Operation::Xor,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let right = self.parse_and()?;
            left = Expr::binary(op, left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ConstraintError> {
        let base = self.depth;
        let mut left = self.parse_comparison()?;
        while self.eat(Token::And) {
            self.descend()?;
            let right = self.parse_comparison()?;
            left = Expr::binary(Operation::And, left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ConstraintError> {
        let left = self.parse_additive()?;
        let comparison = match self.peek() {
            Some(Token::Eq) => Comparison::Eq,
            Some(Token::Ne) => Comparison::Ne,
            Some(Token::Lt) => Comparison::Lt,
            Some(Token::Le) => Comparison::Le,
            Some(Token::Gt) => Comparison::Gt,
            Some(Token::Ge) => Comparison::Ge,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_additive()?;
        Ok(Expr::binary(Operation::Compare(comparison), left, right))
    }

    fn parse_additive(&mut self) -> Result<Expr, ConstraintError> {
        let base = self.depth;
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => Arithmetic::Add,
                Some(Token::Minus) => Arithmetic::Sub,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let right = self.parse_multiplicative()?;
            left = Expr::binary(Operation::Arithmetic(op), left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ConstraintError> {
        let base = self.depth;
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => Arithmetic::Mul,
                Some(Token::Slash) => Arithmetic::Div,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let right = self.parse_unary()?;
            left = Expr::binary(Operation::Arithmetic(op), left, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ConstraintError> {
        self.descend()?;
        let expr = if self.eat(Token::Not) {
            self.parse_unary().map(|operand| Expr::unary(Operation::Not, operand))
        } else {
            self.parse_postfix()
        };
        self.depth -= 1;
        expr
    }

    fn parse_postfix(&mut self) -> Result<Expr, ConstraintError> {
        let base = self.depth;
        let mut expr = self.parse_primary()?;
        loop {
            if matches!(self.peek(), Some(Token::Dot) | Some(Token::Arrow)) {
                self.descend()?;
            }
            if self.eat(Token::Dot) {
                let name = self.expect_ident()?;
                expr = if self.peek() == Some(Token::LParen) {
                    self.parse_call(expr, name, false)?
                } else {
                    Expr::property(expr, name)
                };
            } else if self.eat(Token::Arrow) {
                let name = self.expect_ident()?;
                if self.peek() != Some(Token::LParen) {
                    return self.error(format!("expected '(' after ->{}", name));
                }
                expr = match IteratorKind::from_name(name) {
                    Some(kind) => self.parse_iterator(expr, kind)?,
                    None => self.parse_call(expr, name, true)?,
                };
            } else {
                break;
            }
        }
        self.depth = base;
        Ok(expr)
    }

    fn parse_call(&mut self, source: Expr, name: &str, arrow: bool) -> Result<Expr, ConstraintError> {
        let op = Operation::from_name(name, arrow);
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if !self.eat(Token::RParen) {
            loop {
                let arg = if op.takes_type_argument() {
                    self.parse_type_path()?
                } else {
                    self.parse_expression()?
                };
                args.push(arg);
                if self.eat(Token::RParen) {
                    break;
                }
                self.expect(Token::Comma)?;
            }
        }
        Ok(Expr::call(source, op, args))
    }

    fn parse_type_path(&mut self) -> Result<Expr, ConstraintError> {
        let mut segments = vec![self.expect_ident()?.to_string()];
        while self.eat(Token::PathSep) {
            segments.push(self.expect_ident()?.to_string());
        }
        Ok(Expr::Literal(Literal::Path(segments)))
    }

    fn parse_iterator(&mut self, source: Expr, kind: IteratorKind) -> Result<Expr, ConstraintError> {
        self.expect(Token::LParen)?;

        let explicit = match (self.peek(), self.peek_at(1)) {
            (Some(Token::Ident(name)), Some(Token::Bar)) => {
                self.pos += 2;
                Some(name.to_string())
            }
            (Some(Token::Ident(name)), Some(Token::Colon)) => {
                self.pos += 2;
                self.parse_type_path()?;
                self.expect(Token::Bar)?;
                Some(name.to_string())
            }
            (Some(Token::Ident(_)), Some(Token::Comma)) => {
                return self.error(format!("{} with several iterator variables", kind.name()));
            }
            _ => None,
        };

        let (variable, implicit) = match explicit {
            Some(name) => (name, false),
            None => (self.fresh_variable(), true),
        };

        self.bound.push(variable.clone());
        if implicit {
            self.implicit.push(variable.clone());
        }
        let body = self.parse_expression();
        if implicit {
            self.implicit.pop();
        }
        self.bound.pop();
        let body = body?;

        self.expect(Token::RParen)?;
        Ok(Expr::iterate(source, kind, variable, body))
    }

    fn fresh_variable(&mut self) -> String {
        loop {
            self.generated += 1;
            let name = format!("it{}", self.generated);
            if !self.bound.contains(&name) && !self.written.contains(name.as_str()) {
                return name;
            }
        }
    }

    fn implicit_source(&self) -> Expr {
        match self.implicit.last() {
            Some(name) => Expr::variable(name.clone()),
            None => Expr::self_ref(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ConstraintError> {
        self.descend()?;
        let expr = self.parse_atom();
        self.depth -= 1;
        expr
    }

    fn parse_atom(&mut self) -> Result<Expr, ConstraintError> {
        let position = self.position();
        match self.advance() {
            Some(Token::SelfKw) => Ok(Expr::self_ref()),
            Some(Token::True) => Ok(Expr::Literal(Literal::Boolean(true))),
            Some(Token::False) => Ok(Expr::Literal(Literal::Boolean(false))),
            Some(Token::Integer(digits)) => digits
                .parse::<u64>()
                .map(|n| Expr::Literal(Literal::Integer(n)))
                .map_err(|e| ConstraintError::Parse {
                    position,
                    message: format!("invalid integer {}: {}", digits, e),
                }),
            Some(Token::StringLiteral(quoted)) => {
                let inner = &quoted[1..quoted.len() - 1];
                Ok(Expr::Literal(Literal::String(inner.to_string())))
            }
            Some(Token::LParen) => {
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Ident(name)) => self.parse_identifier(name),
            Some(found) => Err(ConstraintError::Parse {
                position,
                message: format!("unexpected {:?}", found),
            }),
            None => Err(ConstraintError::Parse {
                position,
                message: "unexpected end of input".to_string(),
            }),
        }
    }

    fn parse_identifier(&mut self, name: &'a str) -> Result<Expr, ConstraintError> {
        if self.peek() == Some(Token::LBrace) {
            if let Some(kind) = CollectionKind::from_name(name) {
                return self.parse_collection(kind);
            }
        }

        if self.peek() == Some(Token::PathSep) {
            self.pos -= 1;
            return self.parse_type_path();
        }

        if self.bound.iter().any(|b| b == name) {
            return Ok(Expr::variable(name));
        }

        let source = self.implicit_source();
        if self.peek() == Some(Token::LParen) {
            self.parse_call(source, name, false)
        } else {
            Ok(Expr::property(source, name))
        }
    }

    fn parse_collection(&mut self, kind: CollectionKind) -> Result<Expr, ConstraintError> {
        self.expect(Token::LBrace)?;
        let mut items = Vec::new();
        if !self.eat(Token::RBrace) {
            loop {
                items.push(self.parse_expression()?);
                if self.eat(Token::RBrace) {
                    break;
                }
                self.expect(Token::Comma)?;
            }
        }
        Ok(Expr::Collection { kind, items })
    }
}
