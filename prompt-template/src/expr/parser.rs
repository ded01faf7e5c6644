//! Recursive descent parser, lowest precedence first:
//! ternary, elvis, or, and, equality, comparison, additive, multiplicative, unary, postfix.
//!
//! Nesting (parentheses, brackets, call arguments, operator chains, unary prefixes, member
//! access) is capped at [`MAX_NESTING_DEPTH`] so neither parsing nor evaluation can exhaust
//! the stack.

use serde_json::Value;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::lexer::{tokenize, Spanned, Token};
use super::SyntaxError;
use crate::catalog::find_function;
use crate::value::float_value;

/// Deepest expression tree the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parses one expression; the whole input must be consumed.
pub fn parse(src: &str) -> Result<Expr, SyntaxError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(SyntaxError::new("empty expression", 0));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: src.len(),
        depth: 0,
    };
    let expr = parser.ternary()?;
    match parser.peek() {
        None => Ok(expr),
        Some(t) => Err(SyntaxError::new(
            format!("unexpected {} after expression", t.token.describe()),
            t.offset,
        )),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|s| &s.token)
    }

    fn next(&mut self) -> Option<Spanned> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn offset(&self) -> usize {
        self.peek().map(|s| s.offset).unwrap_or(self.end)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek_token() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        match self.peek_token() {
            Some(Token::Ident(name)) if name == word => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// One level deeper; fails past [`MAX_NESTING_DEPTH`]. A failed parse is discarded, so
    /// only successful paths call [`Parser::leave`].
    fn enter(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(SyntaxError::new(
                format!("expression nesting exceeds {} levels", MAX_NESTING_DEPTH),
                self.offset(),
            ));
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<(), SyntaxError> {
        if self.eat(&token) {
            return Ok(());
        }
        let found = match self.peek() {
            Some(t) => t.token.describe(),
            None => "end of expression".to_string(),
        };
        Err(SyntaxError::new(
            format!("expected {}, found {}", what, found),
            self.offset(),
        ))
    }

    fn ternary(&mut self) -> Result<Expr, SyntaxError> {
        self.enter()?;
        let condition = self.elvis()?;
        if !self.eat(&Token::Question) {
            self.leave(1);
            return Ok(condition);
        }
        let then = self.ternary()?;
        self.expect(Token::Colon, "`:` in conditional")?;
        let otherwise = self.ternary()?;
        self.leave(1);
        Ok(Expr::Ternary {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn elvis(&mut self) -> Result<Expr, SyntaxError> {
        let value = self.or()?;
        if !self.eat(&Token::Elvis) {
            return Ok(value);
        }
        self.enter()?;
        let fallback = self.elvis()?;
        self.leave(1);
        Ok(Expr::Elvis {
            value: Box::new(value),
            fallback: Box::new(fallback),
        })
    }

    fn or(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.and()?;
        let mut levels = 0;
        while self.eat(&Token::OrOr) || self.eat_keyword("or") {
            self.enter()?;
            levels += 1;
            let right = self.and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        self.leave(levels);
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.equality()?;
        let mut levels = 0;
        while self.eat(&Token::AndAnd) || self.eat_keyword("and") {
            self.enter()?;
            levels += 1;
            let right = self.equality()?;
            left = binary(BinaryOp::And, left, right);
        }
        self.leave(levels);
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.comparison()?;
        let mut levels = 0;
        loop {
            let op = match self.peek_token() {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::Ne,
                _ => {
                    self.leave(levels);
                    return Ok(left);
                }
            };
            self.pos += 1;
            self.enter()?;
            levels += 1;
            let right = self.comparison()?;
            left = binary(op, left, right);
        }
    }

    fn comparison(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.additive()?;
        let mut levels = 0;
        loop {
            let op = match self.peek_token() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => {
                    self.leave(levels);
                    return Ok(left);
                }
            };
            self.pos += 1;
            self.enter()?;
            levels += 1;
            let right = self.additive()?;
            left = binary(op, left, right);
        }
    }

    fn additive(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.multiplicative()?;
        let mut levels = 0;
        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => {
                    self.leave(levels);
                    return Ok(left);
                }
            };
            self.pos += 1;
            self.enter()?;
            levels += 1;
            let right = self.multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.unary()?;
        let mut levels = 0;
        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => {
                    self.leave(levels);
                    return Ok(left);
                }
            };
            self.pos += 1;
            self.enter()?;
            levels += 1;
            let right = self.unary()?;
            left = binary(op, left, right);
        }
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        let op = if self.eat(&Token::Bang) || self.eat_keyword("not") {
            UnaryOp::Not
        } else if self.eat(&Token::Minus) {
            UnaryOp::Neg
        } else {
            return self.postfix();
        };
        self.enter()?;
        let operand = self.unary()?;
        self.leave(1);
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.primary()?;
        let mut levels = 0;
        loop {
            if self.eat(&Token::Dot) {
                self.enter()?;
                levels += 1;
                let offset = self.offset();
                match self.next() {
                    Some(Spanned {
                        token: Token::Ident(name),
                        ..
                    }) => {
                        expr = Expr::Member {
                            target: Box::new(expr),
                            name,
                        }
                    }
                    _ => return Err(SyntaxError::new("expected property name after `.`", offset)),
                }
            } else if self.eat(&Token::LBracket) {
                self.enter()?;
                levels += 1;
                let index = self.ternary()?;
                self.expect(Token::RBracket, "`]`")?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                self.leave(levels);
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let offset = self.offset();
        let Some(Spanned { token, .. }) = self.next() else {
            return Err(SyntaxError::new("unexpected end of expression", offset));
        };
        match token {
            Token::Str(s) => Ok(Expr::Literal(Value::String(s))),
            Token::Int(n) => Ok(Expr::Literal(Value::from(n))),
            Token::Float(f) => Ok(Expr::Literal(float_value(f).unwrap_or(Value::Null))),
            Token::LParen => {
                let inner = self.ternary()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(inner)
            }
            Token::LBracket => {
                let items = self.arguments(Token::RBracket, "`]`")?;
                Ok(Expr::List(items))
            }
            Token::Ident(name) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" => Ok(Expr::Literal(Value::Null)),
                "fn" if self.peek_token() == Some(&Token::Dot) => self.call(),
                _ => Ok(Expr::Var(name)),
            },
            other => Err(SyntaxError::new(
                format!("unexpected {}", other.describe()),
                offset,
            )),
        }
    }

    /// After `fn`: `.name(args)`.
    fn call(&mut self) -> Result<Expr, SyntaxError> {
        self.pos += 1;
        let offset = self.offset();
        let name = match self.next() {
            Some(Spanned {
                token: Token::Ident(name),
                ..
            }) => name,
            _ => return Err(SyntaxError::new("expected function name after `fn.`", offset)),
        };
        let spec = find_function(&name)
            .ok_or_else(|| SyntaxError::new(format!("unknown function `fn.{}`", name), offset))?;
        self.expect(Token::LParen, &format!("`(` after fn.{}", spec.name))?;
        let args = self.arguments(Token::RParen, "`)`")?;
        Ok(Expr::Call {
            name: spec.name,
            args,
        })
    }

    /// Comma separated expressions up to `close` (consumed).
    fn arguments(&mut self, close: Token, what: &str) -> Result<Vec<Expr>, SyntaxError> {
        let mut items = Vec::new();
        if self.eat(&close) {
            return Ok(items);
        }
        loop {
            items.push(self.ternary()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(close, what)?;
            return Ok(items);
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
