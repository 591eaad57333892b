use super::{ParseResult, Parser, SyntaxError, SyntaxErrorKind};
use crate::ast::Expr;
use crate::token::TokenKind;

/// Binding strength of a binary operator; higher binds tighter. Operator
/// characters outside this table never form a binary expression.
fn binary_prec(op: &str) -> Option<u32> {
    match op {
        "=" => Some(1),
        "<" | ">" | "<=" | ">=" | "==" | "!=" => Some(7),
        "+" | "-" => Some(10),
        "*" | "/" | "%" => Some(20),
        _ => None,
    }
}

impl Parser<'_, '_> {
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        let atom = self.parse_atom()?;
        let expr = self.maybe_binary(atom, 0)?;
        self.maybe_call(expr)
    }

    fn parse_atom(&mut self) -> ParseResult<Expr> {
        let atom = self.parse_bare_atom()?;
        self.maybe_call(atom)
    }

    fn parse_bare_atom(&mut self) -> ParseResult<Expr> {
        self.skip_newlines()?;

        if self.token_is(TokenKind::Punctuator, "(")? {
            self.lexer.advance_token()?;
            let expr = self.parse_expression()?;
            self.expect(TokenKind::Punctuator, ")")?;
            return Ok(expr);
        }

        if self.token_is(TokenKind::Keyword, "begin")?
            || self.token_is(TokenKind::Keyword, "do")?
            || self.token_is(TokenKind::Keyword, "then")?
        {
            self.lexer.advance_token()?;
            return self.parse_block();
        }

        if self.token_is(TokenKind::Keyword, "if")? {
            return self.parse_if();
        }

        if self.token_is(TokenKind::Keyword, "true")? || self.token_is(TokenKind::Keyword, "false")?
        {
            let token = self.lexer.advance_token()?;
            return Ok(Expr::Bool(token.text == "true"));
        }

        if self.token_is(TokenKind::Keyword, "define")? {
            return self.parse_function();
        }

        if self.token_is(TokenKind::Keyword, "let")? {
            self.lexer.advance_token()?;
            return Ok(Expr::Var(self.parse_var_decl()?));
        }

        let token = self.lexer.advance_token()?;
        match token.kind {
            TokenKind::Identifier => Ok(Expr::Name(token.text)),

            TokenKind::Integer => match token.text.parse() {
                Ok(n) => Ok(Expr::Integer(n)),
                Err(_) => Err(SyntaxError {
                    kind: SyntaxErrorKind::NumberOutOfRange(token.text),
                    pos: token.pos,
                }
                .into()),
            },

            TokenKind::Float => match token.text.parse() {
                Ok(n) => Ok(Expr::Float(n)),
                Err(_) => Err(SyntaxError {
                    kind: SyntaxErrorKind::NumberOutOfRange(token.text),
                    pos: token.pos,
                }
                .into()),
            },

            TokenKind::String => Ok(Expr::String(token.text)),

            // Only the first byte of the decoded literal is the char value;
            // an empty literal decodes to byte 0.
            TokenKind::Char => Ok(Expr::Char(token.text.bytes().next().unwrap_or(0))),

            _ => Err(self.error_expected("an expression", &token)),
        }
    }

    /// Expressions terminated by newlines, up to a consumed `end` keyword.
    /// The newline before `end` is optional.
    fn parse_block(&mut self) -> ParseResult<Expr> {
        let mut body = vec![];

        loop {
            self.skip_newlines()?;
            if self.token_is(TokenKind::Keyword, "end")? {
                break;
            }
            if self.token_is(TokenKind::EndOfInput, "")? {
                let found = self.lexer.current_token()?.clone();
                return Err(self.error_expected("keyword `end`", &found));
            }

            body.push(self.parse_expression()?);

            if self.token_is(TokenKind::Keyword, "end")? {
                break;
            }
            if self.token_is(TokenKind::EndOfInput, "")? {
                let found = self.lexer.current_token()?.clone();
                return Err(self.error_expected("keyword `end`", &found));
            }
            self.expect(TokenKind::Punctuator, "\n")?;
        }
        self.lexer.advance_token()?; // `end`

        Ok(Expr::Program(body))
    }

    fn parse_if(&mut self) -> ParseResult<Expr> {
        self.lexer.advance_token()?; // `if`

        let cond = self.parse_expression()?;
        let then = self.parse_expression()?;

        let else_ = if self.token_is(TokenKind::Keyword, "else")? {
            self.lexer.advance_token()?;
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        Ok(Expr::If {
            cond: Box::new(cond),
            then: Box::new(then),
            else_,
        })
    }

    /// Wraps `expr` into a call when an argument list follows. Applied once
    /// per grammar site; further `(` tokens are not consumed here.
    fn maybe_call(&mut self, expr: Expr) -> ParseResult<Expr> {
        if self.token_is(TokenKind::Punctuator, "(")? {
            self.parse_call(expr)
        } else {
            Ok(expr)
        }
    }

    fn parse_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let args = self.delimited("(", ")", ",", Self::parse_expression)?;
        Ok(Expr::Call {
            callee: Box::new(callee),
            args,
        })
    }

    /// Precedence climbing. Consumes operators binding at least as tightly as
    /// `min_prec`; the right-hand side climbs at the consumed operator's own
    /// precedence, so `a = b = c` nests to the right.
    fn maybe_binary(&mut self, left: Expr, min_prec: u32) -> ParseResult<Expr> {
        if !self.token_is(TokenKind::Operator, "")? {
            return Ok(left);
        }

        let token = self.lexer.current_token()?;
        let op = token.text.clone();
        let pos = token.pos;

        let Some(prec) = binary_prec(&op) else {
            return Err(SyntaxError {
                kind: SyntaxErrorKind::NotBinaryOperator(op),
                pos,
            }
            .into());
        };
        if prec < min_prec {
            return Ok(left);
        }

        self.lexer.advance_token()?;
        let atom = self.parse_atom()?;
        let right = self.maybe_binary(atom, prec)?;

        let expr = if op == "=" {
            Expr::Assign {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            }
        } else {
            Expr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            }
        };

        self.maybe_binary(expr, min_prec)
    }
}
