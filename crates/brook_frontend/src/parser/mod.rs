#[cfg(test)]
mod tests;

mod expr;

use crate::ast::{Expr, FuncDecl, VarDecl};
use crate::lexer::Lexer;
use crate::token::{Pos, Token, TokenKind};
use crate::Error;

#[derive(serde::Serialize, thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {pos}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub pos: Pos,
}

#[derive(serde::Serialize, thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },

    #[error("`{0}` is not a binary operator")]
    NotBinaryOperator(String),

    #[error("number literal `{0}` is out of range")]
    NumberOutOfRange(String),

    #[error("function body must be a block")]
    FunctionBodyNotABlock,
}

pub type ParseResult<T> = Result<T, Error>;

/// Recursive-descent parser over one [`Lexer`].
///
/// Holds no state of its own beyond the borrowed lexer; fails fast on the
/// first lexical or syntax error.
pub struct Parser<'a, 'src> {
    lexer: &'a mut Lexer<'src>,
}

impl<'a, 'src> Parser<'a, 'src> {
    pub fn new(lexer: &'a mut Lexer<'src>) -> Self {
        Self { lexer }
    }

    /// Parses the whole source unit, returning the root `Program` node.
    pub fn parse(mut self) -> ParseResult<Expr> {
        let mut body = vec![];

        loop {
            self.skip_newlines()?;
            if self.token_is(TokenKind::EndOfInput, "")? {
                break;
            }

            body.push(self.parse_expression()?);

            // End of input terminates the last statement in place of a
            // newline.
            if self.token_is(TokenKind::EndOfInput, "")? {
                break;
            }
            self.expect(TokenKind::Punctuator, "\n")?;
        }

        Ok(Expr::Program(body))
    }

    fn parse_function(&mut self) -> ParseResult<Expr> {
        self.lexer.advance_token()?; // `define`

        let name = self.expect_identifier()?;
        let params = self.delimited("(", ")", ",", Self::parse_var_decl)?;

        self.expect(TokenKind::Keyword, "as")?;
        // Type expressions are not parsed structurally; the raw token text is
        // the type.
        let ret_type = self.lexer.advance_token()?.text;

        let body = self.parse_expression()?;
        if !matches!(body, Expr::Program(_)) {
            let pos = self.lexer.current_token()?.pos;
            return Err(SyntaxError {
                kind: SyntaxErrorKind::FunctionBodyNotABlock,
                pos,
            }
            .into());
        }

        Ok(Expr::Function(FuncDecl {
            name,
            params,
            body: Box::new(body),
            ret_type,
        }))
    }

    fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Keyword, "as")?;
        let type_name = self.lexer.advance_token()?.text;

        let init = if self.token_is(TokenKind::Operator, "=")? {
            self.lexer.advance_token()?;
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        Ok(VarDecl {
            name,
            type_name,
            init,
        })
    }

    /// Parses `start`, a possibly empty `separator`-joined list of elements,
    /// then `stop`. A trailing separator before `stop` is permitted.
    fn delimited<T>(
        &mut self,
        start: &str,
        stop: &str,
        separator: &str,
        mut parse_element: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        let mut elements = vec![];
        let mut first = true;

        self.expect(TokenKind::Punctuator, start)?;
        while !self.token_is(TokenKind::EndOfInput, "")? {
            if self.token_is(TokenKind::Punctuator, stop)? {
                break;
            }

            if first {
                first = false;
            } else {
                self.expect(TokenKind::Punctuator, separator)?;
            }

            if self.token_is(TokenKind::Punctuator, stop)? {
                break;
            }

            elements.push(parse_element(self)?);
        }
        self.expect(TokenKind::Punctuator, stop)?;

        Ok(elements)
    }

    /// Whether the current token has the given kind, and the given text
    /// unless `text` is empty ("any token of that kind").
    fn token_is(&mut self, kind: TokenKind, text: &str) -> ParseResult<bool> {
        let token = self.lexer.current_token()?;
        Ok(token.kind == kind && (text.is_empty() || token.text == text))
    }

    fn expect(&mut self, kind: TokenKind, text: &str) -> ParseResult<Token> {
        if self.token_is(kind, text)? {
            Ok(self.lexer.advance_token()?)
        } else {
            let expected = match kind {
                TokenKind::Keyword => format!("keyword `{text}`"),
                _ => format!("`{}`", text.escape_default()),
            };
            let found = self.lexer.current_token()?.clone();
            Err(self.error_expected(expected, &found))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        let token = self.lexer.advance_token()?;
        if token.kind == TokenKind::Identifier {
            Ok(token.text)
        } else {
            Err(self.error_expected("an identifier", &token))
        }
    }

    fn skip_newlines(&mut self) -> ParseResult<()> {
        while self.token_is(TokenKind::Punctuator, "\n")? {
            self.lexer.advance_token()?;
        }
        Ok(())
    }

    fn error_expected(&self, expected: impl Into<String>, found: &Token) -> Error {
        SyntaxError {
            kind: SyntaxErrorKind::Expected {
                expected: expected.into(),
                found: found.describe(),
            },
            pos: found.pos,
        }
        .into()
    }
}
