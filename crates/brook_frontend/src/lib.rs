#[macro_use]
extern crate macro_rules_attribute;

mod lexer;
mod parser;

pub mod ast;
pub mod token;

pub use lexer::{LexError, LexErrorKind, LexResult, Lexer};
pub use parser::{ParseResult, Parser, SyntaxError, SyntaxErrorKind};

derive_alias! {
    #[derive(Node!)] = #[derive(Debug, Clone, PartialEq, serde::Serialize)];
    #[derive(NodeCopy!)] = #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)];
}

/// Any error raised while turning source text into a syntax tree.
///
/// Both kinds are fatal: the first one aborts the whole parse and no partial
/// tree is returned.
#[derive(serde::Serialize, thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Parses a whole source unit, returning the root `Program` node.
pub fn parse(source: &str) -> Result<ast::Expr, Error> {
    let mut lexer = Lexer::new(source);
    Parser::new(&mut lexer).parse()
}
