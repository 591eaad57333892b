use std::fmt;

use crate::{Node, NodeCopy};

/// A classified, positioned lexeme.
///
/// `text` holds the decoded value: for string and char tokens the escape
/// sequences have already been resolved and the quotes stripped.
#[derive(Node!)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Pos,
}

#[derive(NodeCopy!)]
pub enum TokenKind {
    EndOfInput,
    Identifier,
    Keyword,
    Integer,
    Float,
    String,
    Char,
    Operator,
    Punctuator,
}

/// 0-based row and column of a character in the source.
#[derive(NodeCopy!)]
pub struct Pos {
    pub row: u32,
    pub col: u32,
}

impl Pos {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

impl Token {
    pub fn new(kind: TokenKind, text: String, pos: Pos) -> Self {
        Self { kind, text, pos }
    }

    /// How the token reads in an error message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_owned(),
            TokenKind::Identifier => format!("identifier `{}`", self.text),
            TokenKind::Keyword => format!("keyword `{}`", self.text),
            TokenKind::Integer => format!("integer `{}`", self.text),
            TokenKind::Float => format!("float `{}`", self.text),
            TokenKind::String => format!("string {:?}", self.text),
            TokenKind::Char => format!("char {:?}", self.text),
            TokenKind::Operator | TokenKind::Punctuator => {
                format!("`{}`", self.text.escape_default())
            }
        }
    }
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::EndOfInput => "EndOfInput",
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::Integer => "Integer",
            TokenKind::Float => "Float",
            TokenKind::String => "String",
            TokenKind::Char => "Char",
            TokenKind::Operator => "Operator",
            TokenKind::Punctuator => "Punctuator",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({}, `{}`, {}, {})",
            self.kind.name(),
            self.text.escape_default(),
            self.pos.row,
            self.pos.col
        )
    }
}
