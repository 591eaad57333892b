
use std::str::Chars;

use crate::token::{Pos, Token, TokenKind};

#[derive(serde::Serialize, thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at {pos}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub pos: Pos,
}

#[derive(serde::Serialize, thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
}

pub type LexResult<T> = Result<T, LexError>;

pub const KEYWORDS: &[&str] = &[
    "let", "as", "const", "define", "begin", "do", "end", "if", "then", "else", "true", "false",
];

const OPERATOR_CHARS: &str = "+-*/%&|^~!?:=<>";
const PUNCTUATOR_CHARS: &str = ".,;()[]{}\n";

/// Scans a fully buffered source on demand, one token at a time.
///
/// Tokens are produced lazily: `current_token` scans and memoizes a single
/// token of lookahead, and `advance_token` consumes it. There is no stored
/// token list.
pub struct Lexer<'src> {
    chars: Chars<'src>,
    /// Cursor state before the most recent `advance_char`, for a single-step
    /// unget.
    prev: Option<Chars<'src>>,

    row: u32,
    col: u32,
    last_line_col: u32,

    current: Option<Token>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars(),
            prev: None,

            row: 0,
            col: 0,
            last_line_col: 0,

            current: None,
        }
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.row, self.col)
    }

    pub fn peek_char(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn advance_char(&mut self) -> Option<char> {
        let before = self.chars.clone();
        let ch = self.chars.next()?;
        self.prev = Some(before);

        if ch == '\n' {
            self.row += 1;
            self.last_line_col = self.col;
            self.col = 0;
        } else {
            self.col += 1;
        }

        Some(ch)
    }

    fn put_back_char(&mut self) {
        let Some(prev) = self.prev.take() else { return };
        self.chars = prev;

        if self.col == 0 {
            self.row -= 1;
            self.col = self.last_line_col;
        } else {
            self.col -= 1;
        }
    }

    pub fn at_end(&self) -> bool {
        self.peek_char().is_none()
    }

    /// Returns the buffered lookahead token, scanning one if necessary.
    /// Repeated calls return the same token until `advance_token` clears it.
    pub fn current_token(&mut self) -> LexResult<&Token> {
        match self.current {
            Some(ref token) => Ok(token),
            None => {
                let token = self.scan_token()?;
                Ok(self.current.insert(token))
            }
        }
    }

    /// Consumes and returns the current token, forcing the next
    /// `current_token` call to scan a fresh one.
    pub fn advance_token(&mut self) -> LexResult<Token> {
        match self.current.take() {
            Some(token) => Ok(token),
            None => self.scan_token(),
        }
    }

    fn scan_token(&mut self) -> LexResult<Token> {
        loop {
            self.skip_whitespace();

            // Two slashes open a comment running to end of line. A lone slash
            // is put back and scans as an operator below.
            if self.peek_char() == Some('/') {
                self.advance_char();
                if self.peek_char() == Some('/') {
                    self.skip_line_comment();
                    continue;
                }
                self.put_back_char();
            }

            break;
        }

        let pos = self.pos();

        let Some(ch) = self.peek_char() else {
            return Ok(Token::new(TokenKind::EndOfInput, String::new(), pos));
        };

        match ch {
            ch if ch.is_ascii_digit() => Ok(self.scan_number(pos)),
            ch if is_identifier(ch) => Ok(self.scan_identifier(pos)),

            '"' => {
                self.advance_char();
                let text = self.read_escaped('"');
                Ok(Token::new(TokenKind::String, text, pos))
            }

            '\'' => {
                self.advance_char();
                let text = self.read_escaped('\'');
                Ok(Token::new(TokenKind::Char, text, pos))
            }

            ch if is_operator(ch) => {
                let text = self.read_while(is_operator);
                Ok(Token::new(TokenKind::Operator, text, pos))
            }

            ch if is_punctuator(ch) => {
                self.advance_char();
                Ok(Token::new(TokenKind::Punctuator, ch.to_string(), pos))
            }

            ch => Err(LexError {
                kind: LexErrorKind::UnexpectedChar(ch),
                pos,
            }),
        }
    }

    fn scan_number(&mut self, pos: Pos) -> Token {
        let mut seen_dot = false;
        let text = self.read_while(|ch| match ch {
            // A second dot ends the number and is left unconsumed.
            '.' if seen_dot => false,
            '.' => {
                seen_dot = true;
                true
            }
            ch => ch.is_ascii_digit(),
        });

        let kind = if seen_dot {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };
        Token::new(kind, text, pos)
    }

    fn scan_identifier(&mut self, pos: Pos) -> Token {
        let text = self.read_while(is_identifier);
        let kind = if KEYWORDS.contains(&text.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, text, pos)
    }

    fn skip_whitespace(&mut self) {
        self.read_while(|ch| ch != '\n' && is_whitespace(ch));
    }

    fn skip_line_comment(&mut self) {
        self.read_while(|ch| ch != '\n');
    }

    /// Consumes the maximal (possibly empty) run of characters satisfying
    /// `pred`.
    fn read_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek_char() {
            if !pred(ch) {
                break;
            }
            self.advance_char();
            text.push(ch);
        }
        text
    }

    /// Consumes characters up to an unescaped `end`, decoding backslash
    /// escapes. Runs off the end of input without complaint; the literal is
    /// simply truncated there.
    fn read_escaped(&mut self, end: char) -> String {
        let mut text = String::new();
        let mut escaped = false;

        while let Some(ch) = self.advance_char() {
            if escaped {
                text.push(unescape(ch));
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == end {
                break;
            } else {
                text.push(ch);
            }
        }

        text
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c')
}

fn is_identifier(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_operator(ch: char) -> bool {
    OPERATOR_CHARS.contains(ch)
}

fn is_punctuator(ch: char) -> bool {
    PUNCTUATOR_CHARS.contains(ch)
}

fn unescape(ch: char) -> char {
    match ch {
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0c',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0b',
        // `\\`, `\'`, `\"` and `\?` escape to themselves, as does anything
        // unrecognized.
        ch => ch,
    }
}
