//! Lexer for C-family syntax
//!
//! Whitespace runs and comments go to the hidden channel. Keywords get
//! their own type codes so features can tell `if` from an identifier.

use crate::error::{LangError, Result};
use crate::token::{Channel, Token, TokenStream};

pub const WS: u32 = 1;
pub const LINE_COMMENT: u32 = 2;
pub const BLOCK_COMMENT: u32 = 3;
pub const IDENT: u32 = 4;
pub const NUMBER: u32 = 5;
pub const STRING: u32 = 6;
pub const CHAR: u32 = 7;

const OPERATOR_BASE: u32 = 32;
const KEYWORD_BASE: u32 = 128;

/// Operators and punctuation; longest match wins
pub const OPERATORS: &[&str] = &[
    "(", ")", "{", "}", "[", "]", ";", ",", ".", "=", "<", ">", "!", "~", "?", ":", "+", "-", "*", "/",
    "&", "|", "^", "%", "@", "#", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=", "<<", ">>", "->", "::", "<<=", ">>=", ">>>", "...", ">>>=",
];

const MAX_OPERATOR_LEN: usize = 4;

/// Type code of an operator, if `text` is one
pub fn operator_type(text: &str) -> Option<u32> {
    OPERATORS
        .iter()
        .position(|op| *op == text)
        .map(|i| OPERATOR_BASE + i as u32)
}

pub struct Lexer<'k> {
    keywords: &'k [&'k str],
}

impl<'k> Lexer<'k> {
    pub fn new(keywords: &'k [&'k str]) -> Self {
        Self { keywords }
    }

    pub fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut cursor = Cursor::new(text);
        let mut tokens = Vec::new();

        while let Some(c) = cursor.peek(0) {
            let (line, column, start) = (cursor.line, cursor.column, cursor.pos);

            let (token_type, channel) = if c.is_whitespace() {
                cursor.bump_while(char::is_whitespace);
                (WS, Channel::Hidden)
            } else if c == '/' && cursor.peek(1) == Some('/') {
                cursor.bump_while(|c| c != '\n');
                (LINE_COMMENT, Channel::Hidden)
            } else if c == '/' && cursor.peek(1) == Some('*') {
                cursor.bump_n(2);
                if !cursor.bump_until("*/") {
                    return Err(lex_error(line, column, "unterminated block comment"));
                }
                (BLOCK_COMMENT, Channel::Hidden)
            } else if is_ident_start(c) {
                cursor.bump_while(is_ident_part);
                let word = cursor.slice(start);
                let token_type = match self.keywords.iter().position(|k| *k == word) {
                    Some(i) => KEYWORD_BASE + i as u32,
                    None => IDENT,
                };
                (token_type, Channel::Default)
            } else if c.is_ascii_digit() || (c == '.' && cursor.peek(1).map_or(false, |n| n.is_ascii_digit())) {
                cursor.bump_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
                (NUMBER, Channel::Default)
            } else if c == '"' || c == '\'' {
                self.quoted(&mut cursor, c, line, column)?;
                (if c == '"' { STRING } else { CHAR }, Channel::Default)
            } else if let Some(len) = longest_operator(&cursor) {
                cursor.bump_n(len);
                let token_type = operator_type(&cursor.slice(start)).unwrap_or(OPERATOR_BASE);
                (token_type, Channel::Default)
            } else {
                return Err(lex_error(line, column, &format!("unexpected character {:?}", c)));
            };

            tokens.push(Token::new(token_type, channel, line, column, cursor.slice(start)));
        }

        Ok(TokenStream::new(tokens))
    }

    fn quoted(&self, cursor: &mut Cursor, quote: char, line: usize, column: usize) -> Result<()> {
        cursor.bump_n(1);
        loop {
            match cursor.peek(0) {
                None | Some('\n') => return Err(lex_error(line, column, "unterminated literal")),
                Some('\\') => cursor.bump_n(2),
                Some(c) if c == quote => {
                    cursor.bump_n(1);
                    return Ok(());
                }
                Some(_) => cursor.bump_n(1),
            }
        }
    }
}

fn lex_error(line: usize, column: usize, message: &str) -> LangError {
    LangError::Lex {
        line,
        column,
        message: message.to_string(),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn longest_operator(cursor: &Cursor) -> Option<usize> {
    (1..=MAX_OPERATOR_LEN)
        .rev()
        .find(|&len| OPERATORS.iter().any(|op| op.chars().count() == len && cursor.starts_with(op)))
}

/// Character cursor tracking 1-based lines and 0-based columns
struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek(i) == Some(c))
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek(0) {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek(0).map_or(false, &pred) {
            self.bump();
        }
    }

    /// Advance past the next occurrence of `end`; false when input runs out
    fn bump_until(&mut self, end: &str) -> bool {
        while self.peek(0).is_some() {
            if self.starts_with(end) {
                self.bump_n(end.chars().count());
                return true;
            }
            self.bump();
        }
        false
    }

    fn slice(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }
}
