//! Tokens and token streams
//!
//! A token stream holds every token of a document in source order: real
//! tokens on the default channel, whitespace and comments on the hidden
//! channel, and a final EOF token.

use serde::{Deserialize, Serialize};

/// Token type code reserved for end of input
pub const EOF: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Real tokens seen by the parser
    Default,
    /// Whitespace and comments
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: u32,
    pub channel: Channel,
    /// 1-based line
    pub line: usize,
    /// 0-based column, in characters
    pub column: usize,
    pub text: String,
    /// Position in the owning stream
    pub index: usize,
}

impl Token {
    pub fn new(token_type: u32, channel: Channel, line: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            token_type,
            channel,
            line,
            column,
            text: text.into(),
            index: 0,
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.token_type == EOF
    }

    /// Real tokens are on the default channel and are not EOF
    #[inline]
    pub fn is_real(&self) -> bool {
        self.channel == Channel::Default && !self.is_eof()
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.channel == Channel::Hidden
    }

    /// Hidden token made only of whitespace characters
    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.is_hidden() && self.text.chars().all(char::is_whitespace)
    }

    /// Line and column just past the last character of the token
    pub fn end_position(&self) -> (usize, usize) {
        match self.text.rfind('\n') {
            Some(pos) => (
                self.line + self.text.matches('\n').count(),
                self.text[pos + 1..].chars().count(),
            ),
            None => (self.line, self.column + self.text.chars().count()),
        }
    }
}

/// All tokens of one document plus an index of the real ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
    real: Vec<usize>,
}

impl TokenStream {
    /// Build a stream, numbering tokens and appending EOF when missing
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().map_or(false, Token::is_eof) {
            let (line, column) = tokens.last().map_or((1, 0), Token::end_position);
            tokens.push(Token::new(EOF, Channel::Default, line, column, ""));
        }

        let mut real = Vec::new();
        for (i, token) in tokens.iter_mut().enumerate() {
            token.index = i;
            if token.is_real() {
                real.push(i);
            }
        }

        Self { tokens, real }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Stream indices of the real tokens, EOF excluded
    pub fn real_indices(&self) -> &[usize] {
        &self.real
    }

    #[inline]
    pub fn real_count(&self) -> usize {
        self.real.len()
    }

    /// The `k`-th real token
    #[inline]
    pub fn real(&self, k: usize) -> Option<&Token> {
        self.real.get(k).map(|&i| &self.tokens[i])
    }

    /// Move the `k`-th real token to a new position; text and channel stay fixed
    pub fn reposition_real(&mut self, k: usize, line: usize, column: usize) {
        if let Some(&i) = self.real.get(k) {
            self.tokens[i].line = line;
            self.tokens[i].column = column;
        }
    }

    pub fn eof(&self) -> &Token {
        &self.tokens[self.tokens.len() - 1]
    }

    /// Contiguous run of hidden tokens immediately before `index`
    pub fn hidden_to_left(&self, index: usize) -> &[Token] {
        let end = index.min(self.tokens.len());
        let mut start = end;
        while start > 0 && self.tokens[start - 1].is_hidden() {
            start -= 1;
        }
        &self.tokens[start..end]
    }

    /// Hidden text between the `k`-th real token and its predecessor
    pub fn hidden_text_before_real(&self, k: usize) -> String {
        match self.real.get(k) {
            Some(&i) => concat_text(self.hidden_to_left(i)),
            None => String::new(),
        }
    }

    /// Concatenated text of every hidden-channel token
    pub fn hidden_text(&self) -> String {
        concat_text(self.tokens.iter().filter(|t| t.is_hidden()))
    }

    /// Full document text
    pub fn text(&self) -> String {
        concat_text(self.tokens.iter())
    }
}

pub fn concat_text<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    let mut buf = String::new();
    for token in tokens {
        buf.push_str(&token.text);
    }
    buf
}
