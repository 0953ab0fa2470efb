//! Front-end and feature-extraction interfaces
//!
//! One implementation of each trait exists per supported language. The
//! formatter core only relies on these seams.

use crate::error::Result;
use crate::token::{Token, TokenStream};
use crate::tree::{ParseTree, RuleNode};
use codebuff_core::{FeatureSchema, FeatureVector};

/// Token stream plus parse tree of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub tokens: TokenStream,
    pub tree: ParseTree,
}

impl ParsedDocument {
    pub fn new(tokens: TokenStream, tree: ParseTree) -> Self {
        Self { tokens, tree }
    }

    #[inline]
    pub fn real_count(&self) -> usize {
        self.tokens.real_count()
    }

    #[inline]
    pub fn real(&self, k: usize) -> Option<&Token> {
        self.tokens.real(k)
    }

    #[inline]
    pub fn rule_of(&self, k: usize) -> &RuleNode {
        self.tree.rule_of(k)
    }

    /// Column of the first real token on the line holding real token `k`
    pub fn line_indent(&self, k: usize) -> usize {
        let Some(token) = self.real(k) else {
            return 0;
        };
        let mut indent = token.column;
        for j in (0..k).rev() {
            match self.real(j) {
                Some(prev) if prev.line == token.line => indent = prev.column,
                _ => break,
            }
        }
        indent
    }
}

/// Lexer/parser pair for one language
///
/// Whitespace and comments must land on the hidden channel; training on a
/// stream that violates this silently produces a miscalibrated corpus.
pub trait FrontEnd: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    fn parse_tokens(&self, tokens: TokenStream) -> Result<ParsedDocument>;

    fn parse(&self, text: &str) -> Result<ParsedDocument> {
        let tokens = self.tokenize(text)?;
        self.parse_tokens(tokens)
    }
}

/// Builds one feature vector per token boundary
pub trait FeatureExtractor: Send + Sync {
    fn schema(&self) -> &FeatureSchema;

    /// Context features for the boundary before real token `k`
    ///
    /// Only positions of real tokens before `k` may be read: during
    /// formatting those are the positions already emitted.
    fn extract(&self, doc: &ParsedDocument, k: usize) -> FeatureVector;
}
