//! Bracket and statement structure for C-family token streams
//!
//! No grammar is checked beyond balanced brackets. Statements run from their
//! first token to a `;` or to the `}` that ends a trailing block.

use crate::error::{LangError, Result};
use crate::token::{Token, TokenStream};
use crate::tree::{ParseTree, RuleKind};

/// Tokens that keep a statement open after one of its blocks closes
const CONTINUATIONS: &[&str] = &[";", ",", ")", ".", "else", "catch", "finally", "while"];

pub struct Parser<'a> {
    tokens: &'a TokenStream,
    tree: ParseTree,
    stack: Vec<usize>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenStream) -> Self {
        Self {
            tokens,
            tree: ParseTree::new(RuleKind::CompilationUnit, tokens.real_count()),
            stack: vec![ParseTree::ROOT],
        }
    }

    pub fn parse(mut self) -> Result<ParseTree> {
        let tokens = self.tokens;
        for k in 0..tokens.real_count() {
            let Some(token) = tokens.real(k) else {
                break;
            };
            match token.text.as_str() {
                "{" => self.open_bracket(k, RuleKind::Block),
                "(" => self.open_bracket(k, RuleKind::Parens),
                "[" => self.open_bracket(k, RuleKind::Brackets),
                "}" => self.close_bracket(k, token, RuleKind::Block)?,
                ")" => self.close_bracket(k, token, RuleKind::Parens)?,
                "]" => self.close_bracket(k, token, RuleKind::Brackets)?,
                ";" => {
                    self.enter_statement(k);
                    let top = self.top();
                    self.tree.assign(k, top);
                    if self.tree.node(top).kind == RuleKind::Statement {
                        self.pop(k);
                    }
                }
                _ => {
                    self.enter_statement(k);
                    self.tree.assign(k, self.top());
                }
            }
        }

        let last = self.tokens.real_count().saturating_sub(1);
        while let Some(&top) = self.stack.last() {
            match self.tree.node(top).kind {
                RuleKind::Statement => self.pop(last),
                RuleKind::CompilationUnit => break,
                kind => {
                    let node = self.tree.node(top);
                    let at = self.tokens.real(node.start).map_or((1, 0), |t| (t.line, t.column));
                    return Err(LangError::Parse {
                        line: at.0,
                        column: at.1,
                        message: format!("unclosed {:?}", kind),
                    });
                }
            }
        }

        Ok(self.tree)
    }

    fn top(&self) -> usize {
        self.stack.last().copied().unwrap_or(ParseTree::ROOT)
    }

    fn pop(&mut self, stop: usize) {
        if let Some(id) = self.stack.pop() {
            self.tree.close(id, stop);
        }
    }

    /// Open a statement when the current rule holds statements directly
    fn enter_statement(&mut self, k: usize) {
        let top = self.top();
        if matches!(self.tree.node(top).kind, RuleKind::CompilationUnit | RuleKind::Block) {
            let id = self.tree.open(RuleKind::Statement, top, k);
            self.stack.push(id);
        }
    }

    fn open_bracket(&mut self, k: usize, kind: RuleKind) {
        self.enter_statement(k);
        let id = self.tree.open(kind, self.top(), k);
        self.tree.assign(k, id);
        self.stack.push(id);
    }

    fn close_bracket(&mut self, k: usize, token: &Token, kind: RuleKind) -> Result<()> {
        while self.tree.node(self.top()).kind == RuleKind::Statement {
            self.pop(k.saturating_sub(1));
        }

        let top = self.top();
        if self.tree.node(top).kind != kind {
            return Err(LangError::Parse {
                line: token.line,
                column: token.column,
                message: format!("unexpected '{}'", token.text),
            });
        }
        self.tree.assign(k, top);
        self.pop(k);

        if kind == RuleKind::Block && self.tree.node(self.top()).kind == RuleKind::Statement {
            let continues = self
                .tokens
                .real(k + 1)
                .map_or(false, |next| CONTINUATIONS.contains(&next.text.as_str()));
            if !continues {
                self.pop(k);
            }
        }
        Ok(())
    }
}
