//! Parse trees
//!
//! A deliberately small tree: rule nodes with parent links, and for every
//! real token the innermost rule that contains it. Feature extractors only
//! need rule context reachable from a token, not a full grammar.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    CompilationUnit,
    Block,
    Parens,
    Brackets,
    Statement,
}

impl RuleKind {
    /// Stable code used in feature vectors
    pub fn code(self) -> i32 {
        match self {
            RuleKind::CompilationUnit => 1,
            RuleKind::Block => 2,
            RuleKind::Parens => 3,
            RuleKind::Brackets => 4,
            RuleKind::Statement => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleNode {
    pub kind: RuleKind,
    pub parent: Option<usize>,
    pub depth: usize,
    /// First real token covered
    pub start: usize,
    /// Last real token covered
    pub stop: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseTree {
    nodes: Vec<RuleNode>,
    /// Innermost rule per real token
    token_rule: Vec<usize>,
}

impl ParseTree {
    /// Tree holding only the root rule
    pub fn new(root: RuleKind, real_count: usize) -> Self {
        Self {
            nodes: vec![RuleNode {
                kind: root,
                parent: None,
                depth: 0,
                start: 0,
                stop: real_count.saturating_sub(1),
            }],
            token_rule: vec![0; real_count],
        }
    }

    pub const ROOT: usize = 0;

    /// Add a child rule starting at real token `start`; returns its id
    pub fn open(&mut self, kind: RuleKind, parent: usize, start: usize) -> usize {
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(RuleNode {
            kind,
            parent: Some(parent),
            depth,
            start,
            stop: start,
        });
        self.nodes.len() - 1
    }

    pub fn close(&mut self, node: usize, stop: usize) {
        self.nodes[node].stop = stop;
    }

    /// Record `node` as the innermost rule of real token `k`
    pub fn assign(&mut self, k: usize, node: usize) {
        if let Some(slot) = self.token_rule.get_mut(k) {
            *slot = node;
        }
    }

    pub fn node(&self, id: usize) -> &RuleNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id of the innermost rule containing real token `k` (root when out of range)
    pub fn rule_id_of(&self, k: usize) -> usize {
        self.token_rule.get(k).copied().unwrap_or(Self::ROOT)
    }

    pub fn rule_of(&self, k: usize) -> &RuleNode {
        self.node(self.rule_id_of(k))
    }

    pub fn parent_of(&self, id: usize) -> Option<&RuleNode> {
        self.nodes[id].parent.map(|p| &self.nodes[p])
    }

    /// Walk from the rule of token `k` up to the root
    pub fn ancestors(&self, k: usize) -> impl Iterator<Item = &RuleNode> {
        let mut next = Some(self.rule_id_of(k));
        std::iter::from_fn(move || {
            let id = next?;
            next = self.nodes[id].parent;
            Some(&self.nodes[id])
        })
    }
}
