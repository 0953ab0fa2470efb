//! kNN-driven whitespace injection
//!
//! The formatter re-emits the real tokens of a document and lets the
//! classifier decide what goes between each pair. Features are always read
//! from a working copy of the document whose already emitted tokens sit at
//! their output positions, so every decision sees the layout produced so far.

use codebuff_core::{Error, Label, Result, WsCategory};
use codebuff_lang::{spaces, InputDocument, Language, ParsedDocument, Token};
use codebuff_similarity::{ClassifierStats, KnnClassifier, Target};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::metrics::dump_whitespace;
use crate::trainer::actual_label;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Record a [`TokenPositionAnalysis`] per token
    pub diagnostics: bool,
}

impl FormatConfig {
    pub fn with_diagnostics() -> Self {
        Self { diagnostics: true }
    }
}

/// Exemplar that took part in a vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborReport {
    pub index: usize,
    pub distance: f64,
    pub label: Label,
}

/// Prediction record for one real token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPositionAnalysis {
    /// Real-token index in the input document
    pub index: usize,
    pub token: String,
    /// Position in the input document
    pub line: usize,
    pub column: usize,
    pub predicted: Label,
    pub actual: Label,
    pub neighbors: Vec<NeighborReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Formatted {
    pub text: String,
    /// Empty unless diagnostics were requested
    pub analysis: Vec<TokenPositionAnalysis>,
}

pub struct Formatter<'l> {
    classifier: KnnClassifier,
    lang: &'l Language,
    config: FormatConfig,
}

impl<'l> Formatter<'l> {
    /// Pair a classifier with the language its corpus was trained on
    pub fn new(classifier: KnnClassifier, lang: &'l Language, config: FormatConfig) -> Result<Self> {
        let corpus = classifier.corpus();
        if corpus.language() != lang.name() {
            return Err(Error::InvalidConfig(format!(
                "corpus language {} does not match {}",
                corpus.language(),
                lang.name()
            )));
        }
        if corpus.schema() != lang.schema() {
            return Err(Error::InvalidConfig(format!(
                "corpus schema does not match the {} feature extractor",
                lang.name()
            )));
        }
        Ok(Self {
            classifier,
            lang,
            config,
        })
    }

    pub fn classifier(&self) -> &KnnClassifier {
        &self.classifier
    }

    pub fn stats(&self) -> ClassifierStats {
        self.classifier.stats()
    }

    pub fn config(&self) -> FormatConfig {
        self.config
    }

    pub fn format(&mut self, doc: &InputDocument) -> Result<Formatted> {
        let original = &doc.parsed;
        let mut work = original.clone();
        let mut out = Emitter::default();
        let mut analysis = Vec::new();

        let Some(first) = original.real(0) else {
            return Ok(Formatted {
                text: original.tokens.text().trim().to_string(),
                analysis,
            });
        };

        let leading = original.tokens.hidden_to_left(first.index);
        if let Some(start) = leading.iter().position(|t| !t.is_whitespace()) {
            for token in &leading[start..] {
                out.push(&token.text);
            }
        }
        work.tokens.reposition_real(0, out.line, out.column);
        out.push(&first.text);

        for k in 1..original.real_count() {
            let Some(token) = original.real(k) else {
                break;
            };

            let force_newline = match comment_span(original.tokens.hidden_to_left(token.index)) {
                Some((text, newline_after)) => {
                    out.push(&text);
                    newline_after
                }
                None => false,
            };

            let features = self.lang.features().extract(&work, k);
            let mut predicted = self.classifier.classify(&features)?;
            if force_newline && !predicted.is_newline() {
                predicted = Label::newline(self.classifier.classify_alignment(&features)?);
            }

            match predicted.category {
                WsCategory::None => {}
                WsCategory::Space => out.push(" "),
                WsCategory::Newline => {
                    let indent = work.line_indent(k - 1) as i64 + predicted.alignment_or_zero() as i64;
                    out.push("\n");
                    out.push(&spaces(indent.max(0) as usize));
                }
            }

            if self.config.diagnostics {
                analysis.push(self.analyze(original, k, token, predicted, &features));
            }

            work.tokens.reposition_real(k, out.line, out.column);
            out.push(&token.text);
        }

        let trailing = original.tokens.hidden_to_left(original.tokens.eof().index);
        if let Some((text, _)) = comment_span(trailing) {
            out.push(&text);
        }

        let stats = self.classifier.stats();
        info!(
            "Formatted {} ({} tokens); classify hits {}/{}, kNN hits {}/{}",
            doc.file_name,
            original.real_count(),
            stats.classify_hits(),
            stats.classify_calls(),
            stats.nn_hits(),
            stats.nn_calls()
        );

        Ok(Formatted {
            text: out.buf,
            analysis,
        })
    }

    fn analyze(
        &self,
        original: &ParsedDocument,
        k: usize,
        token: &Token,
        predicted: Label,
        features: &codebuff_core::FeatureVector,
    ) -> TokenPositionAnalysis {
        let actual = actual_label(original, k);
        if actual != predicted {
            debug!(
                "{}:{} {:?}: predicted {} actual {} [{}]",
                token.line,
                token.column,
                token.text,
                predicted,
                actual,
                dump_whitespace(&original.tokens.hidden_text_before_real(k))
            );
        }

        let corpus = self.classifier.corpus();
        let neighbors = self
            .classifier
            .cached_neighbors(features, Target::Category)
            .map(|found| {
                found
                    .iter()
                    .filter_map(|n| {
                        corpus.get(n.index).map(|e| NeighborReport {
                            index: n.index,
                            distance: n.distance,
                            label: e.label,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        TokenPositionAnalysis {
            index: k,
            token: token.text.clone(),
            line: token.line,
            column: token.column,
            predicted,
            actual,
            neighbors,
        }
    }
}

/// Text from the start of a hidden run through its last comment
///
/// Returns `None` when the run holds only whitespace. The flag tells whether
/// the whitespace after the last comment contained a newline.
fn comment_span(run: &[Token]) -> Option<(String, bool)> {
    let last = run.iter().rposition(|t| !t.is_whitespace())?;
    let text = codebuff_lang::token::concat_text(&run[..=last]);
    let newline_after = run[last + 1..].iter().any(|t| t.text.contains('\n'));
    Some((text, newline_after))
}

/// Output buffer tracking the line and column of the next character
struct Emitter {
    buf: String,
    line: usize,
    column: usize,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            buf: String::new(),
            line: 1,
            column: 0,
        }
    }
}

impl Emitter {
    fn push(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.buf.push_str(s);
    }
}
