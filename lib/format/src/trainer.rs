//! Corpus training
//!
//! Every boundary between two consecutive real tokens of a training document
//! becomes one exemplar: the context features before the second token paired
//! with the whitespace actually found there.

use std::path::Path;

use codebuff_core::{Corpus, CorpusBuilder, Label, Result};
use codebuff_lang::{discover_files, InputDocument, Language, ParsedDocument};
use tracing::{debug, info, warn};

/// Whitespace observed between real tokens `k - 1` and `k`
///
/// Comments in between are folded in: any newline in the hidden run makes
/// the boundary a newline. Newline alignment is the token's column relative
/// to the indentation of the previous token's line.
pub fn actual_label(doc: &ParsedDocument, k: usize) -> Label {
    let hidden = doc.tokens.hidden_text_before_real(k);
    if hidden.contains('\n') {
        let column = doc.real(k).map_or(0, |t| t.column) as i32;
        let indent = k.checked_sub(1).map_or(0, |j| doc.line_indent(j)) as i32;
        Label::newline(column - indent)
    } else if hidden.is_empty() {
        Label::none()
    } else {
        Label::space()
    }
}

/// Accumulates exemplars from training documents of one language
pub struct Trainer<'l> {
    lang: &'l Language,
    builder: CorpusBuilder,
    documents: usize,
    skipped: usize,
}

impl<'l> Trainer<'l> {
    pub fn new(lang: &'l Language) -> Self {
        Self {
            lang,
            builder: CorpusBuilder::new(lang.name(), lang.schema().clone()),
            documents: 0,
            skipped: 0,
        }
    }

    /// Train on every matching file under `dir`
    ///
    /// Files that cannot be read or parsed are logged and skipped.
    pub fn train_dir(dir: &Path, lang: &Language) -> Result<Corpus> {
        let files = discover_files(dir, lang.file_glob())?;
        info!("Training {} corpus from {} files in {:?}", lang.name(), files.len(), dir);

        let mut trainer = Trainer::new(lang);
        trainer.add_files(&files);
        trainer.finish()
    }

    /// Add one parsed document; returns the number of exemplars it produced
    pub fn add_document(&mut self, doc: &InputDocument) -> Result<usize> {
        let parsed = &doc.parsed;
        let features = self.lang.features();

        // A document joins the corpus whole or not at all
        let mut local = CorpusBuilder::new(self.lang.name(), self.builder.schema().clone());
        for k in 1..parsed.real_count() {
            local.push(features.extract(parsed, k), actual_label(parsed, k))?;
        }
        let added = local.len();
        self.builder.extend(local)?;

        self.documents += 1;
        debug!("{}: {} exemplars", doc.file_name, added);
        Ok(added)
    }

    pub fn add_source(&mut self, file_name: &str, text: &str) -> Result<usize> {
        let doc = InputDocument::from_source(file_name, text, self.lang)?;
        self.add_document(&doc)
    }

    /// Add each file in order, skipping the ones that fail to load or parse
    pub fn add_files<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) -> usize {
        let mut trained = 0;
        for path in paths {
            let path = path.as_ref();
            let result = InputDocument::load(path, self.lang)
                .map_err(codebuff_core::Error::from)
                .and_then(|doc| self.add_document(&doc));
            match result {
                Ok(_) => trained += 1,
                Err(e) => {
                    warn!("Skipping {:?}: {}", path, e);
                    self.skipped += 1;
                }
            }
        }
        trained
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn exemplars(&self) -> usize {
        self.builder.len()
    }

    pub fn finish(self) -> Result<Corpus> {
        let corpus = self.builder.build()?;
        let [none, space, newline] = corpus.category_counts();
        info!(
            "Corpus ready: {} exemplars from {} documents ({} skipped); none={} space={} newline={}",
            corpus.len(),
            self.documents,
            self.skipped,
            none,
            space,
            newline
        );
        Ok(corpus)
    }
}
