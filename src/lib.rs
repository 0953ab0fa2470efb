//! # codebuff
//!
//! A statistical code formatter. Instead of hand-written pretty-printing
//! rules, codebuff learns how a corpus of already formatted files lays out
//! whitespace and reproduces that style on new input.
//!
//! For every boundary between two real tokens it builds a small feature
//! vector (surrounding token types, enclosing rules, nesting change, line
//! width so far) and asks a k-nearest-neighbour classifier whether the
//! boundary gets nothing, a space, or a newline with some indentation.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install codebuff
//! codebuff -l java corpus/java/ src/Foo.java
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use std::sync::Arc;
//! use codebuff::prelude::*;
//!
//! let lang = Language::by_name("java").unwrap();
//! let mut trainer = Trainer::new(&lang);
//! trainer.add_source("Block.java", "{\n    x = y + z;\n    w = v * u;\n}").unwrap();
//! let corpus = Arc::new(trainer.finish().unwrap());
//!
//! let knn = KnnClassifier::new(corpus, ClassifierConfig::with_k(1)).unwrap();
//! let mut formatter = Formatter::new(knn, &lang, FormatConfig::default()).unwrap();
//!
//! let doc = InputDocument::from_source("In.java", "{a=b+c;d=e*f;}", &lang).unwrap();
//! assert_eq!(formatter.format(&doc).unwrap().text, "{\n    a = b + c;\n    d = e * f;\n}");
//! ```
//!
//! ## Crate Structure
//!
//! - [`codebuff-core`](https://docs.rs/codebuff-core) - Feature schema, vectors, labels, corpus
//! - [`codebuff-similarity`](https://docs.rs/codebuff-similarity) - Weighted distance and cached kNN classifier
//! - [`codebuff-lang`](https://docs.rs/codebuff-lang) - Token streams, parse trees, language registry
//! - [`codebuff-format`](https://docs.rs/codebuff-format) - Trainer, formatter, evaluation metrics
//! - [`codebuff-storage`](https://docs.rs/codebuff-storage) - Corpus snapshots

// Re-export core types
pub use codebuff_core::{
    Corpus, CorpusBuilder, Error, Exemplar, FeatureMetaData, FeatureSchema, FeatureType, FeatureVector, Label, Result,
    WsCategory,
};

// Re-export classifier
pub use codebuff_similarity::{ClassifierConfig, ClassifierStats, KnnClassifier, Target, DEFAULT_K};

// Re-export front ends
pub use codebuff_lang::{FeatureExtractor, FrontEnd, InputDocument, LangError, Language};

// Re-export formatting
pub use codebuff_format::{AccuracyReport, FormatConfig, Formatted, Formatter, TokenPositionAnalysis, Trainer};

// Re-export storage
pub use codebuff_storage::CorpusStore;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ClassifierConfig, Corpus, CorpusStore, Error, FormatConfig, Formatted, Formatter, InputDocument,
        KnnClassifier, Label, Language, Result, Trainer, WsCategory,
    };
}

/// Evaluation metrics
pub mod metrics {
    pub use codebuff_format::metrics::*;
}
