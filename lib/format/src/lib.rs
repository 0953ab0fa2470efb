//! # codebuff Format
//!
//! Training, formatting and evaluation on top of the kNN classifier.
//!
//! ```text
//! training files ──▶ Trainer ──▶ Corpus ──▶ KnnClassifier ──▶ Formatter ──▶ text
//!                                                               │
//!                                                               ▼
//!                                                     TokenPositionAnalysis ──▶ metrics
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use codebuff_format::{FormatConfig, Formatter, Trainer};
//! use codebuff_lang::{InputDocument, Language};
//! use codebuff_similarity::{ClassifierConfig, KnnClassifier};
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
//! let out = formatter.format(&doc).unwrap();
//! assert_eq!(out.text, "{\n    a = b + c;\n    d = e * f;\n}");
//! ```

pub mod formatter;
pub mod metrics;
pub mod trainer;

#[cfg(test)]
mod testdata;

pub use formatter::{FormatConfig, Formatted, Formatter, NeighborReport, TokenPositionAnalysis};
pub use metrics::{
    doc_diff, dump_whitespace, hidden_text, levenshtein_distance, two_ws_equal, whitespace_edit_distance,
    AccuracyReport, DocumentMetrics, Ratio,
};
pub use trainer::{actual_label, Trainer};
