//! # codebuff Core
//!
//! Core data model for the codebuff statistical formatter.
//!
//! This crate provides the types every other codebuff crate speaks:
//!
//! - [`FeatureSchema`] - Per-slot feature types and mismatch costs
//! - [`FeatureVector`] - Fixed-length context features for one token boundary
//! - [`Label`] - Whitespace-injection category plus alignment
//! - [`Exemplar`] - A labeled training vector
//! - [`Corpus`] - The ordered, read-only exemplar set for one language
//!
//! ## Example
//!
//! ```rust
//! use codebuff_core::{CorpusBuilder, FeatureMetaData, FeatureSchema, FeatureVector, Label};
//!
//! let schema = FeatureSchema::new(vec![
//!     FeatureMetaData::token("prev", 1.0),
//!     FeatureMetaData::token("cur", 1.0),
//!     FeatureMetaData::colwidth("width"),
//! ]);
//!
//! let mut builder = CorpusBuilder::new("java", schema);
//! builder.push(FeatureVector::new(vec![7, 3, 12]), Label::space()).unwrap();
//! builder.push(FeatureVector::new(vec![3, 9, 20]), Label::newline(4)).unwrap();
//!
//! let corpus = builder.build().unwrap();
//! assert_eq!(corpus.len(), 2);
//! ```

pub mod error;
pub mod schema;
pub mod vector;
pub mod label;
pub mod exemplar;
pub mod corpus;

pub use error::{Error, Result};
pub use schema::{FeatureMetaData, FeatureSchema, FeatureType, DEFAULT_COLWIDTH_CENTER};
pub use vector::FeatureVector;
pub use label::{Label, WsCategory};
pub use exemplar::Exemplar;
pub use corpus::{Corpus, CorpusBuilder};
