//! # codebuff Lang
//!
//! Language front ends for the codebuff formatter.
//!
//! The formatter never looks at characters directly. It sees a
//! [`TokenStream`] where every whitespace run and comment sits on the
//! hidden channel, a [`ParseTree`] giving each real token its enclosing
//! rule, and a [`FeatureExtractor`] that turns a token boundary into a
//! [`FeatureVector`](codebuff_core::FeatureVector).
//!
//! ## Supported languages
//!
//! | name | files | front end |
//! |------|-------|-----------|
//! | `java` | `*.java` | [`clike`] |
//! | `c` | `*.{c,h}` | [`clike`] |
//!
//! ## Example
//!
//! ```rust
//! use codebuff_lang::{InputDocument, Language};
//!
//! let lang = Language::by_name("java").unwrap();
//! let doc = InputDocument::from_source("A.java", "class A {\n\tint x;\n}\n", &lang).unwrap();
//!
//! assert_eq!(doc.real_count(), 7);
//! assert_eq!(doc.parsed.real(3).unwrap().column, 4);
//! ```

pub mod clike;
pub mod document;
pub mod error;
pub mod frontend;
pub mod registry;
pub mod text;
pub mod token;
pub mod tree;

pub use document::{discover_files, InputDocument};
pub use error::{LangError, Result};
pub use frontend::{FeatureExtractor, FrontEnd, ParsedDocument};
pub use registry::{lookup, LangDescriptor, Language, LANGUAGES};
pub use text::{expand_tabs, spaces};
pub use token::{Channel, Token, TokenStream, EOF};
pub use tree::{ParseTree, RuleKind, RuleNode};
