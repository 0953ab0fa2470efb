//! # codebuff Similarity
//!
//! Distance metric and kNN classifier for the codebuff formatter.
//!
//! ## Features
//!
//! - **Weighted distance**: per-slot mismatch costs for categorical features,
//!   a saturating sigmoid for column widths
//! - **kNN classification**: majority vote among the `k` nearest exemplars,
//!   ties broken by proximity and then by training order
//! - **Caching**: label and neighbor-set memoisation with call/hit counters
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Query     │────>│  Distance   │<────│   Corpus    │
//! │  (vector)   │     │ (schema)    │     │ (exemplars) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │  k nearest  │──── NN cache
//!                     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │    Vote     │──── label cache
//!                     └─────────────┘
//! ```

pub mod distance;
pub mod knn;

pub use distance::{categorical_distance, distance, sigmoid};
pub use knn::{
    majority_vote,
    ClassifierConfig,
    ClassifierStats,
    KnnClassifier,
    Neighbor,
    Neighbors,
    Target,
    DEFAULT_K,
};
