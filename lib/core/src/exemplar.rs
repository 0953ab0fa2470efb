use serde::{Deserialize, Serialize};
use crate::{FeatureVector, Label};

/// One labeled training vector
///
/// Exemplars are produced once by the trainer and never mutate afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exemplar {
    pub features: FeatureVector,
    pub label: Label,
}

impl Exemplar {
    #[inline]
    #[must_use]
    pub fn new(features: FeatureVector, label: Label) -> Self {
        Self { features, label }
    }

    /// Whether this exemplar can vote on alignment
    #[inline]
    pub fn has_alignment(&self) -> bool {
        self.label.alignment.is_some()
    }
}

impl From<(FeatureVector, Label)> for Exemplar {
    fn from((features, label): (FeatureVector, Label)) -> Self {
        Self::new(features, label)
    }
}
