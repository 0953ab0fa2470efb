//! Feature schema definitions
//!
//! A schema describes every slot of a feature vector: what kind of value it
//! holds and how much a mismatch on that slot costs. One schema is fixed per
//! language and shared by every vector produced for it.

use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Default center of the column-width sigmoid.
pub const DEFAULT_COLWIDTH_CENTER: f64 = 43.0;

/// Feature type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    /// Token type code
    Token,
    /// Parse-tree rule code
    Rule,
    /// Small discrete integer
    Int,
    /// Boolean flag stored as 0/1
    Bool,
    /// Column count, compared through a sigmoid
    ColWidth,
}

impl FeatureType {
    /// Categorical slots compare by equality only.
    #[inline]
    pub fn is_categorical(self) -> bool {
        match self {
            FeatureType::Token | FeatureType::Rule | FeatureType::Int | FeatureType::Bool => true,
            FeatureType::ColWidth => false,
        }
    }
}

/// Configuration for a single slot of the feature vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureMetaData {
    /// Diagnostic name of the slot
    pub name: String,

    #[serde(rename = "type")]
    pub feature_type: FeatureType,

    /// Cost added to the distance when two vectors disagree on a categorical slot
    #[serde(default = "default_cost")]
    pub mismatch_cost: f64,
}

fn default_cost() -> f64 {
    1.0
}

impl FeatureMetaData {
    pub fn new(name: impl Into<String>, feature_type: FeatureType, mismatch_cost: f64) -> Self {
        Self {
            name: name.into(),
            feature_type,
            mismatch_cost,
        }
    }

    pub fn token(name: impl Into<String>, mismatch_cost: f64) -> Self {
        Self::new(name, FeatureType::Token, mismatch_cost)
    }

    pub fn rule(name: impl Into<String>, mismatch_cost: f64) -> Self {
        Self::new(name, FeatureType::Rule, mismatch_cost)
    }

    pub fn int(name: impl Into<String>, mismatch_cost: f64) -> Self {
        Self::new(name, FeatureType::Int, mismatch_cost)
    }

    pub fn boolean(name: impl Into<String>, mismatch_cost: f64) -> Self {
        Self::new(name, FeatureType::Bool, mismatch_cost)
    }

    /// Column-width slots ignore `mismatch_cost`; their contribution is bounded by 1.
    pub fn colwidth(name: impl Into<String>) -> Self {
        Self::new(name, FeatureType::ColWidth, 1.0)
    }
}

/// Ordered slot descriptions plus the tunable column-width center
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSchema {
    pub slots: Vec<FeatureMetaData>,

    #[serde(default = "default_center")]
    pub colwidth_center: f64,
}

fn default_center() -> f64 {
    DEFAULT_COLWIDTH_CENTER
}

impl FeatureSchema {
    pub fn new(slots: Vec<FeatureMetaData>) -> Self {
        Self {
            slots,
            colwidth_center: DEFAULT_COLWIDTH_CENTER,
        }
    }

    #[must_use]
    pub fn with_colwidth_center(mut self, center: f64) -> Self {
        self.colwidth_center = center;
        self
    }

    /// Validate the schema
    /// - At least one slot
    /// - Mismatch costs are finite and non-negative
    /// - The sigmoid center is finite
    pub fn validate(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(Error::InvalidConfig("feature schema cannot be empty".to_string()));
        }

        for meta in &self.slots {
            if !meta.mismatch_cost.is_finite() || meta.mismatch_cost < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "feature '{}' has invalid mismatch cost {}",
                    meta.name, meta.mismatch_cost
                )));
            }
        }

        if !self.colwidth_center.is_finite() {
            return Err(Error::InvalidConfig("column width center must be finite".to_string()));
        }

        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&FeatureMetaData> {
        self.slots.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureMetaData> {
        self.slots.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().map(|m| m.name.as_str()).collect()
    }
}
