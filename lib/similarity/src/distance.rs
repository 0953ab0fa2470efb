//! Distance functions over feature vectors
//!
//! Provides the weighted mismatch distance used for classification and an
//! unweighted categorical count used for diagnostics. Smaller is closer;
//! 0.0 means identical under the schema's comparison rules.

use codebuff_core::{FeatureMetaData, FeatureSchema, FeatureType, FeatureVector};

/// Steepness of the column-width sigmoid
const SIGMOID_SLOPE: f64 = 0.9;

/// Squash a column count around `center`
///
/// Saturates extreme widths so outliers cannot dominate the total distance
/// while widths near the center stay sensitive.
#[inline]
pub fn sigmoid(x: i32, center: f64) -> f64 {
    1.0 / (1.0 + (-SIGMOID_SLOPE * (f64::from(x) - center)).exp())
}

/// Contribution of a single slot to the total distance
#[inline]
fn slot_distance(meta: &FeatureMetaData, a: i32, b: i32, center: f64) -> f64 {
    match meta.feature_type {
        FeatureType::Token | FeatureType::Rule | FeatureType::Int | FeatureType::Bool => {
            if a != b {
                meta.mismatch_cost
            } else {
                0.0
            }
        }
        FeatureType::ColWidth => (sigmoid(a, center) - sigmoid(b, center)).abs(),
    }
}

/// Weighted distance between two feature vectors
///
/// # Arguments
/// * `schema` - Slot types and mismatch costs
/// * `a` - First vector
/// * `b` - Second vector
///
/// # Returns
/// Non-negative distance, or `f64::INFINITY` when the vectors are not
/// comparable under `schema`
pub fn distance(schema: &FeatureSchema, a: &FeatureVector, b: &FeatureVector) -> f64 {
    if !a.conforms_to(schema) || !b.conforms_to(schema) {
        return f64::INFINITY;
    }

    schema
        .iter()
        .zip(a.as_slice().iter().zip(b.as_slice().iter()))
        .map(|(meta, (&x, &y))| slot_distance(meta, x, y, schema.colwidth_center))
        .sum()
}

/// Number of categorical slots on which two vectors disagree
///
/// No weighting and no column-width term; used for coarse diagnostics.
pub fn categorical_distance(schema: &FeatureSchema, a: &FeatureVector, b: &FeatureVector) -> usize {
    schema
        .iter()
        .zip(a.as_slice().iter().zip(b.as_slice().iter()))
        .filter(|(meta, (x, y))| meta.feature_type.is_categorical() && x != y)
        .count()
}
