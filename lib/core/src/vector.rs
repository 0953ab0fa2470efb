use serde::{Deserialize, Serialize};
use std::fmt;
use crate::FeatureSchema;

/// A fixed-length vector of feature codes, one per schema slot
///
/// Categorical slots hold discrete codes, column-width slots hold a column
/// count. Vectors hash and compare by value so they can key the classifier
/// caches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct FeatureVector {
    data: Vec<i32>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<i32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[i32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<i32> {
        self.data.get(i).copied()
    }

    /// Two vectors are only comparable under a schema of the same length.
    #[inline]
    pub fn conforms_to(&self, schema: &FeatureSchema) -> bool {
        self.data.len() == schema.len()
    }
}

impl From<Vec<i32>> for FeatureVector {
    fn from(data: Vec<i32>) -> Self {
        Self::new(data)
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureMetaData;
    use std::collections::HashSet;

    #[test]
    fn test_conforms_to() {
        let schema = FeatureSchema::new(vec![
            FeatureMetaData::token("a", 1.0),
            FeatureMetaData::colwidth("w"),
        ]);
        assert!(FeatureVector::new(vec![3, 10]).conforms_to(&schema));
        assert!(!FeatureVector::new(vec![3]).conforms_to(&schema));
    }

    #[test]
    fn test_hash_by_value() {
        let mut set = HashSet::new();
        set.insert(FeatureVector::new(vec![1, 2, 3]));
        assert!(set.contains(&FeatureVector::from_slice(&[1, 2, 3])));
        assert!(!set.contains(&FeatureVector::from_slice(&[1, 2, 4])));
    }

    #[test]
    fn test_display() {
        assert_eq!(FeatureVector::new(vec![1, -2, 30]).to_string(), "[1, -2, 30]");
    }
}
