use crate::{Error, Exemplar, FeatureSchema, FeatureVector, Label, Result, WsCategory};
use serde::{Deserialize, Serialize};

/// Ordered, read-only collection of exemplars for one language
///
/// Built once by the trainer. Insertion order is preserved and used as the
/// tie-break when two exemplars sit at the same distance from a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Corpus {
    language: String,
    schema: FeatureSchema,
    exemplars: Vec<Exemplar>,
}

impl Corpus {
    /// Build a corpus, checking the schema and every exemplar against it
    pub fn new(language: impl Into<String>, schema: FeatureSchema, exemplars: Vec<Exemplar>) -> Result<Self> {
        schema.validate()?;
        for exemplar in &exemplars {
            check_dim(&schema, &exemplar.features)?;
        }
        Ok(Self {
            language: language.into(),
            schema,
            exemplars,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&Exemplar> {
        self.exemplars.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exemplar> {
        self.exemplars.iter()
    }

    pub fn exemplars(&self) -> &[Exemplar] {
        &self.exemplars
    }

    /// Number of exemplars per whitespace category, in `WsCategory::ALL` order
    pub fn category_counts(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for exemplar in &self.exemplars {
            counts[exemplar.label.category as usize] += 1;
        }
        counts
    }

    /// Number of exemplars that carry an alignment value
    pub fn aligned_count(&self) -> usize {
        self.exemplars.iter().filter(|e| e.has_alignment()).count()
    }
}

/// Accumulates exemplars in training order
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    language: String,
    schema: FeatureSchema,
    exemplars: Vec<Exemplar>,
}

impl CorpusBuilder {
    pub fn new(language: impl Into<String>, schema: FeatureSchema) -> Self {
        Self {
            language: language.into(),
            schema,
            exemplars: Vec::new(),
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    /// Append one exemplar
    pub fn push(&mut self, features: FeatureVector, label: Label) -> Result<()> {
        check_dim(&self.schema, &features)?;
        if label.category == WsCategory::Newline && label.alignment.is_none() {
            return Err(Error::InvalidConfig("newline label without alignment".to_string()));
        }
        self.exemplars.push(Exemplar::new(features, label));
        Ok(())
    }

    /// Append every exemplar of another builder, keeping their order
    pub fn extend(&mut self, other: CorpusBuilder) -> Result<()> {
        if other.schema != self.schema {
            return Err(Error::InvalidConfig("cannot merge corpora with different schemas".to_string()));
        }
        self.exemplars.extend(other.exemplars);
        Ok(())
    }

    pub fn build(self) -> Result<Corpus> {
        Corpus::new(self.language, self.schema, self.exemplars)
    }
}

fn check_dim(schema: &FeatureSchema, features: &FeatureVector) -> Result<()> {
    if !features.conforms_to(schema) {
        return Err(Error::DimensionMismatch {
            expected: schema.len(),
            actual: features.dim(),
        });
    }
    Ok(())
}
