//! k-nearest-neighbor whitespace classifier
//!
//! Classifies a query feature vector against a read-only [`Corpus`] by
//! majority vote among its `k` closest exemplars. Results and neighbor sets
//! are memoised per classifier instance; the caches only grow for the
//! lifetime of one classifier-over-one-corpus pairing.

use crate::distance::distance;
use ahash::AHashMap;
use codebuff_core::{Corpus, Error, FeatureVector, Label, Result, WsCategory};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BinaryHeap;
use std::sync::Arc;
use tracing::debug;

/// Default number of neighbors consulted per vote
pub const DEFAULT_K: usize = 11;

/// Classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Number of nearest exemplars consulted per vote
    pub k: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { k: DEFAULT_K }
    }
}

impl ClassifierConfig {
    pub fn with_k(k: usize) -> Self {
        Self { k }
    }
}

/// What a neighbor search is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Whitespace category; every exemplar votes
    Category,
    /// Newline alignment; only exemplars carrying an alignment vote
    Alignment,
}

/// One exemplar selected for a vote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Position of the exemplar in the corpus
    pub index: usize,
    pub distance: f64,
}

/// Neighbor set, nearest first
pub type Neighbors = SmallVec<[Neighbor; 16]>;

/// Call and cache-hit counters of one classifier instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierStats {
    classify_calls: u64,
    classify_hits: u64,
    nn_calls: u64,
    nn_hits: u64,
}

impl ClassifierStats {
    pub fn classify_calls(&self) -> u64 {
        self.classify_calls
    }

    pub fn classify_hits(&self) -> u64 {
        self.classify_hits
    }

    pub fn nn_calls(&self) -> u64 {
        self.nn_calls
    }

    pub fn nn_hits(&self) -> u64 {
        self.nn_hits
    }

    /// Fraction of classify calls answered from the label cache (NaN before any call)
    pub fn classify_hit_rate(&self) -> f64 {
        self.classify_hits as f64 / self.classify_calls as f64
    }

    /// Fraction of neighbor searches answered from the NN cache (NaN before any call)
    pub fn nn_hit_rate(&self) -> f64 {
        self.nn_hits as f64 / self.nn_calls as f64
    }
}

/// kNN classifier over one corpus
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use codebuff_core::{CorpusBuilder, FeatureMetaData, FeatureSchema, FeatureVector, Label};
/// use codebuff_similarity::{ClassifierConfig, KnnClassifier};
///
/// let schema = FeatureSchema::new(vec![FeatureMetaData::token("prev", 1.0)]);
/// let mut builder = CorpusBuilder::new("java", schema);
/// builder.push(FeatureVector::new(vec![1]), Label::space()).unwrap();
/// builder.push(FeatureVector::new(vec![2]), Label::newline(4)).unwrap();
/// let corpus = Arc::new(builder.build().unwrap());
///
/// let mut knn = KnnClassifier::new(corpus, ClassifierConfig::with_k(1)).unwrap();
/// assert_eq!(knn.classify(&FeatureVector::new(vec![2])).unwrap(), Label::newline(4));
/// ```
#[derive(Debug)]
pub struct KnnClassifier {
    corpus: Arc<Corpus>,
    k: usize,
    /// Corpus positions of exemplars that carry an alignment, in corpus order
    aligned: Vec<usize>,
    label_cache: AHashMap<FeatureVector, Label>,
    alignment_cache: AHashMap<FeatureVector, i32>,
    category_nn: AHashMap<FeatureVector, Neighbors>,
    alignment_nn: AHashMap<FeatureVector, Neighbors>,
    stats: ClassifierStats,
}

impl KnnClassifier {
    /// Bind a classifier to a corpus
    ///
    /// Fails with [`Error::EmptyCorpus`] when there is nothing to vote and
    /// with [`Error::InvalidK`] unless `1 <= k <= corpus.len()`.
    pub fn new(corpus: Arc<Corpus>, config: ClassifierConfig) -> Result<Self> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        if config.k == 0 || config.k > corpus.len() {
            return Err(Error::InvalidK {
                k: config.k,
                corpus_size: corpus.len(),
            });
        }

        let aligned: Vec<usize> = corpus
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_alignment())
            .map(|(i, _)| i)
            .collect();

        debug!(
            "kNN classifier ready: k={}, {} exemplars ({} aligned)",
            config.k,
            corpus.len(),
            aligned.len()
        );

        Ok(Self {
            corpus,
            k: config.k,
            aligned,
            label_cache: AHashMap::new(),
            alignment_cache: AHashMap::new(),
            category_nn: AHashMap::new(),
            alignment_nn: AHashMap::new(),
            stats: ClassifierStats::default(),
        })
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn stats(&self) -> ClassifierStats {
        self.stats
    }

    /// Number of memoised labels
    pub fn cached_labels(&self) -> usize {
        self.label_cache.len()
    }

    /// Predict the whitespace label for `query`
    ///
    /// Newline predictions carry an alignment voted among the nearest
    /// aligned exemplars.
    pub fn classify(&mut self, query: &FeatureVector) -> Result<Label> {
        self.check_query(query)?;
        self.stats.classify_calls += 1;

        if let Some(label) = self.label_cache.get(query) {
            self.stats.classify_hits += 1;
            return Ok(*label);
        }

        let neighbors = self.nearest(query, Target::Category)?;
        let exemplars = self.corpus.exemplars();
        let category = majority_vote(neighbors.iter().map(|n| exemplars[n.index].label.category))
            .ok_or(Error::EmptyCorpus)?;

        let label = match category {
            WsCategory::None => Label::none(),
            WsCategory::Space => Label::space(),
            WsCategory::Newline => Label::newline(self.classify_alignment(query)?),
        };

        self.label_cache.insert(query.clone(), label);
        Ok(label)
    }

    /// Predict only the newline alignment for `query`
    ///
    /// Returns 0 when the corpus holds no aligned exemplar at all.
    pub fn classify_alignment(&mut self, query: &FeatureVector) -> Result<i32> {
        self.check_query(query)?;

        if let Some(alignment) = self.alignment_cache.get(query) {
            return Ok(*alignment);
        }

        let neighbors = self.nearest(query, Target::Alignment)?;
        let exemplars = self.corpus.exemplars();
        let alignment = majority_vote(neighbors.iter().filter_map(|n| exemplars[n.index].label.alignment))
            .unwrap_or(0);

        self.alignment_cache.insert(query.clone(), alignment);
        Ok(alignment)
    }

    /// The `k` exemplars closest to `query`, nearest first
    ///
    /// Equal distances rank the earlier-trained exemplar first. For
    /// [`Target::Alignment`] only aligned exemplars are candidates and fewer
    /// than `k` may come back.
    pub fn nearest(&mut self, query: &FeatureVector, target: Target) -> Result<Neighbors> {
        self.check_query(query)?;
        self.stats.nn_calls += 1;

        let cache = match target {
            Target::Category => &self.category_nn,
            Target::Alignment => &self.alignment_nn,
        };
        if let Some(neighbors) = cache.get(query) {
            self.stats.nn_hits += 1;
            return Ok(neighbors.clone());
        }

        let neighbors = match target {
            Target::Category => self.k_nearest(query, 0..self.corpus.len()),
            Target::Alignment => self.k_nearest(query, self.aligned.iter().copied()),
        };

        let cache = match target {
            Target::Category => &mut self.category_nn,
            Target::Alignment => &mut self.alignment_nn,
        };
        cache.insert(query.clone(), neighbors.clone());
        Ok(neighbors)
    }

    /// Neighbor set already memoised for `query`, without touching the counters
    ///
    /// Every query that went through [`classify`](Self::classify) has its
    /// category neighbors cached.
    pub fn cached_neighbors(&self, query: &FeatureVector, target: Target) -> Option<&Neighbors> {
        match target {
            Target::Category => self.category_nn.get(query),
            Target::Alignment => self.alignment_nn.get(query),
        }
    }

    fn k_nearest(&self, query: &FeatureVector, candidates: impl Iterator<Item = usize>) -> Neighbors {
        let schema = self.corpus.schema();
        let exemplars = self.corpus.exemplars();

        // Max-heap on (distance, index): the root is the worst kept candidate
        let mut heap: BinaryHeap<(OrderedFloat<f64>, usize)> = BinaryHeap::with_capacity(self.k + 1);
        for idx in candidates {
            let d = distance(schema, query, &exemplars[idx].features);
            heap.push((OrderedFloat(d), idx));
            if heap.len() > self.k {
                heap.pop();
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|(d, index)| Neighbor {
                index,
                distance: d.into_inner(),
            })
            .collect()
    }

    fn check_query(&self, query: &FeatureVector) -> Result<()> {
        if !query.conforms_to(self.corpus.schema()) {
            return Err(Error::DimensionMismatch {
                expected: self.corpus.schema().len(),
                actual: query.dim(),
            });
        }
        Ok(())
    }
}

/// Most frequent value; a tie goes to the value seen first
///
/// Callers feed votes nearest first, so a tie resolves to the label of the
/// nearest tied exemplar.
pub fn majority_vote<T: Copy + PartialEq>(votes: impl Iterator<Item = T>) -> Option<T> {
    let mut tally: SmallVec<[(T, usize); 4]> = SmallVec::new();
    for vote in votes {
        match tally.iter_mut().find(|(v, _)| *v == vote) {
            Some(entry) => entry.1 += 1,
            None => tally.push((vote, 1)),
        }
    }

    let mut best: Option<(T, usize)> = None;
    for &(value, count) in &tally {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
