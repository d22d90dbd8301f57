//! TF-IDF vectorization and cosine scoring over a per-request corpus.
//!
//! ```text
//! tf(t, d)  = count of t in d
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), each row L2-normalized
//! ```
//!
//! Rows are sparse and keyed by vocabulary index in a `BTreeMap`, so every
//! summation runs in the same order and repeated calls give bit-identical scores.

use std::collections::{BTreeMap, HashMap};

use super::text::{is_stop_word, tokenize};

type SparseRow = BTreeMap<usize, f64>;

/// Documents of one request, document 0 being the clicked article
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<String>,
}

impl Corpus {
    pub fn new(query: String, candidates: impl IntoIterator<Item = String>) -> Self {
        let mut documents = vec![query];
        documents.extend(candidates);
        Self { documents }
    }

    /// Number of candidate documents (excludes the query)
    pub fn candidate_count(&self) -> usize {
        self.documents.len() - 1
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }
}

/// Fitted TF-IDF weights for a single corpus
#[derive(Debug)]
pub struct TfidfModel {
    vocabulary: HashMap<String, usize>,
    rows: Vec<SparseRow>,
}

impl TfidfModel {
    /// Builds the vocabulary and weighted rows from the corpus itself.
    ///
    /// With `exclude_stop_words` set, stopwords never enter the vocabulary.
    pub fn fit(corpus: &Corpus, exclude_stop_words: bool) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let counts: Vec<SparseRow> = corpus
            .documents()
            .iter()
            .map(|doc| {
                let mut row = SparseRow::new();
                for token in tokenize(doc) {
                    if exclude_stop_words && is_stop_word(&token) {
                        continue;
                    }
                    let next_index = vocabulary.len();
                    let index = *vocabulary.entry(token).or_insert(next_index);
                    *row.entry(index).or_insert(0.0) += 1.0;
                }
                row
            })
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for row in &counts {
            for &index in row.keys() {
                document_frequency[index] += 1;
            }
        }

        let n = counts.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|mut row| {
                for (index, weight) in row.iter_mut() {
                    *weight *= idf[*index];
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        Self { vocabulary, rows }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity of document 0 against every other document, in corpus order
    pub fn query_similarities(&self) -> Vec<f64> {
        let Some((query, candidates)) = self.rows.split_first() else {
            return Vec::new();
        };
        candidates
            .iter()
            .map(|candidate| cosine(query, candidate))
            .collect()
    }
}

/// Scores every candidate in the corpus against the query document.
///
/// A corpus with no usable terms scores every candidate 0.
pub fn score_corpus(corpus: &Corpus, exclude_stop_words: bool) -> Vec<f64> {
    let model = TfidfModel::fit(corpus, exclude_stop_words);
    if model.vocabulary_size() == 0 {
        tracing::debug!(
            documents = corpus.documents().len(),
            "Corpus has no terms, all similarities are zero"
        );
        return vec![0.0; corpus.candidate_count()];
    }
    model.query_similarities()
}

fn l2_normalize(row: &mut SparseRow) {
    let norm = row.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in row.values_mut() {
            *weight /= norm;
        }
    }
}

/// Cosine of two L2-normalized rows; zero when either row is empty.
fn cosine(a: &SparseRow, b: &SparseRow) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(index, weight)| large.get(index).map(|other| weight * other))
        .sum();
    dot.clamp(0.0, 1.0)
}
