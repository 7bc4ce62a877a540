use crate::tokenizer::Tokenizer;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Sparse vector of (term id, weight) pairs sorted by term id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_unsorted(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(id, _)| *id);
        Self { entries }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            if a < b {
                i += 1;
            } else if a > b {
                j += 1;
            } else {
                sum += wa * wb;
                i += 1;
                j += 1;
            }
        }
        sum
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }
}

/// Cosine of the angle between two vectors, 0 when either is zero
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        0.0
    } else {
        a.dot(b) / denom
    }
}

/// TF-IDF vectorizer with a vocabulary shared across the fitted collection.
///
/// Weights are raw term counts scaled by the smoothed inverse document
/// frequency `ln((1 + n) / (1 + df)) + 1`, then L2-normalized.
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Learn vocabulary and idf over `texts`, returning one vector per text
    pub fn fit_transform<S: AsRef<str>>(&mut self, texts: &[S]) -> Vec<SparseVector> {
        let frequencies: Vec<HashMap<String, usize>> = texts
            .iter()
            .map(|t| self.tokenizer.analyze_with_frequencies(t.as_ref()))
            .collect();

        let terms: BTreeSet<&String> = frequencies.iter().flat_map(|f| f.keys()).collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id))
            .collect();

        let mut doc_freq = vec![0usize; self.vocabulary.len()];
        for freqs in &frequencies {
            let seen: HashSet<usize> = freqs.keys().map(|t| self.vocabulary[t]).collect();
            for id in seen {
                doc_freq[id] += 1;
            }
        }

        let n = texts.len() as f64;
        self.idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        frequencies.iter().map(|f| self.weigh(f)).collect()
    }

    /// Project text into the fitted space; unknown terms are dropped
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&self.tokenizer.analyze_with_frequencies(text))
    }

    fn weigh(&self, frequencies: &HashMap<String, usize>) -> SparseVector {
        let entries = frequencies
            .iter()
            .filter_map(|(term, &count)| {
                self.vocabulary
                    .get(term)
                    .map(|&id| (id, count as f64 * self.idf[id]))
            })
            .collect();

        let mut vector = SparseVector::from_unsorted(entries);
        vector.normalize();
        vector
    }
}
