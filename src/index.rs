use crate::document::{Document, SearchHit};
use crate::error::IndexError;
use crate::tokenizer::Tokenizer;
use crate::vectorizer::{cosine_similarity, SparseVector, TfidfVectorizer};
use serde::Serialize;
use std::collections::HashMap;

/// Query-time options
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Exact-match predicates on document fields
    pub filters: HashMap<String, String>,
    /// Accepted for compatibility; not applied to scoring
    pub boosts: HashMap<String, f64>,
    pub num_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            filters: HashMap::new(),
            boosts: HashMap::new(),
            num_results: 10,
        }
    }
}

impl SearchOptions {
    pub fn with_limit(num_results: usize) -> Self {
        Self {
            num_results,
            ..Self::default()
        }
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }
}

struct FittedModel {
    documents: Vec<Document>,
    vectorizer: TfidfVectorizer,
    vectors: Vec<SparseVector>,
}

/// TF-IDF search index over a fixed document collection.
///
/// Built with its field configuration, fitted once with [`Index::fit`], then
/// queried read-only with [`Index::search`].
pub struct Index {
    text_fields: Vec<String>,
    keyword_fields: Vec<String>,
    model: Option<FittedModel>,
}

impl Index {
    pub fn new<I, S>(text_fields: I, keyword_fields: Option<Vec<String>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text_fields: text_fields.into_iter().map(Into::into).collect(),
            keyword_fields: keyword_fields.unwrap_or_default(),
            model: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Fit the vector space over `documents`, replacing any previous state.
    ///
    /// Every document must carry all text fields; otherwise nothing is
    /// replaced and `MissingField` names the first offender.
    pub fn fit(&mut self, documents: Vec<Document>) -> Result<(), IndexError> {
        let texts = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| {
                doc.joined_text(&self.text_fields)
                    .map_err(|field| IndexError::MissingField {
                        position,
                        field: field.to_string(),
                    })
            })
            .collect::<Result<Vec<String>, IndexError>>()?;

        let mut vectorizer = TfidfVectorizer::new(Tokenizer::new());
        let vectors = vectorizer.fit_transform(texts.as_slice());

        tracing::info!(
            documents = documents.len(),
            vocabulary = vectorizer.vocabulary_size(),
            "Fitted search index"
        );

        self.model = Some(FittedModel {
            documents,
            vectorizer,
            vectors,
        });
        Ok(())
    }

    /// Rank documents against `query` by cosine similarity.
    ///
    /// Only documents with a positive score are returned, best first; equal
    /// scores keep insertion order.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>, IndexError> {
        let model = self.model.as_ref().ok_or(IndexError::NotFitted)?;

        if !options.boosts.is_empty() {
            tracing::debug!(boosts = options.boosts.len(), "Ignoring boost weights");
        }
        for field in options.filters.keys() {
            if !self.keyword_fields.contains(field) {
                tracing::debug!(field = %field, "Filtering on undeclared keyword field");
            }
        }

        if options.num_results == 0 {
            return Ok(Vec::new());
        }

        let query_vec = model.vectorizer.transform(query);
        if query_vec.is_zero() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f64)> = model
            .vectors
            .iter()
            .zip(&model.documents)
            .enumerate()
            .filter(|(_, (_, doc))| matches_filters(doc, &options.filters))
            .map(|(position, (vector, _))| (position, cosine_similarity(&query_vec, vector)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(options.num_results);

        Ok(scored
            .into_iter()
            .map(|(position, score)| SearchHit::new(model.documents[position].clone(), score))
            .collect())
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        let (total_documents, vocabulary_size) = match &self.model {
            Some(model) => (model.documents.len(), model.vectorizer.vocabulary_size()),
            None => (0, 0),
        };

        IndexStats {
            fitted: self.is_fitted(),
            total_documents,
            vocabulary_size,
            text_fields: self.text_fields.clone(),
            keyword_fields: self.keyword_fields.clone(),
        }
    }
}

fn matches_filters(doc: &Document, filters: &HashMap<String, String>) -> bool {
    filters
        .iter()
        .all(|(field, value)| doc.get(field) == Some(value.as_str()))
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub fitted: bool,
    pub total_documents: usize,
    pub vocabulary_size: usize,
    pub text_fields: Vec<String>,
    pub keyword_fields: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> Index {
        let mut index = Index::new(["content", "filename"], None);
        index
            .fit(vec![
                Document::new()
                    .with_field("content", "hello world")
                    .with_field("filename", "a.md"),
                Document::new()
                    .with_field("content", "goodbye world")
                    .with_field("filename", "b.md"),
            ])
            .unwrap();
        index
    }

    #[test]
    fn test_search_single_best_match() {
        let index = sample_index();
        let hits = index.search("hello", &SearchOptions::with_limit(1)).unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get("filename"), Some("a.md"));
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn test_unknown_term_returns_nothing() {
        let index = sample_index();
        let hits = index.search("nonexistentterm", &SearchOptions::default()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_filter_restricts_matches() {
        let index = sample_index();
        let options = SearchOptions::default().filter("filename", "b.md");
        let hits = index.search("world", &options).unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get("filename"), Some("b.md"));
    }

    #[test]
    fn test_filter_on_absent_field_excludes_documents() {
        let index = sample_index();
        let options = SearchOptions::default().filter("section", "intro");
        assert!(index.search("world", &options).unwrap().is_empty());
    }

    #[test]
    fn test_results_sorted_and_capped() {
        let mut index = Index::new(["content"], None);
        index
            .fit(vec![
                Document::new().with_field("content", "rust"),
                Document::new().with_field("content", "rust search engine tutorial"),
                Document::new().with_field("content", "rust rust search"),
                Document::new().with_field("content", "python"),
            ])
            .unwrap();

        let hits = index.search("rust search", &SearchOptions::with_limit(2)).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(hits.iter().all(|h| h.score > 0.0));

        let all = index.search("rust search", &SearchOptions::default()).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut index = Index::new(["content"], None);
        index
            .fit(vec![
                Document::new().with_field("content", "alpha").with_field("id", "1"),
                Document::new().with_field("content", "beta"),
                Document::new().with_field("content", "alpha").with_field("id", "2"),
            ])
            .unwrap();

        let hits = index.search("alpha", &SearchOptions::default()).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits[0].get("id"), Some("1"));
        assert_eq!(hits[1].get("id"), Some("2"));
    }

    #[test]
    fn test_search_is_repeatable() {
        let index = sample_index();
        let first = index.search("world", &SearchOptions::default()).unwrap();
        let second = index.search("world", &SearchOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_results_requested() {
        let index = sample_index();
        assert!(index.search("hello", &SearchOptions::with_limit(0)).unwrap().is_empty());
    }

    #[test]
    fn test_empty_collection() {
        let mut index = Index::new(["content"], None);
        index.fit(Vec::new()).unwrap();

        assert!(index.is_fitted());
        assert!(index.search("hello", &SearchOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_search_before_fit() {
        let index = Index::new(["content"], None);
        let err = index.search("hello", &SearchOptions::default()).unwrap_err();
        assert_eq!(err, IndexError::NotFitted);
    }

    #[test]
    fn test_missing_text_field_rejected() {
        let mut index = sample_index();
        let err = index
            .fit(vec![
                Document::new()
                    .with_field("content", "x")
                    .with_field("filename", "ok.md"),
                Document::new().with_field("content", "no filename"),
            ])
            .unwrap_err();

        assert_eq!(
            err,
            IndexError::MissingField {
                position: 1,
                field: "filename".to_string()
            }
        );
        // previous fit survives
        assert_eq!(index.stats().total_documents, 2);
    }

    #[test]
    fn test_boosts_do_not_change_scores() {
        let index = sample_index();
        let plain = index.search("world", &SearchOptions::default()).unwrap();

        let mut boosted = SearchOptions::default();
        boosted.boosts.insert("filename".to_string(), 10.0);
        assert_eq!(index.search("world", &boosted).unwrap(), plain);
    }

    #[test]
    fn test_returned_copy_carries_original_fields() {
        let index = sample_index();
        let hits = index.search("goodbye", &SearchOptions::default()).unwrap();

        assert_eq!(hits[0].get("content"), Some("goodbye world"));
        assert_eq!(hits[0].document.fields().count(), 2);
    }
}
