use std::time::Instant;

use serde::Serialize;

use blogkit_core::traits::Embedder;
use blogkit_core::types::SearchDocument;

use crate::error::{Result, SearchError};
use crate::ranker::{rank, Ranked};

/// Top matches for one input query. `predictions` index into the corpus the
/// search ran against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub input: String,
    pub predictions: Vec<Ranked>,
}

/// A ranked document borrowed from the corpus.
#[derive(Debug, Clone, Copy)]
pub struct Prediction<'a> {
    pub score: f32,
    pub document: &'a SearchDocument,
}

impl QueryResult {
    pub fn resolve<'a>(&self, corpus: &'a [SearchDocument]) -> Vec<Prediction<'a>> {
        self.predictions
            .iter()
            .filter_map(|r| corpus.get(r.index).map(|document| Prediction { score: r.score, document }))
            .collect()
    }
}

pub struct Searcher {
    embedder: Box<dyn Embedder>,
    max_results: usize,
}

impl Searcher {
    pub fn new(embedder: Box<dyn Embedder>, max_results: usize) -> Self { Self { embedder, max_results } }

    pub fn max_results(&self) -> usize { self.max_results }

    /// How many texts have more words than the encoder's input window. Their
    /// tails are cut off before embedding, so they rank on their opening only.
    pub fn over_window(&self, texts: &[String]) -> usize {
        let window = self.embedder.max_len();
        texts.iter().filter(|t| t.split_whitespace().count() > window).count()
    }

    /// Rank `corpus` against each query; one result per query, in order.
    pub fn search(&self, queries: &[String], corpus: &[SearchDocument]) -> Result<Vec<QueryResult>> {
        if queries.is_empty() || queries.iter().any(|q| q.trim().is_empty()) {
            return Err(SearchError::EmptyQuery);
        }
        let started = Instant::now();
        let texts: Vec<String> = corpus.iter().map(|d| d.searchable_text.clone()).collect();
        let truncated = self.over_window(&texts);
        if truncated > 0 {
            tracing::warn!(truncated, max_len = self.embedder.max_len(), "documents exceed the encoder window");
        }
        let doc_vectors = self.embed(&texts)?;
        let query_vectors = self.embed(queries)?;
        tracing::debug!(docs = corpus.len(), queries = queries.len(), ms = started.elapsed().as_millis() as u64, "embedded corpus and queries");

        let results = queries
            .iter()
            .zip(&query_vectors)
            .map(|(input, q)| QueryResult {
                input: input.clone(),
                predictions: rank(q, &doc_vectors, self.max_results),
            })
            .collect();
        tracing::info!(ms = started.elapsed().as_millis() as u64, "search finished");
        Ok(results)
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() { return Ok(Vec::new()); }
        let vectors = self.embedder.embed_batch(texts).map_err(|e| SearchError::Embedding(e.to_string()))?;
        let expected = self.embedder.dim();
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(SearchError::DimensionMismatch { expected, got: bad.len() });
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogkit_embed::FakeEmbedder;

    fn corpus(n: usize) -> Vec<SearchDocument> {
        (0..n).map(|i| SearchDocument::new(format!("Post {i}"), format!("topic{i} words"), format!("https://example.dev/{i}/"))).collect()
    }

    #[test]
    fn returns_top_eight_of_twenty() {
        let searcher = Searcher::new(Box::new(FakeEmbedder::new(1024)), 8);
        let docs = corpus(20);
        let results = searcher.search(&["topic3 words".to_string()], &docs).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].predictions.len(), 8);
        let resolved = results[0].resolve(&docs);
        assert_eq!(resolved[0].document.link, "https://example.dev/3/");
        assert!(std::ptr::eq(resolved[0].document, &docs[3]), "borrows, does not copy");
    }

    #[test]
    fn small_corpus_returns_everything() {
        let searcher = Searcher::new(Box::new(FakeEmbedder::new(1024)), 8);
        let results = searcher.search(&["post".to_string()], &corpus(3)).unwrap();
        assert_eq!(results[0].predictions.len(), 3);
    }

    struct Narrow(FakeEmbedder);

    impl Embedder for Narrow {
        fn dim(&self) -> usize { self.0.dim() }
        fn max_len(&self) -> usize { 3 }
        fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { self.0.embed_batch(texts) }
    }

    #[test]
    fn counts_texts_beyond_the_encoder_window() {
        let searcher = Searcher::new(Box::new(Narrow(FakeEmbedder::new(64))), 8);
        let texts = vec!["one two three".to_string(), "one two three four".to_string(), String::new()];
        assert_eq!(searcher.over_window(&texts), 1);

        let results = searcher.search(&["topic1".to_string()], &corpus(4)).unwrap();
        assert_eq!(results[0].predictions.len(), 4, "long documents are still ranked");
        assert_eq!(Searcher::new(Box::new(FakeEmbedder::new(8)), 8).over_window(&texts), 0);
    }

    #[test]
    fn blank_query_is_rejected() {
        let searcher = Searcher::new(Box::new(FakeEmbedder::new(8)), 8);
        assert!(matches!(searcher.search(&["  ".to_string()], &corpus(2)), Err(SearchError::EmptyQuery)));
    }
}
