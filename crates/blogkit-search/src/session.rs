//! The search page's view of the worker.
//!
//! Every submitted query takes a generation number. A response is shown only
//! if no newer query was submitted while it was in flight; otherwise it is
//! dropped. Failures are logged and leave the last good results in place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use blogkit_core::types::SearchDocument;

use crate::error::SearchError;
use crate::searcher::QueryResult;
use crate::worker::SearchWorker;

#[derive(Debug)]
pub enum Outcome {
    Applied(QueryResult),
    Stale { generation: u64, newest: u64 },
    Failed(SearchError),
}

pub struct SearchSession {
    worker: SearchWorker,
    corpus: Arc<Vec<SearchDocument>>,
    submitted: AtomicU64,
    shown: Mutex<Option<(u64, QueryResult)>>,
}

impl SearchSession {
    pub fn new(worker: SearchWorker, corpus: Vec<SearchDocument>) -> Self {
        Self { worker, corpus: Arc::new(corpus), submitted: AtomicU64::new(0), shown: Mutex::new(None) }
    }

    pub fn corpus(&self) -> &[SearchDocument] { &self.corpus }

    /// Generation of the most recently submitted query; 0 before any.
    pub fn latest_generation(&self) -> u64 { self.submitted.load(Ordering::SeqCst) }

    pub async fn submit(&self, query: &str) -> Outcome {
        let generation = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        let response = self.worker.search(vec![query.to_string()], self.corpus.as_ref().clone()).await;

        let newest = self.submitted.load(Ordering::SeqCst);
        if generation != newest {
            tracing::debug!(generation, newest, "discarding stale search response");
            return Outcome::Stale { generation, newest };
        }
        match response.map(|mut results| results.pop()) {
            Ok(Some(result)) => {
                *self.shown.lock().await = Some((generation, result.clone()));
                Outcome::Applied(result)
            }
            Ok(None) => Outcome::Failed(SearchError::EmptyQuery),
            Err(e) => {
                tracing::error!(error = %e, query, "search failed; keeping previous results");
                Outcome::Failed(e)
            }
        }
    }

    /// Last results that were applied.
    pub async fn last_good(&self) -> Option<QueryResult> {
        self.shown.lock().await.as_ref().map(|(_, r)| r.clone())
    }
}
