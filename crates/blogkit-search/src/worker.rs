//! Off-thread embedding and ranking.
//!
//! The model runs on its own OS thread so inference never blocks the async
//! runtime. Callers talk to it only through messages; the query and corpus
//! are moved into the request, and nothing else is shared.

use tokio::sync::{mpsc, oneshot};

use blogkit_core::config::{EmbedSettings, SearchSettings};
use blogkit_core::traits::Embedder;
use blogkit_core::types::SearchDocument;
use blogkit_embed::get_default_embedder;

use crate::error::{Result, SearchError};
use crate::searcher::{QueryResult, Searcher};

type Loader = Box<dyn Fn() -> anyhow::Result<Box<dyn Embedder>> + Send>;

enum Request {
    Load { reply: oneshot::Sender<Result<()>> },
    Search { queries: Vec<String>, corpus: Vec<SearchDocument>, reply: oneshot::Sender<Result<Vec<QueryResult>>> },
}

/// Handle to the search worker; cheap to clone.
#[derive(Clone)]
pub struct SearchWorker {
    tx: mpsc::Sender<Request>,
}

impl SearchWorker {
    /// Start the worker thread. `loader` runs on the worker when `load()`
    /// is first called, and again on a later `load()` if it failed.
    pub fn spawn<F>(loader: F, max_results: usize) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Embedder>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let loader: Loader = Box::new(loader);
        std::thread::Builder::new()
            .name("search-worker".into())
            .spawn(move || run(rx, loader, max_results))
            .map(|_| ())
            .unwrap_or_else(|e| tracing::error!(error = %e, "failed to start search worker"));
        Self { tx }
    }

    /// Worker backed by the configured embedder.
    pub fn spawn_default(embed: EmbedSettings, search: &SearchSettings) -> Self {
        Self::spawn(move || get_default_embedder(&embed), search.max_results)
    }

    pub async fn load(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Request::Load { reply }).await.map_err(|_| SearchError::WorkerGone)?;
        rx.await.map_err(|_| SearchError::WorkerGone)?
    }

    pub async fn search(&self, queries: Vec<String>, corpus: Vec<SearchDocument>) -> Result<Vec<QueryResult>> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Request::Search { queries, corpus, reply }).await.map_err(|_| SearchError::WorkerGone)?;
        rx.await.map_err(|_| SearchError::WorkerGone)?
    }
}

fn run(mut rx: mpsc::Receiver<Request>, loader: Loader, max_results: usize) {
    let mut searcher: Option<Searcher> = None;
    while let Some(request) = rx.blocking_recv() {
        match request {
            Request::Load { reply } => {
                let outcome = match &searcher {
                    Some(_) => Ok(()),
                    None => match loader() {
                        Ok(embedder) => {
                            tracing::info!(dim = embedder.dim(), "model loaded");
                            searcher = Some(Searcher::new(embedder, max_results));
                            Ok(())
                        }
                        Err(e) => Err(SearchError::Embedding(e.to_string())),
                    },
                };
                let _ = reply.send(outcome);
            }
            Request::Search { queries, corpus, reply } => {
                let outcome = match &searcher {
                    Some(s) => s.search(&queries, &corpus),
                    None => Err(SearchError::ModelNotLoaded),
                };
                // The caller may have gone away; nothing to do then.
                let _ = reply.send(outcome);
            }
        }
    }
    tracing::debug!("search worker stopped");
}
