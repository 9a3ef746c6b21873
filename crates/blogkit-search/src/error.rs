use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search requested before the embedding model was loaded")]
    ModelNotLoaded,

    #[error("query is empty")]
    EmptyQuery,

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("embedding has {got} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("search worker is no longer running")]
    WorkerGone,

    #[error("could not fetch feed: {0}")]
    Fetch(String),

    #[error(transparent)]
    Core(#[from] blogkit_core::error::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
