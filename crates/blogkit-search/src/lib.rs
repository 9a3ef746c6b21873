//! blogkit-search
//!
//! Natural-language search over the blog feed: documents and queries are
//! embedded, ranked by cosine similarity, and the top matches rendered as
//! result cards. Embedding runs on a dedicated worker thread.
pub mod error;
pub mod feed;
pub mod query;
pub mod ranker;
pub mod render;
pub mod searcher;
pub mod session;
pub mod worker;

pub use error::{Result, SearchError};
pub use ranker::{cosine_similarity, rank, Ranked};
pub use searcher::{Prediction, QueryResult, Searcher};
pub use session::{Outcome, SearchSession};
pub use worker::SearchWorker;
