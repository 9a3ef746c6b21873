use std::path::Path;

use blogkit_core::error::Error;
use blogkit_core::types::{Feed, SearchDocument};

use crate::error::{Result, SearchError};

/// Load the corpus from a feed file path or an http(s) URL.
pub async fn load_corpus(source: &str) -> Result<Vec<SearchDocument>> {
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        fetch(source).await?
    } else {
        let path = Path::new(source);
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Io { path: path.display().to_string(), source: e })?
    };
    let corpus = Feed::from_json(&body)?.into_corpus();
    tracing::info!(documents = corpus.len(), source, "feed loaded");
    Ok(corpus)
}

async fn fetch(url: &str) -> Result<String> {
    let response = reqwest::get(url).await.map_err(|e| SearchError::Fetch(e.to_string()))?;
    let response = response.error_for_status().map_err(|e| SearchError::Fetch(e.to_string()))?;
    response.text().await.map_err(|e| SearchError::Fetch(e.to_string()))
}
