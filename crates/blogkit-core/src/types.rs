//! Domain types shared by the demo and search crates.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One entry of the search corpus.
///
/// - `searchable_text`: the text that gets embedded (`"{title} {summary}"`)
/// - `title`/`description`: shown on the result card, possibly entity-encoded
/// - `link`: absolute URL of the post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub searchable_text: String,
    pub title: String,
    pub description: String,
    pub link: String,
}

impl SearchDocument {
    pub fn new(title: impl Into<String>, description: impl Into<String>, link: impl Into<String>) -> Self {
        let title = title.into();
        let description = description.into();
        Self { searchable_text: format!("{title} {description}"), title, description, link: link.into() }
    }
}

/// The subset of a JSON Feed item the search page consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feed {
    pub items: Vec<FeedItem>,
}

impl Feed {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::Feed(e.to_string()))
    }

    /// Build the corpus in feed order.
    pub fn into_corpus(self) -> Vec<SearchDocument> {
        self.items.into_iter().map(|item| SearchDocument::new(item.title, item.summary, item.url)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_items_become_documents_in_order() {
        let body = r#"{"version":"https://jsonfeed.org/version/1","items":[
            {"id":"1","title":"Lit","summary":"Web components","url":"https://example.dev/lit/"},
            {"id":"2","title":"Rollup","url":"https://example.dev/rollup/"}
        ]}"#;
        let corpus = Feed::from_json(body).expect("feed").into_corpus();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[0].searchable_text, "Lit Web components");
        assert_eq!(corpus[0].link, "https://example.dev/lit/");
        assert_eq!(corpus[1].description, "");
    }

    #[test]
    fn feed_without_items_is_rejected() {
        assert!(matches!(Feed::from_json("{}"), Err(Error::Feed(_))));
    }
}
