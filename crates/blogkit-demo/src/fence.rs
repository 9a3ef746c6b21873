//! Fenced code block info strings and demo fragments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A source language a live demo can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    Js,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Html, Language::Css, Language::Js];

    /// Parse an already normalized language key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "html" => Some(Self::Html),
            "css" => Some(Self::Css),
            "js" => Some(Self::Js),
            _ => None,
        }
    }

    /// Slot name and `data-language` value.
    pub fn key(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Js => "js",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fold a raw language token to its canonical key.
pub fn normalize_language(token: &str) -> String {
    let lower = token.to_lowercase();
    match lower.as_str() {
        "javascript" => "js".to_string(),
        _ => lower,
    }
}

/// The `lang id` pair carried by a fence's info string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceInfo {
    pub language: String,
    pub id: Option<String>,
}

impl FenceInfo {
    /// `"JavaScript demo1"` parses to `("js", Some("demo1"))`; tokens past the
    /// second are ignored.
    pub fn parse(info: &str) -> Self {
        let mut tokens = info.split_whitespace();
        let language = tokens.next().map(normalize_language).unwrap_or_default();
        let id = tokens.next().map(str::to_string);
        Self { language, id }
    }

    pub fn demo_language(&self) -> Option<Language> {
        Language::from_key(&self.language)
    }
}

/// One fenced block in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub info: FenceInfo,
    pub text: String,
}

impl CodeBlock {
    pub fn new(info: &str, text: impl Into<String>) -> Self {
        Self { info: FenceInfo::parse(info), text: text.into() }
    }

    /// The fragment this block contributes to a demo, if it is one.
    pub fn as_fragment(&self) -> Option<DemoFragment> {
        let id = self.info.id.clone()?;
        let language = self.info.demo_language()?;
        Some(DemoFragment { id, language, raw_text: self.text.clone() })
    }
}

/// One language-tagged source block belonging to a demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoFragment {
    pub id: String,
    pub language: Language,
    pub raw_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn javascript_folds_to_js() {
        let info = FenceInfo::parse("JavaScript demo1");
        assert_eq!(info.language, "js");
        assert_eq!(info.id.as_deref(), Some("demo1"));
        assert_eq!(info.demo_language(), Some(Language::Js));
    }

    #[test]
    fn single_token_is_the_language() {
        let info = FenceInfo::parse("rust");
        assert_eq!(info, FenceInfo { language: "rust".into(), id: None });
    }

    #[test]
    fn empty_info_has_no_language() {
        let info = FenceInfo::parse("   ");
        assert_eq!(info.language, "");
        assert!(info.id.is_none());
    }

    #[test]
    fn unsupported_language_is_not_a_fragment() {
        assert!(CodeBlock::new("rust demo1", "fn main() {}").as_fragment().is_none());
        assert!(CodeBlock::new("css", "a {}").as_fragment().is_none());
        let frag = CodeBlock::new("CSS demo1", "a {}").as_fragment().expect("fragment");
        assert_eq!(frag.language, Language::Css);
    }
}
