//! Folding of multi-block demos into a single widget.
//!
//! Every fenced block tagged with the same demo id belongs to one widget. The
//! widget is emitted where the id first appears; the remaining blocks with
//! that id render nothing. Only the first block per language counts; later
//! duplicates are dropped. Untagged blocks go through the default renderer.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::error::{DemoError, Result};
use crate::fence::{CodeBlock, DemoFragment, Language};

/// The fragments of one demo id, in document order, at most one per language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoWidget {
    pub id: String,
    pub fragments: Vec<DemoFragment>,
}

impl DemoWidget {
    pub fn to_html(&self) -> String {
        let id = html_escape::encode_double_quoted_attribute(&self.id);
        let selected = self.group().selected_language().map(Language::key).unwrap_or("html");
        let mut out = format!("<live-demo data-demo-id=\"{id}\" selected=\"{selected}\">\n");
        for fragment in &self.fragments {
            let lang = fragment.language.key();
            out.push_str(&format!(
                "<pre slot=\"{lang}\" data-language=\"{lang}\"><code class=\"language-{lang}\">{}</code></pre>\n",
                html_escape::encode_text(&fragment.raw_text)
            ));
        }
        out.push_str("</live-demo>\n");
        out
    }

    pub fn group(&self) -> DemoGroup {
        DemoGroup::from_fragments(&self.id, &self.fragments)
    }
}

/// What the renderer does with each input block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Ordinary code block, rendered untouched.
    Plain,
    /// First block of a demo id; carries every fragment of that id.
    Widget(DemoWidget),
    /// Already emitted as part of an earlier widget.
    Suppressed,
}

/// Decide the outcome of every block; the result is parallel to `blocks`.
pub fn aggregate_blocks(blocks: &[CodeBlock]) -> Vec<BlockOutcome> {
    let mut groups: HashMap<String, Vec<DemoFragment>> = HashMap::new();
    for block in blocks {
        match block.as_fragment() {
            Some(fragment) => {
                let fragments = groups.entry(fragment.id.clone()).or_default();
                if fragments.iter().any(|f| f.language == fragment.language) {
                    tracing::debug!(id = %fragment.id, language = %fragment.language, "duplicate demo fragment ignored");
                } else {
                    fragments.push(fragment);
                }
            }
            None => {
                if let Some(id) = &block.info.id {
                    tracing::warn!(id = %id, language = %block.info.language, "demo block with unsupported language rendered as plain code");
                }
            }
        }
    }

    let mut consumed: HashSet<String> = HashSet::new();
    blocks
        .iter()
        .map(|block| match block.as_fragment() {
            None => BlockOutcome::Plain,
            Some(fragment) if consumed.insert(fragment.id.clone()) => {
                let fragments = groups.remove(&fragment.id).unwrap_or_default();
                BlockOutcome::Widget(DemoWidget { id: fragment.id, fragments })
            }
            Some(_) => BlockOutcome::Suppressed,
        })
        .collect()
}

/// The aggregated, per-language view of one demo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoGroup {
    pub id: String,
    sources: HashMap<Language, String>,
    options: Vec<Language>,
    selected: Option<Language>,
}

impl DemoGroup {
    /// First fragment per language wins; later duplicates are ignored.
    pub fn from_fragments(id: &str, fragments: &[DemoFragment]) -> Self {
        let mut sources = HashMap::new();
        let mut options = Vec::new();
        for fragment in fragments.iter().filter(|f| f.id == id) {
            if sources.contains_key(&fragment.language) {
                tracing::debug!(id, language = %fragment.language, "duplicate demo fragment ignored");
                continue;
            }
            if !fragment.raw_text.trim().is_empty() {
                options.push(fragment.language);
            }
            sources.insert(fragment.language, fragment.raw_text.clone());
        }
        let selected = options.first().copied();
        Self { id: id.to_string(), sources, options, selected }
    }

    /// Source for `language`, empty when the demo has none.
    pub fn source(&self, language: Language) -> &str {
        self.sources.get(&language).map(String::as_str).unwrap_or("")
    }

    /// Languages with content, in order of first appearance.
    pub fn language_options(&self) -> &[Language] {
        &self.options
    }

    pub fn selected_language(&self) -> Option<Language> {
        self.selected
    }

    pub fn select(&mut self, language: Language) -> Result<()> {
        if !self.options.contains(&language) {
            return Err(DemoError::MissingLanguage { id: self.id.clone(), language: language.to_string() });
        }
        self.selected = Some(language);
        Ok(())
    }
}

/// Rendered HTML plus the widgets it contains.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub widgets: Vec<DemoWidget>,
}

impl RenderedPage {
    pub fn widget(&self, id: &str) -> Result<&DemoWidget> {
        self.widgets.iter().find(|w| w.id == id).ok_or_else(|| DemoError::UnknownDemo(id.to_string()))
    }
}

/// Render markdown to HTML, replacing demo blocks with `<live-demo>` widgets.
pub fn render_markdown(markdown: &str) -> RenderedPage {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let events: Vec<Event<'_>> = Parser::new_ext(markdown, options).collect();

    let mut spans = Vec::new();
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < events.len() {
        if let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = &events[i] {
            let start = i;
            let mut text = String::new();
            i += 1;
            while i < events.len() && !matches!(events[i], Event::End(TagEnd::CodeBlock)) {
                if let Event::Text(t) = &events[i] { text.push_str(t); }
                i += 1;
            }
            spans.push((start, i.min(events.len() - 1)));
            blocks.push(CodeBlock::new(info, text));
        }
        i += 1;
    }

    let outcomes = aggregate_blocks(&blocks);
    let mut rewritten: Vec<Event<'_>> = Vec::with_capacity(events.len());
    let mut widgets = Vec::new();
    let mut cursor = 0;
    for (&(start, end), outcome) in spans.iter().zip(outcomes) {
        rewritten.extend_from_slice(&events[cursor..start]);
        match outcome {
            BlockOutcome::Plain => rewritten.extend_from_slice(&events[start..=end]),
            BlockOutcome::Widget(widget) => {
                rewritten.push(Event::Html(widget.to_html().into()));
                widgets.push(widget);
            }
            BlockOutcome::Suppressed => {}
        }
        cursor = end + 1;
    }
    rewritten.extend_from_slice(&events[cursor..]);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, rewritten.into_iter());
    tracing::debug!(widgets = widgets.len(), blocks = blocks.len(), "rendered markdown");
    RenderedPage { html: out, widgets }
}
