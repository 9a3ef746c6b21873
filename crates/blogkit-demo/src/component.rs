//! The `<live-demo>` state machine.
//!
//! Source view (`Collapsed`) flips to execution view (`Expanded`) on toggle.
//! Expanding renders a freshly assembled snippet into the execution host;
//! collapsing hands back a [`ClearTicket`] that empties the host once the
//! flip transition has finished. Each expand bumps a generation counter so a
//! ticket from an earlier collapse cannot clear newer content.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use blogkit_core::config::DemoSettings;

use crate::aggregate::DemoGroup;
use crate::error::{DemoError, Result};
use crate::fence::Language;
use crate::snippet::ExecutableSnippet;

/// Why attaching the execution shadow root failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// Re-toggling reuses the same host; not an error for the demo.
    AlreadyAttached,
    Unsupported(String),
}

/// Isolated rendering context the demo executes in.
pub trait ExecutionHost {
    fn attach_shadow(&mut self) -> std::result::Result<(), AttachError>;
    fn render(&mut self, content: &str);
    fn clear(&mut self);
}

/// In-memory host; records what a browser shadow root would receive.
#[derive(Debug, Default, Clone)]
pub struct MemoryHost {
    attached: bool,
    content: Option<String>,
    renders: usize,
}

impl MemoryHost {
    pub fn content(&self) -> Option<&str> { self.content.as_deref() }
    pub fn renders(&self) -> usize { self.renders }
}

impl ExecutionHost for MemoryHost {
    fn attach_shadow(&mut self) -> std::result::Result<(), AttachError> {
        if self.attached { return Err(AttachError::AlreadyAttached); }
        self.attached = true;
        Ok(())
    }
    fn render(&mut self, content: &str) {
        self.content = Some(content.to_string());
        self.renders += 1;
    }
    fn clear(&mut self) { self.content = None; }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View { Collapsed, Expanded }

/// Presentational only; never affects execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display { Normal, Fullscreen }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearTicket { generation: u64 }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Expanded,
    Collapsed(ClearTicket),
}

pub struct LiveDemo<H: ExecutionHost> {
    group: DemoGroup,
    host: H,
    view: View,
    display: Display,
    generation: u64,
    show_text: String,
    hide_text: String,
    clear_delay: Duration,
}

impl<H: ExecutionHost> LiveDemo<H> {
    pub fn new(group: DemoGroup, host: H, settings: &DemoSettings) -> Self {
        Self {
            group,
            host,
            view: View::Collapsed,
            display: Display::Normal,
            generation: 0,
            show_text: settings.show_text.clone(),
            hide_text: settings.hide_text.clone(),
            clear_delay: Duration::from_millis(settings.clear_delay_ms),
        }
    }

    pub fn id(&self) -> &str { &self.group.id }
    pub fn view(&self) -> View { self.view }
    pub fn display(&self) -> Display { self.display }
    pub fn host(&self) -> &H { &self.host }
    pub fn clear_delay(&self) -> Duration { self.clear_delay }
    pub fn language_options(&self) -> &[Language] { self.group.language_options() }
    pub fn selected_language(&self) -> Option<Language> { self.group.selected_language() }

    pub fn button_label(&self) -> &str {
        match self.view { View::Collapsed => &self.show_text, View::Expanded => &self.hide_text }
    }

    /// Whether the source slot for `language` is hidden (`aria-hidden`).
    pub fn is_slot_hidden(&self, language: Language) -> bool {
        self.view == View::Expanded || self.group.selected_language() != Some(language)
    }

    /// Change the visible source tab; expanded content is unaffected.
    pub fn select(&mut self, language: Language) -> Result<()> {
        self.group.select(language)
    }

    pub fn toggle(&mut self) -> Result<Transition> {
        match self.view {
            View::Collapsed => {
                let content = ExecutableSnippet::from_group(&self.group).render_content(&self.group.id)?;
                match self.host.attach_shadow() {
                    Ok(()) | Err(AttachError::AlreadyAttached) => {}
                    Err(AttachError::Unsupported(reason)) => return Err(DemoError::Host(reason)),
                }
                self.generation += 1;
                self.host.render(&content);
                self.view = View::Expanded;
                tracing::debug!(id = %self.group.id, generation = self.generation, "demo expanded");
                Ok(Transition::Expanded)
            }
            View::Expanded => {
                self.view = View::Collapsed;
                tracing::debug!(id = %self.group.id, generation = self.generation, "demo collapsed");
                Ok(Transition::Collapsed(ClearTicket { generation: self.generation }))
            }
        }
    }

    /// Apply a deferred clear. Returns false when a later expand made the
    /// ticket stale.
    pub fn complete_clear(&mut self, ticket: ClearTicket) -> bool {
        if ticket.generation != self.generation || self.view != View::Collapsed {
            tracing::debug!(id = %self.group.id, ticket = ticket.generation, current = self.generation, "stale clear skipped");
            return false;
        }
        self.host.clear();
        true
    }

    /// Attributes reflected on the `<live-demo>` element: `toggled` while
    /// expanded, `expanded` while fullscreen, the `selected` tab, and the
    /// button texts. Boolean attributes are present or absent.
    pub fn attributes(&self) -> Vec<(&'static str, Option<String>)> {
        let mut attrs = vec![("data-demo-id", Some(self.group.id.clone()))];
        if self.view == View::Expanded { attrs.push(("toggled", None)); }
        if self.display == Display::Fullscreen { attrs.push(("expanded", None)); }
        if let Some(language) = self.group.selected_language() {
            attrs.push(("selected", Some(language.key().to_string())));
        }
        attrs.push(("show-text", Some(self.show_text.clone())));
        attrs.push(("hide-text", Some(self.hide_text.clone())));
        attrs
    }

    /// The element's opening tag with the current attributes.
    pub fn open_tag(&self) -> String {
        let mut tag = String::from("<live-demo");
        for (name, value) in self.attributes() {
            match value {
                Some(v) => tag.push_str(&format!(" {name}=\"{}\"", html_escape::encode_double_quoted_attribute(&v))),
                None => { tag.push(' '); tag.push_str(name); }
            }
        }
        tag.push('>');
        tag
    }

    pub fn toggle_fullscreen(&mut self) -> Display {
        self.display = match self.display { Display::Normal => Display::Fullscreen, Display::Fullscreen => Display::Normal };
        self.display
    }
}

/// Wait out the collapse transition, then apply `ticket`.
pub async fn schedule_clear<H>(demo: Arc<Mutex<LiveDemo<H>>>, ticket: ClearTicket) -> bool
where
    H: ExecutionHost + Send,
{
    let delay = demo.lock().await.clear_delay();
    tokio::time::sleep(delay).await;
    demo.lock().await.complete_clear(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fence::DemoFragment;

    fn demo() -> LiveDemo<MemoryHost> {
        let fragments = vec![
            DemoFragment { id: "d".into(), language: Language::Html, raw_text: "<p id=\"out\"></p>".into() },
            DemoFragment { id: "d".into(), language: Language::Js, raw_text: "dom.getById('out').textContent = 'hi';".into() },
        ];
        LiveDemo::new(DemoGroup::from_fragments("d", &fragments), MemoryHost::default(), &DemoSettings::default())
    }

    #[test]
    fn expand_renders_union_of_fragments() {
        let mut demo = demo();
        demo.select(Language::Js).unwrap();
        assert_eq!(demo.toggle().unwrap(), Transition::Expanded);

        let content = demo.host().content().expect("rendered");
        assert!(content.contains("<p id=\"out\"></p>"), "html present even with js tab selected");
        assert!(content.contains("dom.getById('out')"));
        assert_eq!(demo.button_label(), "Close");
        assert!(demo.is_slot_hidden(Language::Js));
    }

    #[test]
    fn reexpanding_ignores_already_attached() {
        let mut demo = demo();
        demo.toggle().unwrap();
        let Transition::Collapsed(ticket) = demo.toggle().unwrap() else { panic!("collapse") };
        assert!(demo.complete_clear(ticket));
        assert!(demo.host().content().is_none());
        assert_eq!(demo.toggle().unwrap(), Transition::Expanded);
        assert_eq!(demo.host().renders(), 2);
    }

    #[test]
    fn stale_ticket_does_not_clear_newer_content() {
        let mut demo = demo();
        demo.toggle().unwrap();
        let Transition::Collapsed(stale) = demo.toggle().unwrap() else { panic!("collapse") };
        demo.toggle().unwrap();
        assert!(!demo.complete_clear(stale));
        assert!(demo.host().content().is_some());
    }

    #[test]
    fn tabs_and_fullscreen_are_presentational() {
        let mut demo = demo();
        assert_eq!(demo.selected_language(), Some(Language::Html));
        assert!(!demo.is_slot_hidden(Language::Html));
        assert!(demo.is_slot_hidden(Language::Css));
        assert!(demo.select(Language::Css).is_err());
        assert_eq!(demo.toggle_fullscreen(), Display::Fullscreen);
        assert!(demo.host().content().is_none());
        assert_eq!(demo.button_label(), "Demo");
    }

    #[test]
    fn attributes_reflect_state() {
        let mut demo = demo();
        assert_eq!(demo.open_tag(), r#"<live-demo data-demo-id="d" selected="html" show-text="Demo" hide-text="Close">"#);
        demo.toggle().unwrap();
        demo.toggle_fullscreen();
        let tag = demo.open_tag();
        assert!(tag.contains(" toggled "), "{tag}");
        assert!(tag.contains(" expanded "), "{tag}");
        demo.toggle().unwrap();
        assert!(!demo.open_tag().contains("toggled"));
    }

    struct BrokenHost;
    impl ExecutionHost for BrokenHost {
        fn attach_shadow(&mut self) -> std::result::Result<(), AttachError> { Err(AttachError::Unsupported("no shadow DOM".into())) }
        fn render(&mut self, _content: &str) {}
        fn clear(&mut self) {}
    }

    #[test]
    fn unsupported_host_keeps_demo_collapsed() {
        let group = DemoGroup::from_fragments("d", &[DemoFragment { id: "d".into(), language: Language::Html, raw_text: "<b>x</b>".into() }]);
        let mut demo = LiveDemo::new(group, BrokenHost, &DemoSettings::default());
        assert!(matches!(demo.toggle(), Err(DemoError::Host(_))));
        assert_eq!(demo.view(), View::Collapsed);
    }
}
