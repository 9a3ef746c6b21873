//! The `<copy-to-clipboard>` button.
//!
//! A copy never fails loudly: the outcome only shows up as the button label,
//! which drops back to the idle text after a short delay.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

/// Where copied text goes (the system clipboard in a browser).
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> std::result::Result<(), String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState { Idle, Copied, Failed }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTicket { generation: u64 }

pub struct CopyButton {
    state: CopyState,
    generation: u64,
    reset_after: Duration,
}

impl Default for CopyButton {
    fn default() -> Self { Self::new(Duration::from_secs(2)) }
}

impl CopyButton {
    pub const COPY_TEXT: &'static str = "Copy text";
    pub const COPIED_TEXT: &'static str = "Copied";
    pub const FAILED_TEXT: &'static str = "Failed! 😞";

    pub fn new(reset_after: Duration) -> Self {
        Self { state: CopyState::Idle, generation: 0, reset_after }
    }

    pub fn state(&self) -> CopyState { self.state }
    pub fn reset_after(&self) -> Duration { self.reset_after }

    pub fn label(&self) -> &'static str {
        match self.state {
            CopyState::Idle => Self::COPY_TEXT,
            CopyState::Copied => Self::COPIED_TEXT,
            CopyState::Failed => Self::FAILED_TEXT,
        }
    }

    /// Copy `text`; the result is reflected in the label only.
    pub fn copy<C: Clipboard>(&mut self, clipboard: &mut C, text: &str) -> ResetTicket {
        self.state = match clipboard.write_text(text) {
            Ok(()) => CopyState::Copied,
            Err(reason) => {
                tracing::warn!(%reason, "copy to clipboard failed");
                CopyState::Failed
            }
        };
        self.generation += 1;
        ResetTicket { generation: self.generation }
    }

    /// Return to the idle label unless a newer copy happened since.
    pub fn reset(&mut self, ticket: ResetTicket) -> bool {
        if ticket.generation != self.generation { return false; }
        self.state = CopyState::Idle;
        true
    }
}

pub async fn schedule_reset(button: Arc<Mutex<CopyButton>>, ticket: ResetTicket) -> bool {
    let delay = button.lock().await.reset_after();
    tokio::time::sleep(delay).await;
    button.lock().await.reset(ticket)
}
