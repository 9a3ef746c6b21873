//! blogkit-demo
//!
//! Multi-part live code demos: fenced blocks tagged ```` ```lang id ```` are
//! folded into one `<live-demo>` widget at render time, and the widget's
//! sources are assembled into an executable snippet when it is expanded.
pub mod aggregate;
pub mod clipboard;
pub mod component;
pub mod error;
pub mod facade;
pub mod fence;
pub mod snippet;

pub use aggregate::{aggregate_blocks, render_markdown, BlockOutcome, DemoGroup, DemoWidget, RenderedPage};
pub use clipboard::{schedule_reset, Clipboard, CopyButton, CopyState, ResetTicket};
pub use component::{schedule_clear, AttachError, ClearTicket, Display, ExecutionHost, LiveDemo, MemoryHost, Transition, View};
pub use error::{DemoError, Result};
pub use fence::{CodeBlock, DemoFragment, FenceInfo, Language};
pub use snippet::{split_imports, ExecutableSnippet};
