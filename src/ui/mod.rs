//! Terminal UI layer for the chat interface.
//!
//! - [`chat_loop`]: terminal lifecycle and the event loop that feeds
//!   [`crate::core::app::apply_actions`].
//! - [`renderer`] and [`layout`]: frame composition and transcript layout.
//! - [`markdown`]: Markdown to styled lines.
//! - [`theme`]: color and style policy.

pub mod chat_loop;
pub mod layout;
pub mod markdown;
pub mod renderer;
pub mod theme;
