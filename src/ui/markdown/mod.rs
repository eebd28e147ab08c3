//! Markdown to styled terminal lines.

mod autolink;
mod render;
mod table;
mod wrap;

pub use render::{render_markdown, render_plain, RenderedMarkdown};
