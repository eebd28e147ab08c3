//! CodeGPT is a terminal-first chat client for a hosted text-generation model.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the request dispatcher that enforces one
//!   request at a time, the HTTP generation client, and configuration.
//! - [`ui`] renders the terminal interface, including Markdown formatting of
//!   turns, and runs the interactive event loop.
//! - [`api`] defines the request and response payloads of the generation API.
//! - [`utils`] holds small helpers: transcript logging, scrolling, URLs and
//!   link opening.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves [`core::config::Settings`] and
//! dispatches into [`ui::chat_loop`] or the one-shot `say` command.

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
