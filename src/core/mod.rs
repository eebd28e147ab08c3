pub mod app;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod dispatcher;
pub mod generation;
pub mod message;
