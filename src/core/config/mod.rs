pub mod data;
pub mod io;
pub mod printing;

#[cfg(test)]
mod tests;

pub use data::{path_display, CliOverrides, Config, Settings};
pub use io::ConfigError;
