use std::path::Path;

use crate::core::config::data::{path_display, Settings};

impl Settings {
    pub fn print_all(&self, config_path: Option<&Path>) {
        println!("Current configuration:");
        match config_path {
            Some(path) => println!("  config-file: {}", path_display(path)),
            None => println!("  config-file: (unknown)"),
        }
        println!("  host: {}", self.host);
        println!("  model: {}", self.model);
        println!("  api-key: {}", self.redacted_api_key());
        println!("  theme: {}", self.theme);
        match self.markdown {
            true => println!("  markdown: on"),
            false => println!("  markdown: off"),
        }
    }
}
