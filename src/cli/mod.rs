//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::cli::say::run_say;
use crate::core::config::{path_display, CliOverrides, Config, Settings};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::LoggingState;

#[derive(Parser)]
#[command(name = "codegpt")]
#[command(version)]
#[command(about = "A terminal chat client for a hosted text-generation model")]
#[command(
    long_about = "CodeGPT is a full-screen terminal chat interface. Each message you send is \
forwarded to a text-generation model and the answer is shown as formatted Markdown.\n\n\
Configuration:\n\
  Settings are read from config.toml in the platform config directory, then from the\n\
  environment, then from command-line flags.\n\n\
Environment Variables:\n\
  CODEGPT_API_KEY   API key for the generation service (required)\n\
  CODEGPT_HOST      API host (optional, defaults to generativelanguage.googleapis.com)\n\
  CODEGPT_MODEL     Model name (optional, defaults to text-bison-001)\n\
  CODEGPT_LOG       Diagnostic log filter used with --debug-log (optional)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Shift/Alt+Enter   Insert a new line\n\
  Tab/Shift+Tab     Cycle example prompts\n\
  Up/Down/Mouse     Scroll through the conversation\n\
  End               Jump to the latest message\n\
  Ctrl+O            Open the most recent link\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Model to use for generation
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// API host to send requests to
    #[arg(long, global = true, value_name = "HOST")]
    pub host: Option<String>,

    /// Append the conversation transcript to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single prompt and print the answer
    Say {
        /// Prompt text (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true)]
        prompt: Vec<String>,
        /// Print the answer without Markdown rendering
        #[arg(long)]
        raw: bool,
    },
    /// Show the resolved configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = args.debug_log.as_deref() {
        if let Err(e) = crate::logging::init(path) {
            eprintln!("❌ Could not open debug log {}: {e}", path_display(path));
            std::process::exit(1);
        }
    }

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let overrides = CliOverrides {
        host: args.host.clone(),
        model: args.model.clone(),
    };
    let settings = match config.resolve(&overrides) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    info!(model = %settings.model, host = %settings.host, "Resolved configuration");

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Config => {
            print_config(&settings, args.config);
            Ok(())
        }
        Commands::Chat => {
            let logging = open_transcript(args.log);
            run_chat(settings, logging).await
        }
        Commands::Say { prompt, raw } => {
            let logging = open_transcript(args.log);
            if let Err(e) = run_say(&settings, prompt, raw, logging).await {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn print_config(settings: &Settings, explicit_path: Option<PathBuf>) {
    let path = explicit_path.or_else(|| Config::get_config_path().ok());
    settings.print_all(path.as_deref());
}

fn open_transcript(path: Option<PathBuf>) -> LoggingState {
    match path {
        Some(path) => match LoggingState::with_file(path.clone()) {
            Ok(logging) => logging,
            Err(e) => {
                eprintln!("❌ Could not open log file {}: {e}", path_display(&path));
                std::process::exit(1);
            }
        },
        None => LoggingState::new(None),
    }
}
