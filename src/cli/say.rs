//! TUI-less "say" command

use std::error::Error;

use ratatui::crossterm::terminal;
use tracing::warn;

use crate::core::config::Settings;
use crate::core::dispatcher::{RequestDispatcher, SubmitRejection};
use crate::core::generation::{GenerationClient, TextGenerator};
use crate::core::message::Turn;
use crate::ui::markdown::{render_markdown, render_plain};
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

/// How the answer should be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SayOutput {
    Raw,
    Plain,
    Markdown,
}

impl SayOutput {
    pub fn select(raw: bool, markdown: bool) -> Self {
        match (raw, markdown) {
            (true, _) => SayOutput::Raw,
            (false, true) => SayOutput::Markdown,
            (false, false) => SayOutput::Plain,
        }
    }
}

pub async fn run_say(
    settings: &Settings,
    prompt: Vec<String>,
    raw: bool,
    mut logging: LoggingState,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: codegpt say <prompt>");
        std::process::exit(1);
    }

    let client = GenerationClient::new(reqwest::Client::new(), settings);
    let (answer, failure) = ask(&client, &prompt, &mut logging).await?;

    let width = terminal::size().ok().map(|(w, _)| w as usize);
    let output = SayOutput::select(raw, settings.markdown);
    for line in format_answer(answer.content(), output, width) {
        println!("{line}");
    }

    match failure {
        Some(err) => Err(format!("Request failed: {err}").into()),
        None => Ok(()),
    }
}

/// Submit `prompt` through a fresh dispatcher and return the assistant turn
/// along with the error text when the fallback was used.
async fn ask(
    generator: &dyn TextGenerator,
    prompt: &str,
    logging: &mut LoggingState,
) -> Result<(Turn, Option<String>), Box<dyn Error>> {
    let mut dispatcher = RequestDispatcher::new();
    let answer = match dispatcher.submit(generator, prompt).await {
        Ok(turn) => turn.clone(),
        Err(SubmitRejection::EmptyInput) => return Err("Prompt is empty".into()),
        Err(SubmitRejection::InFlight) => return Err("A request is already running".into()),
    };

    for turn in dispatcher.conversation().all() {
        if let Err(err) = logging.log_turn(turn) {
            warn!(error = %err, "Failed to write transcript");
        }
    }

    let failure = dispatcher.state().last_error().map(str::to_string);
    Ok((answer, failure))
}

fn format_answer(content: &str, output: SayOutput, width: Option<usize>) -> Vec<String> {
    let theme = Theme::dark_default();
    let rendered = match output {
        SayOutput::Raw => return vec![content.to_string()],
        SayOutput::Plain => render_plain(content, &theme, width),
        SayOutput::Markdown => render_markdown(content, &theme, width),
    };
    rendered.lines.iter().map(|line| line.to_string()).collect()
}
