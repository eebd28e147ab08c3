use tracing::{debug, warn};
use tui_textarea::Input;

use super::App;
use crate::core::dispatcher::SubmitRejection;
use crate::core::generation::{GenerationResult, RequestParams};
use crate::core::message::Turn;
use crate::utils::browser::is_openable;

pub enum AppAction {
    SubmitInput,
    EditInput(Input),
    InsertNewline,
    InsertText(String),
    SelectNextExample,
    SelectPreviousExample,
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollToBottom,
    OpenLatestLink,
    GenerationFinished(GenerationResult),
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

pub enum AppCommand {
    SpawnRequest(RequestParams),
    OpenLink(String),
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
    ctx: AppActionContext,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action, ctx) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::SubmitInput => submit_input(app),
        AppAction::EditInput(input) => {
            if !app.is_in_flight() {
                app.ui.handle_input(input);
            }
            None
        }
        AppAction::InsertNewline => {
            if !app.is_in_flight() {
                app.ui.insert_newline();
            }
            None
        }
        AppAction::InsertText(text) => {
            if !app.is_in_flight() && !text.is_empty() {
                app.ui.insert_text(&text);
            }
            None
        }
        AppAction::SelectNextExample => {
            if can_pick_example(app) {
                app.ui.select_next_example();
            }
            None
        }
        AppAction::SelectPreviousExample => {
            if can_pick_example(app) {
                app.ui.select_previous_example();
            }
            None
        }
        AppAction::ScrollUp(lines) => {
            app.ui.scroll.scroll_up(lines);
            None
        }
        AppAction::ScrollDown(lines) => {
            app.ui.scroll.scroll_down(lines);
            None
        }
        AppAction::ScrollToBottom => {
            app.ui.scroll.scroll_to_bottom();
            None
        }
        AppAction::OpenLatestLink => open_latest_link(app, ctx),
        AppAction::GenerationFinished(result) => {
            finish_generation(app, result);
            None
        }
        AppAction::Quit => {
            app.request_exit();
            None
        }
    }
}

/// Examples are offered only before the first turn and while idle.
fn can_pick_example(app: &App) -> bool {
    app.conversation().is_empty() && !app.is_in_flight()
}

fn submit_input(app: &mut App) -> Option<AppCommand> {
    let text = app.ui.get_input_text();
    match app.dispatcher.begin(&text) {
        Ok(pending) => {
            app.ui.clear_input();
            app.ui.clear_example_selection();
            app.ui.clear_status();
            app.ui.scroll.scroll_to_bottom();
            app.ui.restart_pulse();
            if let Some(turn) = app.dispatcher.conversation().last() {
                log_turn(&mut app.session.logging, turn);
            }

            let cancel_token = app.session.issue_cancel_token();
            debug!(request_id = pending.id, model = %app.session.model, "Dispatching request");
            Some(AppCommand::SpawnRequest(RequestParams {
                generator: app.session.generator.clone(),
                prompt: pending.prompt,
                request_id: pending.id,
                cancel_token,
            }))
        }
        Err(SubmitRejection::EmptyInput) => None,
        Err(SubmitRejection::InFlight) => {
            app.ui.set_status("Still waiting for the previous answer");
            None
        }
    }
}

fn finish_generation(app: &mut App, result: GenerationResult) {
    let GenerationResult {
        request_id,
        outcome,
    } = result;
    if let Some(turn) = app.dispatcher.settle(request_id, outcome) {
        log_turn(&mut app.session.logging, turn);
        app.session.request_cancel_token = None;
    }
}

fn log_turn(logging: &mut crate::utils::logging::LoggingState, turn: &Turn) {
    if let Err(err) = logging.log_turn(turn) {
        warn!(error = %err, "Failed to write transcript");
    }
}

fn open_latest_link(app: &mut App, ctx: AppActionContext) -> Option<AppCommand> {
    match app.latest_link(ctx.term_width) {
        Some(url) if is_openable(&url) => {
            app.ui.set_status(format!("Opening {url}"));
            Some(AppCommand::OpenLink(url))
        }
        Some(url) => {
            app.ui.set_status(format!("Not opening {url}"));
            None
        }
        None => {
            app.ui.set_status("No link to open");
            None
        }
    }
}
