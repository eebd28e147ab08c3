//! Main chat event loop.
//!
//! A single task owns the [`App`]. Terminal events arrive from a blocking
//! reader thread and request outcomes from [`GenerationService`]; both are
//! turned into [`AppAction`]s, reduced by [`apply_actions`], and any resulting
//! [`AppCommand`]s are executed here.

mod keybindings;
mod lifecycle;

use std::{error::Error, sync::Arc, time::Duration};

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use self::keybindings::map_event;
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::core::app::{apply_actions, App, AppAction, AppActionContext, AppCommand};
use crate::core::config::Settings;
use crate::core::generation::{GenerationClient, GenerationService, TextGenerator};
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;
use crate::utils::browser::open_in_browser;
use crate::utils::logging::LoggingState;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const TICK_INTERVAL: Duration = Duration::from_millis(120);

pub async fn run_chat(settings: Settings, logging: LoggingState) -> Result<(), Box<dyn Error>> {
    let generator: Arc<dyn TextGenerator> =
        Arc::new(GenerationClient::new(reqwest::Client::new(), &settings));
    let theme = Theme::resolve(&settings.theme);
    let mut app = App::new(&settings, generator, theme, logging);
    info!(model = %settings.model, host = %settings.host, "Starting chat session");

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app).await;
    app.session.cancel_current_request();
    let restored = restore_terminal(&mut terminal);

    result?;
    restored
}

fn spawn_event_reader(
    tx: mpsc::UnboundedSender<Event>,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !stop.is_cancelled() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "Failed to read terminal event");
                        break;
                    }
                },
                Ok(false) => {}
                Err(err) => {
                    warn!(error = %err, "Failed to poll terminal events");
                    break;
                }
            }
        }
    })
}

/// Transcript rows left after the input box, its borders and the footer.
fn page_height(app: &App, term_height: u16) -> u16 {
    term_height.saturating_sub(app.input_area_height() + 3)
}

fn execute_command(app: &mut App, service: &GenerationService, command: AppCommand) {
    match command {
        AppCommand::SpawnRequest(params) => {
            debug!(request_id = params.request_id, "Spawning request");
            service.spawn_request(params);
        }
        AppCommand::OpenLink(url) => {
            if let Err(err) = open_in_browser(&url) {
                app.ui.set_status(format!("Could not open link: {err}"));
            }
        }
    }
}

async fn event_loop(terminal: &mut ChatTerminal, app: &mut App) -> Result<(), Box<dyn Error>> {
    let (service, mut results) = GenerationService::new();
    let (event_tx, mut events) = mpsc::unbounded_channel::<Event>();
    let stop_reader = CancellationToken::new();
    let reader = spawn_event_reader(event_tx, stop_reader.clone());
    let mut tick = tokio::time::interval(TICK_INTERVAL);
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = loop {
        if app.ui.exit_requested {
            break Ok(());
        }

        if request_redraw {
            if let Err(err) = terminal.draw(|f| ui(f, app)) {
                break Err(err.into());
            }
            request_redraw = false;
        }

        let size = match terminal.size() {
            Ok(size) => size,
            Err(err) => break Err(err.into()),
        };
        let ctx = AppActionContext {
            term_width: size.width,
            term_height: size.height,
        };

        let action: Option<AppAction> = tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    request_redraw = true;
                    map_event(event, page_height(app, size.height))
                }
                None => break Err("terminal input closed".into()),
            },
            Some(result) = results.recv() => {
                request_redraw = true;
                Some(AppAction::GenerationFinished(result))
            }
            _ = tick.tick() => {
                // Keep the spinner moving while waiting.
                request_redraw |= app.is_in_flight();
                None
            }
        };

        for command in apply_actions(app, action, ctx) {
            execute_command(app, &service, command);
        }
    };

    stop_reader.cancel();
    if let Err(err) = reader.await {
        debug!(error = %err, "Event reader ended abnormally");
    }
    result
}
