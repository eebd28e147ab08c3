use std::sync::Arc;

use crate::core::config::Settings;
use crate::core::conversation::ConversationStore;
use crate::core::dispatcher::RequestDispatcher;
use crate::core::generation::TextGenerator;
use crate::ui::layout::Layout;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

pub mod actions;
pub mod session;
pub mod ui_state;


pub use actions::{apply_actions, AppAction, AppActionContext, AppCommand};
pub use session::SessionContext;
pub use ui_state::UiState;

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
    dispatcher: RequestDispatcher,
}

impl App {
    pub fn new(
        settings: &Settings,
        generator: Arc<dyn TextGenerator>,
        theme: Theme,
        logging: LoggingState,
    ) -> Self {
        Self {
            session: SessionContext::new(settings, generator, logging),
            ui: UiState::new(theme, settings.markdown),
            dispatcher: RequestDispatcher::new(),
        }
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn conversation(&self) -> &ConversationStore {
        self.dispatcher.conversation()
    }

    pub fn is_in_flight(&self) -> bool {
        self.dispatcher.is_in_flight()
    }

    pub fn request_exit(&mut self) {
        self.session.cancel_current_request();
        self.ui.exit_requested = true;
    }

    /// Transcript layout for a pane `width` columns wide, cached across frames.
    pub fn layout(&mut self, width: u16) -> &Layout {
        self.ui.layout_for(self.dispatcher.conversation(), width)
    }

    pub fn latest_link(&mut self, width: u16) -> Option<String> {
        self.layout(width).latest_link().map(str::to_string)
    }

    pub fn input_area_height(&self) -> u16 {
        self.ui.input_rows()
    }
}
