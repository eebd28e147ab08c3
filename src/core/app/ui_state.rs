use std::time::Instant;

use tui_textarea::{Input, TextArea};

use crate::core::constants::{EXAMPLE_PROMPTS, MAX_INPUT_ROWS};
use crate::core::conversation::ConversationStore;
use crate::ui::layout::{Layout, LayoutConfig, LayoutEngine};
use crate::ui::theme::Theme;
use crate::utils::scroll::ScrollState;

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
const SPINNER_FRAME_MS: u128 = 120;

struct LayoutCache {
    revision: u64,
    width: u16,
    layout: Layout,
}

/// Presentation state owned by the event loop.
pub struct UiState {
    pub theme: Theme,
    pub markdown_enabled: bool,
    pub scroll: ScrollState,
    pub exit_requested: bool,
    textarea: TextArea<'static>,
    selected_example: Option<usize>,
    status: Option<String>,
    layout_cache: Option<LayoutCache>,
    pulse_start: Instant,
}

impl UiState {
    pub fn new(theme: Theme, markdown_enabled: bool) -> Self {
        let mut ui = Self {
            theme,
            markdown_enabled,
            scroll: ScrollState::default(),
            exit_requested: false,
            textarea: TextArea::default(),
            selected_example: None,
            status: None,
            layout_cache: None,
            pulse_start: Instant::now(),
        };
        ui.configure_textarea();
        ui
    }

    fn configure_textarea(&mut self) {
        let style = self
            .theme
            .input_text_style
            .patch(ratatui::style::Style::default().bg(self.theme.background_color));
        self.textarea.set_style(style);
        self.textarea.set_cursor_style(self.theme.input_cursor_style);
        self.textarea
            .set_cursor_line_style(ratatui::style::Style::default());
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_input_empty(&self) -> bool {
        self.textarea.lines().iter().all(|line| line.is_empty())
    }

    /// Replace the field's text and park the cursor at its end.
    pub fn set_input_text(&mut self, text: &str) {
        let lines: Vec<String> = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(str::to_string).collect()
        };
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
        self.configure_textarea();
    }

    pub fn clear_input(&mut self) {
        self.set_input_text("");
    }

    pub fn handle_input(&mut self, input: Input) {
        self.textarea.input(input);
    }

    pub fn insert_newline(&mut self) {
        self.textarea.insert_newline();
    }

    pub fn insert_text(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.textarea.insert_str(normalized);
    }

    /// Rows the input box needs for its content, capped so the transcript
    /// keeps most of the screen. Only explicit line breaks add rows; the
    /// textarea scrolls long lines sideways.
    pub fn input_rows(&self) -> u16 {
        let rows = self.textarea.lines().len().max(1);
        (rows.min(MAX_INPUT_ROWS as usize)) as u16
    }

    pub fn selected_example(&self) -> Option<usize> {
        self.selected_example
    }

    pub fn clear_example_selection(&mut self) {
        self.selected_example = None;
    }

    pub fn select_next_example(&mut self) -> &'static str {
        let next = match self.selected_example {
            Some(index) => (index + 1) % EXAMPLE_PROMPTS.len(),
            None => 0,
        };
        self.select_example(next)
    }

    pub fn select_previous_example(&mut self) -> &'static str {
        let previous = match self.selected_example {
            Some(0) | None => EXAMPLE_PROMPTS.len() - 1,
            Some(index) => index - 1,
        };
        self.select_example(previous)
    }

    /// Fill the input with example `index`. Nothing is submitted.
    fn select_example(&mut self, index: usize) -> &'static str {
        let prompt = EXAMPLE_PROMPTS[index];
        self.selected_example = Some(index);
        self.set_input_text(prompt);
        prompt
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn restart_pulse(&mut self) {
        self.pulse_start = Instant::now();
    }

    pub fn spinner_frame(&self) -> &'static str {
        let step = self.pulse_start.elapsed().as_millis() / SPINNER_FRAME_MS;
        SPINNER_FRAMES[(step % SPINNER_FRAMES.len() as u128) as usize]
    }

    /// Laid-out transcript for `width`, rebuilt only when the conversation
    /// revision or the width changes.
    pub fn layout_for(&mut self, conversation: &ConversationStore, width: u16) -> &Layout {
        let revision = conversation.revision();
        let fresh = self
            .layout_cache
            .as_ref()
            .is_some_and(|cache| cache.revision == revision && cache.width == width);
        if !fresh {
            self.layout_cache = None;
        }

        let theme = &self.theme;
        let cfg = LayoutConfig {
            width: (width > 0).then_some(width as usize),
            markdown_enabled: self.markdown_enabled,
        };
        &self
            .layout_cache
            .get_or_insert_with(|| LayoutCache {
                revision,
                width,
                layout: LayoutEngine::layout_turns(conversation.all(), theme, &cfg),
            })
            .layout
    }
}
