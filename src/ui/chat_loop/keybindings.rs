//! Translation of terminal events into app actions.

use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use tui_textarea::Input as TAInput;

use crate::core::app::AppAction;

const WHEEL_STEP: u16 = 3;

/// Map a key press to an action. `page_height` is the transcript height used
/// for PageUp/PageDown.
pub fn map_key(key: KeyEvent, page_height: u16) -> Option<AppAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Some(AppAction::Quit),
        KeyCode::Char('o') if ctrl => Some(AppAction::OpenLatestLink),
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            Some(AppAction::InsertNewline)
        }
        KeyCode::Enter => Some(AppAction::SubmitInput),
        KeyCode::Tab => Some(AppAction::SelectNextExample),
        KeyCode::BackTab => Some(AppAction::SelectPreviousExample),
        KeyCode::Up => Some(AppAction::ScrollUp(1)),
        KeyCode::Down => Some(AppAction::ScrollDown(1)),
        KeyCode::PageUp => Some(AppAction::ScrollUp(page_height.max(1))),
        KeyCode::PageDown => Some(AppAction::ScrollDown(page_height.max(1))),
        KeyCode::End => Some(AppAction::ScrollToBottom),
        _ => Some(AppAction::EditInput(TAInput::from(key))),
    }
}

pub fn map_mouse(mouse: MouseEvent) -> Option<AppAction> {
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(AppAction::ScrollUp(WHEEL_STEP)),
        MouseEventKind::ScrollDown => Some(AppAction::ScrollDown(WHEEL_STEP)),
        _ => None,
    }
}

/// Map any terminal event. Resizes and focus changes produce no action; the
/// loop redraws after every event anyway.
pub fn map_event(event: Event, page_height: u16) -> Option<AppAction> {
    match event {
        Event::Key(key) => map_key(key, page_height),
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Paste(text) => Some(AppAction::InsertText(text)),
        _ => None,
    }
}
