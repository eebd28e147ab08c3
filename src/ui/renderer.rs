use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::app::App;
use crate::core::constants::{EXAMPLE_PROMPTS, WELCOME_TAGLINE, WELCOME_TITLE};

pub fn ui(f: &mut Frame, app: &mut App) {
    let background = Block::default().style(Style::default().bg(app.ui.theme.background_color));
    f.render_widget(background, f.area());

    let input_area_height = app.input_area_height();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(input_area_height + 2), // +2 for borders
            Constraint::Length(1),
        ])
        .split(f.area());

    if app.conversation().is_empty() {
        draw_welcome(f, app, chunks[0]);
    } else {
        draw_transcript(f, app, chunks[0]);
    }
    draw_input(f, app, chunks[1]);
    draw_footer(f, app, chunks[2]);
}

fn draw_welcome(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(WELCOME_TITLE, theme.welcome_title_style)),
        Line::default(),
        Line::from(Span::styled(WELCOME_TAGLINE, theme.welcome_text_style)),
        Line::default(),
        Line::from(Span::styled(
            "Try an example (Tab / Shift+Tab):",
            theme.welcome_text_style,
        )),
        Line::default(),
    ];
    for (index, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
        let style = if app.ui.selected_example() == Some(index) {
            theme.example_selected_style
        } else {
            theme.example_style
        };
        lines.push(Line::from(Span::styled(format!(" {prompt} "), style)));
        lines.push(Line::default());
    }

    let welcome = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(welcome, area);
}

fn draw_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let total_lines = app.layout(area.width).lines.len();
    let offset = app.ui.scroll.sync(total_lines, area.height);
    let lines = app.layout(area.width).lines.clone();

    // Lines arrive pre-wrapped to the pane width
    let transcript = Paragraph::new(lines).scroll((offset, 0));
    f.render_widget(transcript, area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let (title, title_style, border_style) = if app.is_in_flight() {
        (
            format!(" {} Waiting for an answer… ", app.ui.spinner_frame()),
            theme.loading_indicator_style,
            theme.input_disabled_style,
        )
    } else {
        (
            " Ask anything (Enter to send, Shift+Enter for a new line) ".to_string(),
            theme.input_title_style,
            theme.input_border_style,
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(title, title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(app.ui.textarea(), inner);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let mut text = format!(
        "{} @ {} • Log: {}",
        app.session.model,
        app.session.host,
        app.session.logging.get_status_string()
    );
    if let Some(status) = app.ui.status() {
        text.push_str(" • ");
        text.push_str(status);
    }
    text.push_str(" • Ctrl+O open link • Ctrl+C quit");

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text, theme.footer_style))),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_actions, AppAction, AppActionContext};
    use crate::utils::test_utils::create_test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_conversation_shows_welcome_and_examples() {
        let mut app = create_test_app();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();

        let screen = screen_text(&terminal);
        assert!(screen.contains("Welcome to CodeGPT"));
        for prompt in EXAMPLE_PROMPTS {
            assert!(screen.contains(prompt), "missing example {prompt}");
        }
        assert!(screen.contains("test-model"));
    }

    #[test]
    fn transcript_replaces_welcome_after_first_turn() {
        let mut app = create_test_app();
        apply_actions(
            &mut app,
            [
                AppAction::InsertText("hello there".into()),
                AppAction::SubmitInput,
            ],
            AppActionContext::default(),
        );
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();

        let screen = screen_text(&terminal);
        assert!(!screen.contains("Welcome to CodeGPT"));
        assert!(screen.contains("You"));
        assert!(screen.contains("hello there"));
        assert!(screen.contains("Waiting for an answer"));
    }
}
