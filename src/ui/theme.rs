use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Turn badges and body text
    pub user_badge_style: Style,
    pub assistant_badge_style: Style,
    pub text_style: Style,

    // Markdown
    pub heading_style: Style,
    pub inline_code_style: Style,
    pub code_block_style: Style,
    pub link_style: Style,
    pub quote_style: Style,
    pub list_marker_style: Style,
    pub table_border_style: Style,
    pub table_header_style: Style,
    pub rule_style: Style,

    // Welcome panel
    pub welcome_title_style: Style,
    pub welcome_text_style: Style,
    pub example_style: Style,
    pub example_selected_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub input_disabled_style: Style,
    pub input_cursor_style: Style,
    pub loading_indicator_style: Style,

    pub footer_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_badge_style: Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
            assistant_badge_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            text_style: Style::default().fg(Color::White),

            heading_style: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            inline_code_style: Style::default().fg(Color::Yellow),
            code_block_style: Style::default().fg(Color::Gray).bg(Color::Rgb(30, 30, 30)),
            link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            quote_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            list_marker_style: Style::default().fg(Color::Green),
            table_border_style: Style::default().fg(Color::DarkGray),
            table_header_style: Style::default().add_modifier(Modifier::BOLD),
            rule_style: Style::default().fg(Color::DarkGray),

            welcome_title_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            welcome_text_style: Style::default().fg(Color::Gray),
            example_style: Style::default().fg(Color::Gray),
            example_selected_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Green),

            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            input_disabled_style: Style::default().fg(Color::DarkGray),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            loading_indicator_style: Style::default().fg(Color::Green),

            footer_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_badge_style: Style::default()
                .fg(Color::White)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
            assistant_badge_style: Style::default()
                .fg(Color::White)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            text_style: Style::default().fg(Color::Black),

            heading_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            inline_code_style: Style::default().fg(Color::Magenta),
            code_block_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(235, 235, 235)),
            link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            quote_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            list_marker_style: Style::default().fg(Color::Green),
            table_border_style: Style::default().fg(Color::Gray),
            table_header_style: Style::default().add_modifier(Modifier::BOLD),
            rule_style: Style::default().fg(Color::Gray),

            welcome_title_style: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            welcome_text_style: Style::default().fg(Color::DarkGray),
            example_style: Style::default().fg(Color::DarkGray),
            example_selected_style: Style::default()
                .fg(Color::White)
                .bg(Color::Green),

            input_border_style: Style::default().fg(Color::DarkGray),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
            input_disabled_style: Style::default().fg(Color::Gray),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            loading_indicator_style: Style::default().fg(Color::Green),

            footer_style: Style::default().fg(Color::Gray),
        }
    }

    /// Look up a built-in theme; `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "default" | "default-dark" => Some(Self::dark_default()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Like [`Theme::from_name`], falling back to the dark palette.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(theme = %name, "Unknown theme, using dark");
            Self::dark_default()
        })
    }

    pub fn md_paragraph_style(&self) -> Style {
        self.text_style
    }
}
