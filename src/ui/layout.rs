use ratatui::text::{Line, Span};

use super::markdown::{render_markdown, render_plain};
use super::theme::Theme;
use crate::core::message::{Role, Turn};

const USER_BADGE: &str = " You ";
const ASSISTANT_BADGE: &str = " Bot ";

/// Layout configuration used by the layout engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
    pub width: Option<usize>,
    pub markdown_enabled: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: None,
            markdown_enabled: true,
        }
    }
}

/// Mapping for a single turn's contribution to the flattened line stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnLineSpan {
    pub start: usize,
    pub len: usize,
}

/// Result of a layout pass: the flattened lines, where each turn landed, and
/// every link target in transcript order.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub lines: Vec<Line<'static>>,
    pub turn_spans: Vec<TurnLineSpan>,
    pub links: Vec<String>,
}

impl Layout {
    pub fn latest_link(&self) -> Option<&str> {
        self.links.last().map(String::as_str)
    }
}

fn badge(role: Role, theme: &Theme) -> Line<'static> {
    match role {
        Role::User => Line::from(Span::styled(USER_BADGE, theme.user_badge_style)),
        Role::Assistant => Line::from(Span::styled(ASSISTANT_BADGE, theme.assistant_badge_style)),
    }
}

pub struct LayoutEngine;

impl LayoutEngine {
    /// Lay out every turn: a role badge, the rendered body, and a blank line
    /// between turns. Lines are already wrapped to `cfg.width`.
    pub fn layout_turns(turns: &[Turn], theme: &Theme, cfg: &LayoutConfig) -> Layout {
        let mut layout = Layout::default();
        for (index, turn) in turns.iter().enumerate() {
            if index > 0 {
                layout.lines.push(Line::default());
            }
            let start = layout.lines.len();
            layout.lines.push(badge(turn.role(), theme));

            let rendered = if cfg.markdown_enabled {
                render_markdown(turn.content(), theme, cfg.width)
            } else {
                render_plain(turn.content(), theme, cfg.width)
            };
            layout.lines.extend(rendered.lines);
            layout.links.extend(rendered.links);
            layout.turn_spans.push(TurnLineSpan {
                start,
                len: layout.lines.len() - start,
            });
        }
        layout
    }
}
