use ratatui::{style::Style, text::Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

enum Token {
    /// Consecutive non-blank text, possibly spanning several styles.
    Word(Vec<(String, Style)>),
    Space(String, Style),
    Break,
}

fn tokenize(spans: &[Span<'static>]) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for span in spans {
        let style = span.style;
        for ch in span.content.chars() {
            if ch == '\n' {
                tokens.push(Token::Break);
            } else if ch.is_whitespace() {
                match tokens.last_mut() {
                    Some(Token::Space(text, _)) => text.push(' '),
                    _ => tokens.push(Token::Space(" ".to_string(), style)),
                }
            } else {
                match tokens.last_mut() {
                    Some(Token::Word(pieces)) => match pieces.last_mut() {
                        Some((text, piece_style)) if *piece_style == style => text.push(ch),
                        _ => pieces.push((ch.to_string(), style)),
                    },
                    _ => tokens.push(Token::Word(vec![(ch.to_string(), style)])),
                }
            }
        }
    }
    tokens
}

fn word_width(pieces: &[(String, Style)]) -> usize {
    pieces
        .iter()
        .map(|(text, _)| UnicodeWidthStr::width(text.as_str()))
        .sum()
}

/// Wrap styled spans to `max_width` columns, breaking at whitespace and
/// hard-breaking words that cannot fit on a line of their own. A `'\n'`
/// inside a span forces a line break. A width of zero disables wrapping.
pub(crate) fn wrap_spans(spans: &[Span<'static>], max_width: usize) -> Vec<Vec<Span<'static>>> {
    let max_width = if max_width == 0 { usize::MAX } else { max_width };
    let mut lines: Vec<Vec<Span<'static>>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;
    let mut pending_space: Option<(String, Style)> = None;

    for token in tokenize(spans) {
        match token {
            Token::Break => {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
                pending_space = None;
            }
            Token::Space(text, style) => {
                if current_width > 0 {
                    pending_space = Some((text, style));
                }
            }
            Token::Word(pieces) => {
                let width = word_width(&pieces);
                let space_width = pending_space
                    .as_ref()
                    .map(|(text, _)| UnicodeWidthStr::width(text.as_str()))
                    .unwrap_or(0);

                if current_width > 0 && current_width + space_width + width > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                    pending_space = None;
                } else if let Some((text, style)) = pending_space.take() {
                    current.push(Span::styled(text, style));
                    current_width += space_width;
                }

                if width <= max_width.saturating_sub(current_width) {
                    for (text, style) in pieces {
                        current.push(Span::styled(text, style));
                    }
                    current_width += width;
                } else {
                    hard_break(pieces, max_width, &mut lines, &mut current, &mut current_width);
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn hard_break(
    pieces: Vec<(String, Style)>,
    max_width: usize,
    lines: &mut Vec<Vec<Span<'static>>>,
    current: &mut Vec<Span<'static>>,
    current_width: &mut usize,
) {
    for (text, style) in pieces {
        let mut chunk = String::new();
        for ch in text.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if *current_width + ch_width > max_width && *current_width > 0 {
                if !chunk.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                lines.push(std::mem::take(current));
                *current_width = 0;
            }
            chunk.push(ch);
            *current_width += ch_width;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, style));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::wrap_spans;
    use ratatui::style::{Modifier, Style};
    use ratatui::text::Span;

    fn texts(lines: Vec<Vec<Span<'static>>>) -> Vec<String> {
        lines
            .into_iter()
            .map(|line| line.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn wrap_splits_at_spaces() {
        let spans = vec![Span::raw("word boundary test")];
        assert_eq!(texts(wrap_spans(&spans, 13)), vec!["word boundary", "test"]);
    }

    #[test]
    fn long_words_are_hard_broken() {
        let spans = vec![Span::raw("abcdefghij xy")];
        assert_eq!(texts(wrap_spans(&spans, 4)), vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn styled_fragments_of_one_word_stay_together() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let spans = vec![
            Span::raw("aaa "),
            Span::styled("bb", bold),
            Span::raw("cc"),
        ];
        let wrapped = wrap_spans(&spans, 5);
        assert_eq!(texts(wrapped.clone()), vec!["aaa", "bbcc"]);
        assert_eq!(wrapped[1][0].style, bold);
    }

    #[test]
    fn newline_forces_break_and_zero_width_disables_wrapping() {
        let spans = vec![Span::raw("one two\nthree")];
        assert_eq!(texts(wrap_spans(&spans, 0)), vec!["one two", "three"]);
    }

    #[test]
    fn empty_input_yields_single_empty_line() {
        assert_eq!(wrap_spans(&[], 10).len(), 1);
    }
}
