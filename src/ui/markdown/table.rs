use pulldown_cmark::Alignment;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::wrap::wrap_spans;
use crate::ui::theme::Theme;

type TableCell = Vec<Span<'static>>;

/// Columns are never squeezed below this many cells.
const MIN_COLUMN_WIDTH: usize = 3;

/// Collects markdown table events and produces bordered, themed lines.
pub(super) struct TableRenderer {
    alignments: Vec<Alignment>,
    rows: Vec<Vec<TableCell>>,
    header_rows: usize,
    current_row: Vec<TableCell>,
}

fn cell_width(cell: &TableCell) -> usize {
    cell.iter()
        .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
        .sum()
}

impl TableRenderer {
    pub(super) fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            alignments,
            rows: Vec::new(),
            header_rows: 0,
            current_row: Vec::new(),
        }
    }

    pub(super) fn end_header(&mut self) {
        self.end_row();
        self.header_rows = self.rows.len();
    }

    pub(super) fn end_row(&mut self) {
        if !self.current_row.is_empty() {
            self.rows.push(std::mem::take(&mut self.current_row));
        }
    }

    pub(super) fn push_cell(&mut self, spans: Vec<Span<'static>>) {
        self.current_row.push(spans);
    }

    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.alignments.len())
    }

    fn natural_widths(&self, columns: usize) -> Vec<usize> {
        let mut widths = vec![1usize; columns];
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                widths[index] = widths[index].max(cell_width(cell));
            }
        }
        widths
    }

    /// Shrink the widest columns until the table fits in `max_width`.
    fn balance_column_widths(mut widths: Vec<usize>, max_width: Option<usize>) -> Vec<usize> {
        let Some(max_width) = max_width else {
            return widths;
        };
        let overhead = 1 + 3 * widths.len();
        let budget = max_width.saturating_sub(overhead);

        while widths.iter().sum::<usize>() > budget {
            let Some((index, widest)) = widths
                .iter()
                .copied()
                .enumerate()
                .max_by_key(|(_, width)| *width)
            else {
                break;
            };
            if widest <= MIN_COLUMN_WIDTH {
                break;
            }
            widths[index] = widest - 1;
        }
        widths
    }

    fn border_line(widths: &[usize], left: &str, middle: &str, right: &str, style: Style) -> Line<'static> {
        let body = widths
            .iter()
            .map(|width| "─".repeat(width + 2))
            .collect::<Vec<_>>()
            .join(middle);
        Line::from(Span::styled(format!("{left}{body}{right}"), style))
    }

    fn padded(spans: Vec<Span<'static>>, width: usize, alignment: Alignment) -> Vec<Span<'static>> {
        let content_width: usize = spans
            .iter()
            .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
            .sum();
        let padding = width.saturating_sub(content_width);
        let (left, right) = match alignment {
            Alignment::Right => (padding, 0),
            Alignment::Center => (padding / 2, padding - padding / 2),
            Alignment::Left | Alignment::None => (0, padding),
        };

        let mut out = Vec::with_capacity(spans.len() + 2);
        if left > 0 {
            out.push(Span::raw(" ".repeat(left)));
        }
        out.extend(spans);
        if right > 0 {
            out.push(Span::raw(" ".repeat(right)));
        }
        out
    }

    pub(super) fn render(&self, theme: &Theme, max_width: Option<usize>) -> Vec<Line<'static>> {
        let columns = self.column_count();
        if self.rows.is_empty() || columns == 0 {
            return Vec::new();
        }

        let widths = Self::balance_column_widths(self.natural_widths(columns), max_width);
        let border = theme.table_border_style;
        let mut lines = vec![Self::border_line(&widths, "┌", "┬", "┐", border)];

        for (row_index, row) in self.rows.iter().enumerate() {
            let is_header = row_index < self.header_rows;
            let wrapped: Vec<Vec<Vec<Span<'static>>>> = (0..columns)
                .map(|column| {
                    let cell = row.get(column).cloned().unwrap_or_default();
                    let cell = if is_header {
                        cell.into_iter()
                            .map(|span| {
                                let style = span.style.patch(theme.table_header_style);
                                span.style(style)
                            })
                            .collect()
                    } else {
                        cell
                    };
                    wrap_spans(&cell, widths[column])
                })
                .collect();
            let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

            for line_index in 0..height {
                let mut spans = vec![Span::styled("│", border)];
                for (column, cell_lines) in wrapped.iter().enumerate() {
                    let content = cell_lines.get(line_index).cloned().unwrap_or_default();
                    let alignment = self
                        .alignments
                        .get(column)
                        .copied()
                        .unwrap_or(Alignment::None);
                    spans.push(Span::raw(" "));
                    spans.extend(Self::padded(content, widths[column], alignment));
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled("│", border));
                }
                lines.push(Line::from(spans));
            }

            if is_header && row_index + 1 == self.header_rows && self.rows.len() > self.header_rows {
                lines.push(Self::border_line(&widths, "├", "┼", "┤", border));
            }
        }

        lines.push(Self::border_line(&widths, "└", "┴", "┘", border));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::line_texts;

    fn table(rows: &[&[&str]], alignments: Vec<Alignment>) -> TableRenderer {
        let mut renderer = TableRenderer::new(alignments);
        for (index, row) in rows.iter().enumerate() {
            for cell in row.iter() {
                renderer.push_cell(vec![Span::raw(cell.to_string())]);
            }
            if index == 0 {
                renderer.end_header();
            } else {
                renderer.end_row();
            }
        }
        renderer
    }

    #[test]
    fn renders_box_drawn_table_with_header_separator() {
        let renderer = table(
            &[&["Type", "Example"], &["string", "\"hi\""], &["number", "42"]],
            vec![Alignment::Left, Alignment::Right],
        );
        let lines = line_texts(&renderer.render(&Theme::dark_default(), None));
        assert_eq!(
            lines,
            vec![
                "┌────────┬─────────┐",
                "│ Type   │ Example │",
                "├────────┼─────────┤",
                "│ string │    \"hi\" │",
                "│ number │      42 │",
                "└────────┴─────────┘",
            ]
        );
    }

    #[test]
    fn narrow_width_wraps_cells() {
        let renderer = table(
            &[&["Name", "Description"], &["x", "a fairly long description"]],
            vec![Alignment::None, Alignment::None],
        );
        let lines = line_texts(&renderer.render(&Theme::dark_default(), Some(24)));
        for line in &lines {
            assert!(UnicodeWidthStr::width(line.as_str()) <= 24, "too wide: {line}");
        }
        assert!(lines.len() > 5);
    }

    #[test]
    fn center_alignment_splits_padding() {
        let padded = TableRenderer::padded(vec![Span::raw("ab")], 5, Alignment::Center);
        let text: String = padded.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " ab  ");
    }
}
