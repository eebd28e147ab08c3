use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::autolink::{split_autolinks, Segment};
use super::table::TableRenderer;
use super::wrap::wrap_spans;
use crate::ui::theme::Theme;

const BULLETS: [&str; 3] = ["• ", "◦ ", "▪ "];
const DEFAULT_RULE_WIDTH: usize = 40;

/// Styled lines for one piece of text, plus every link target found in it in
/// document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedMarkdown {
    pub lines: Vec<Line<'static>>,
    pub links: Vec<String>,
}

/// Render markdown `content`, wrapping to `width` columns when given.
pub fn render_markdown(content: &str, theme: &Theme, width: Option<usize>) -> RenderedMarkdown {
    MarkdownRenderer::new(theme, width).render(content)
}

/// Render `content` verbatim, only wrapping long lines.
pub fn render_plain(content: &str, theme: &Theme, width: Option<usize>) -> RenderedMarkdown {
    let style = theme.md_paragraph_style();
    let mut lines = Vec::new();
    for raw in detab(content).split('\n') {
        if raw.is_empty() {
            lines.push(Line::default());
            continue;
        }
        let spans = [Span::styled(raw.to_string(), style)];
        for wrapped in wrap_spans(&spans, width.unwrap_or(0)) {
            lines.push(Line::from(wrapped));
        }
    }
    RenderedMarkdown {
        lines,
        links: Vec::new(),
    }
}

fn detab(s: &str) -> String {
    s.replace('\t', "    ")
}

fn spans_width(spans: &[Span<'_>]) -> usize {
    spans
        .iter()
        .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
        .sum()
}

/// Split a code line into chunks no wider than `max_width` columns.
fn char_chunks(line: &str, max_width: Option<usize>) -> Vec<String> {
    let Some(max_width) = max_width else {
        return vec![line.to_string()];
    };
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut width = 0usize;
    for ch in line.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > max_width && width > 0 {
            chunks.push(std::mem::take(&mut chunk));
            width = 0;
        }
        chunk.push(ch);
        width += ch_width;
    }
    if !chunk.is_empty() || chunks.is_empty() {
        chunks.push(chunk);
    }
    chunks
}

enum Container {
    Quote,
    List { next: Option<u64> },
    Item { marker: String, used: bool },
}

struct LinkState {
    href: String,
    text: String,
    image: bool,
}

struct MarkdownRenderer<'a> {
    theme: &'a Theme,
    width: Option<usize>,
    lines: Vec<Line<'static>>,
    links: Vec<String>,
    current: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    containers: Vec<Container>,
    link: Option<LinkState>,
    code_block: Option<String>,
    table: Option<TableRenderer>,
    cell: Vec<Span<'static>>,
    needs_gap: bool,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(theme: &'a Theme, width: Option<usize>) -> Self {
        Self {
            theme,
            width,
            lines: Vec::new(),
            links: Vec::new(),
            current: Vec::new(),
            style_stack: vec![theme.md_paragraph_style()],
            containers: Vec::new(),
            link: None,
            code_block: None,
            table: None,
            cell: Vec::new(),
            needs_gap: false,
        }
    }

    fn render(mut self, content: &str) -> RenderedMarkdown {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        // Adjacent text events are merged so bare URLs are seen whole.
        for event in TextMergeStream::new(Parser::new_ext(content, options)) {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) => {
                    if let Some(buffer) = self.code_block.as_mut() {
                        buffer.push_str(&text);
                    } else {
                        self.push_text(&text);
                    }
                }
                Event::Code(code) => {
                    let style = self.theme.inline_code_style;
                    if let Some(link) = self.link.as_mut() {
                        link.text.push_str(&code);
                    }
                    self.push_span(Span::styled(detab(&code), style));
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    let style = self.current_style();
                    let text = html.trim_end_matches('\n');
                    self.push_span(Span::styled(detab(text), style));
                }
                Event::SoftBreak => {
                    let style = self.current_style();
                    self.push_span(Span::styled(" ", style));
                }
                Event::HardBreak => {
                    if self.table.is_some() {
                        self.cell.push(Span::raw(" "));
                    } else {
                        self.flush_line();
                    }
                }
                Event::Rule => {
                    self.flush_line();
                    self.start_block();
                    self.push_rule();
                    self.needs_gap = true;
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.push_span(Span::styled(marker, self.theme.list_marker_style));
                }
                _ => {}
            }
        }

        self.flush_line();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        RenderedMarkdown {
            lines: self.lines,
            links: self.links,
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_line();
                self.start_block();
            }
            Tag::Heading { .. } => {
                self.flush_line();
                self.start_block();
                let style = self.current_style().patch(self.theme.heading_style);
                self.style_stack.push(style);
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.start_block();
                self.containers.push(Container::Quote);
                let style = self.current_style().patch(self.theme.quote_style);
                self.style_stack.push(style);
            }
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.start_block();
                self.code_block = Some(String::new());
            }
            Tag::List(start) => {
                self.flush_line();
                if self.list_depth() == 0 {
                    self.start_block();
                }
                self.containers.push(Container::List { next: start });
            }
            Tag::Item => {
                self.flush_line();
                let marker = self.next_marker();
                self.containers.push(Container::Item {
                    marker,
                    used: false,
                });
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link {
                link_type,
                dest_url,
                ..
            } => {
                let href = if link_type == LinkType::Email && !dest_url.starts_with("mailto:") {
                    format!("mailto:{dest_url}")
                } else {
                    dest_url.to_string()
                };
                self.begin_link(href, false);
            }
            Tag::Image { dest_url, .. } => {
                self.begin_link(dest_url.to_string(), true);
                let style = self.current_style();
                self.push_span(Span::styled("[", style));
            }
            Tag::Table(alignments) => {
                self.flush_line();
                self.start_block();
                self.table = Some(TableRenderer::new(alignments));
            }
            Tag::TableCell => self.cell.clear(),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line();
                self.needs_gap = true;
            }
            TagEnd::Heading(_) => {
                self.flush_line();
                self.style_stack.pop();
                self.needs_gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.pop_container();
                self.style_stack.pop();
                self.needs_gap = true;
            }
            TagEnd::CodeBlock => {
                self.finish_code_block();
                self.needs_gap = true;
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.pop_container();
                if self.list_depth() == 0 {
                    self.needs_gap = true;
                }
            }
            TagEnd::Item => {
                self.flush_line();
                self.pop_container();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.style_stack.pop();
            }
            TagEnd::Link | TagEnd::Image => self.end_link(),
            TagEnd::TableCell => {
                let cell = std::mem::take(&mut self.cell);
                if let Some(table) = self.table.as_mut() {
                    table.push_cell(cell);
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.end_header();
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.push_table(&table);
                }
                self.needs_gap = true;
            }
            _ => {}
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack
            .last()
            .copied()
            .unwrap_or_else(|| self.theme.md_paragraph_style())
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn list_depth(&self) -> usize {
        self.containers
            .iter()
            .filter(|container| matches!(container, Container::List { .. }))
            .count()
    }

    fn next_marker(&mut self) -> String {
        let depth = self.list_depth();
        let next = self.containers.iter_mut().rev().find_map(|container| match container {
            Container::List { next } => Some(next),
            _ => None,
        });
        match next {
            Some(Some(number)) => {
                let marker = format!("{number}. ");
                *number += 1;
                marker
            }
            _ => BULLETS[depth.saturating_sub(1) % BULLETS.len()].to_string(),
        }
    }

    fn pop_container(&mut self) {
        self.containers.pop();
    }

    /// Emit a blank separator if the previous block asked for one.
    fn start_block(&mut self) {
        if self.needs_gap && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.needs_gap = false;
    }

    /// Prefix for the next emitted line. List markers are shown once per item;
    /// later lines get matching indentation.
    fn line_prefix(&mut self) -> Vec<Span<'static>> {
        let theme = self.theme;
        let mut spans = Vec::new();
        for container in &mut self.containers {
            match container {
                Container::Quote => spans.push(Span::styled("│ ", theme.quote_style)),
                Container::List { .. } => {}
                Container::Item { marker, used } => {
                    if *used {
                        spans.push(Span::raw(" ".repeat(marker.width())));
                    } else {
                        *used = true;
                        spans.push(Span::styled(marker.clone(), theme.list_marker_style));
                    }
                }
            }
        }
        spans
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.table.is_some() {
            self.cell.push(span);
        } else {
            self.current.push(span);
        }
    }

    fn push_text(&mut self, text: &str) {
        let style = self.current_style();
        if let Some(link) = self.link.as_mut() {
            link.text.push_str(text);
            self.push_span(Span::styled(detab(text), style));
            return;
        }

        for segment in split_autolinks(text) {
            match segment {
                Segment::Text(plain) => self.push_span(Span::styled(detab(plain), style)),
                Segment::Url { text, href } => {
                    let link_style = style.patch(self.theme.link_style);
                    self.push_span(Span::styled(text.to_string(), link_style));
                    self.links.push(href);
                }
            }
        }
    }

    fn begin_link(&mut self, href: String, image: bool) {
        let style = self.current_style().patch(self.theme.link_style);
        self.style_stack.push(style);
        self.link = Some(LinkState {
            href,
            text: String::new(),
            image,
        });
    }

    fn end_link(&mut self) {
        self.style_stack.pop();
        let Some(link) = self.link.take() else {
            return;
        };
        let style = self.current_style();
        if link.image {
            self.push_span(Span::styled("]", style.patch(self.theme.link_style)));
        }
        if link.href.is_empty() {
            return;
        }

        let shown = link.text.trim();
        let same_as_text = shown == link.href
            || link
                .href
                .strip_prefix("mailto:")
                .is_some_and(|address| address == shown);
        if !same_as_text {
            let suffix = format!(" ({})", link.href);
            self.push_span(Span::styled(suffix, style.add_modifier(Modifier::DIM)));
        }
        self.links.push(link.href);
    }

    fn flush_line(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.current);
        let first = self.line_prefix();
        let rest = self.line_prefix();
        let max_width = self
            .width
            .map(|width| width.saturating_sub(spans_width(&first)).max(1))
            .unwrap_or(0);

        for (index, wrapped) in wrap_spans(&spans, max_width).into_iter().enumerate() {
            let mut line = if index == 0 { first.clone() } else { rest.clone() };
            line.extend(wrapped);
            self.lines.push(Line::from(line));
        }
    }

    fn finish_code_block(&mut self) {
        let Some(code) = self.code_block.take() else {
            return;
        };
        let code = detab(code.trim_end_matches('\n'));
        let first = self.line_prefix();
        let rest = self.line_prefix();
        // One column of padding on each side of the code.
        let inner_width = self
            .width
            .map(|width| width.saturating_sub(spans_width(&first) + 2).max(1));

        let chunks: Vec<String> = code
            .split('\n')
            .flat_map(|line| char_chunks(line, inner_width))
            .collect();
        let block_width = chunks
            .iter()
            .map(|chunk| UnicodeWidthStr::width(chunk.as_str()))
            .max()
            .unwrap_or(0);

        let style = self.theme.code_block_style;
        for (index, chunk) in chunks.into_iter().enumerate() {
            let padding = block_width.saturating_sub(UnicodeWidthStr::width(chunk.as_str()));
            let mut line = if index == 0 { first.clone() } else { rest.clone() };
            line.push(Span::styled(
                format!(" {chunk}{} ", " ".repeat(padding)),
                style,
            ));
            self.lines.push(Line::from(line));
        }
    }

    fn push_table(&mut self, table: &TableRenderer) {
        let first = self.line_prefix();
        let rest = self.line_prefix();
        let max_width = self
            .width
            .map(|width| width.saturating_sub(spans_width(&first)));
        for (index, table_line) in table.render(self.theme, max_width).into_iter().enumerate() {
            let mut line = if index == 0 { first.clone() } else { rest.clone() };
            line.extend(table_line.spans);
            self.lines.push(Line::from(line));
        }
    }

    fn push_rule(&mut self) {
        let prefix = self.line_prefix();
        let width = self
            .width
            .map(|width| width.saturating_sub(spans_width(&prefix)).max(1))
            .unwrap_or(DEFAULT_RULE_WIDTH);
        let mut line = prefix;
        line.push(Span::styled("─".repeat(width), self.theme.rule_style));
        self.lines.push(Line::from(line));
    }
}
