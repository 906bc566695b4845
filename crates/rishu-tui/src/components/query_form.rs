//! Query form — free-text interests, provider selector and submit control.
//!
//! Features:
//! - Multi-line text area with cursor and scroll viewport
//! - Two-option provider selector, exactly one marked
//! - Submit control rendered disabled while the query is blank or a
//!   request is pending, with a busy label while pending

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use rishu_core::{Provider, QueryInput};

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

const PLACEHOLDER: &str = "e.g. I want to learn the basics of tourism. \
                           I'm also interested in regional development and town planning.";

const SUBMIT_LABEL: &str = " Ask the AI for recommendations ";
const BUSY_LABEL: &str = " AI is thinking... ";

pub struct QueryFormComponent {
    /// Text and provider as the user left them.
    pub input: QueryInput,
    /// Cursor position (byte offset) within the text.
    pub cursor: usize,
    /// Whether the text area has focus.
    pub editing: bool,
    /// A request is in flight; set by the App.
    pub loading: bool,
    /// Submit control is disabled; set by the App.
    pub submit_disabled: bool,
    /// Line number of the first visible line of the text area.
    scroll: usize,
}

impl QueryFormComponent {
    pub fn new(input: QueryInput) -> Self {
        let cursor = input.text().len();
        let submit_disabled = input.is_blank();
        let mut this = Self {
            input,
            cursor,
            editing: true,
            loading: false,
            submit_disabled,
            scroll: 0,
        };
        this.ensure_cursor_visible();
        this
    }

    /// Whether this component wants to capture raw key input.
    pub fn wants_input(&self) -> bool {
        self.editing
    }

    /// Clamp cursor to a valid char boundary in the text.
    fn clamp_cursor(&mut self) {
        let text = self.input.text();
        let mut cursor = self.cursor.min(text.len());
        while !text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    fn insert_char(&mut self, c: char) {
        self.clamp_cursor();
        let cursor = self.cursor;
        self.input.text_mut().insert(cursor, c);
        self.cursor += c.len_utf8();
    }

    fn insert_str(&mut self, s: &str) {
        self.clamp_cursor();
        let cursor = self.cursor;
        self.input.text_mut().insert_str(cursor, s);
        self.cursor += s.len();
        self.ensure_cursor_visible();
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        self.clamp_cursor();
        if self.cursor > 0 {
            let cursor = self.cursor;
            let text = self.input.text_mut();
            let prev = text[..cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            text.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the word before the cursor (Ctrl+W).
    fn delete_word(&mut self) {
        self.clamp_cursor();
        let cursor = self.cursor;
        let text = self.input.text_mut();
        let before = &text[..cursor];
        let trimmed = before.trim_end_matches(char::is_whitespace);
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        text.drain(start..cursor);
        self.cursor = start;
    }

    fn cursor_left(&mut self) {
        self.clamp_cursor();
        if let Some((i, _)) = self.input.text()[..self.cursor].char_indices().next_back() {
            self.cursor = i;
        }
    }

    fn cursor_right(&mut self) {
        self.clamp_cursor();
        if let Some(c) = self.input.text()[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Line number and byte column of the cursor.
    fn cursor_line_col(&self) -> (usize, usize) {
        let text = self.input.text();
        let cursor = self.cursor.min(text.len());
        let before = &text[..cursor];
        let line = before.matches('\n').count();
        let col = before.rfind('\n').map(|p| cursor - p - 1).unwrap_or(cursor);
        (line, col)
    }

    /// Keep the cursor's line inside the viewport. Assumes at least four
    /// visible lines; render clamps further.
    fn ensure_cursor_visible(&mut self) {
        let (line, _) = self.cursor_line_col();
        let estimated_viewport = 4usize;
        if line < self.scroll {
            self.scroll = line;
        }
        if line >= self.scroll + estimated_viewport {
            self.scroll = line.saturating_sub(estimated_viewport - 1);
        }
    }

    fn render_text_area(&self, frame: &mut Frame, area: Rect) {
        let focused = self.editing;
        let text = self.input.text();
        let title = if text.is_empty() {
            " What do you want to learn? ".to_string()
        } else {
            format!(" What do you want to learn? ({} chars) ", text.chars().count())
        };
        let block = Block::default()
            .title(title)
            .title_style(if focused { Theme::key_hint() } else { Theme::muted() })
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(Theme::accent())
            } else {
                Theme::border()
            });

        if text.is_empty() && !focused {
            let placeholder = Paragraph::new(Span::styled(PLACEHOLDER, Theme::dim()))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let (cursor_line, cursor_col) = self.cursor_line_col();
        let lines: Vec<Line> = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                if !focused || i != cursor_line {
                    return Line::from(Span::styled(line, Theme::normal()));
                }
                let (before, after) = line.split_at(cursor_col.min(line.len()));
                let mut chars = after.chars();
                let cursor_char = chars.next().map(String::from).unwrap_or_else(|| " ".into());
                Line::from(vec![
                    Span::styled(before, Theme::normal()),
                    Span::styled(cursor_char, Theme::cursor()),
                    Span::styled(chars.as_str(), Theme::normal()),
                ])
            })
            .collect();

        let viewport = block.inner(area).height as usize;
        let mut scroll = self.scroll;
        if viewport > 0 && cursor_line >= scroll + viewport {
            scroll = cursor_line + 1 - viewport;
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll as u16, 0))
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn provider_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled("  AI model: ", Theme::header())];
        for provider in Provider::all() {
            let chosen = *provider == self.input.provider();
            let (mark, style) = if chosen {
                ("(•) ", Theme::selected())
            } else {
                ("( ) ", Theme::muted())
            };
            spans.push(Span::styled(mark, style));
            spans.push(Span::styled(provider.label(), style));
            spans.push(Span::raw("   "));
        }
        Line::from(spans)
    }

    fn submit_line(&self) -> Line<'static> {
        let (label, style) = if self.loading {
            (BUSY_LABEL, Theme::button_disabled())
        } else if self.submit_disabled {
            (SUBMIT_LABEL, Theme::button_disabled())
        } else {
            (SUBMIT_LABEL, Theme::button())
        };
        Line::from(vec![Span::raw("  "), Span::styled(label, style)])
    }

    fn hint_line(&self) -> Line<'static> {
        if self.editing {
            Line::from(vec![
                Span::styled("  ctrl+s", Theme::key_hint()),
                Span::styled(" submit  ", Theme::dim()),
                Span::styled("tab", Theme::key_hint()),
                Span::styled(" switch model  ", Theme::dim()),
                Span::styled("esc", Theme::key_hint()),
                Span::styled(" leave text", Theme::dim()),
            ])
        } else {
            Line::from(vec![
                Span::styled("  enter", Theme::key_hint()),
                Span::styled(" submit  ", Theme::dim()),
                Span::styled("i", Theme::key_hint()),
                Span::styled(" edit  ", Theme::dim()),
                Span::styled("l/g", Theme::key_hint()),
                Span::styled(" model  ", Theme::dim()),
                Span::styled("j/k", Theme::key_hint()),
                Span::styled(" scroll", Theme::dim()),
            ])
        }
    }
}

impl Component for QueryFormComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::StartEditing => {
                self.editing = true;
                None
            }
            Action::StopEditing => {
                self.editing = false;
                None
            }
            Action::CharInput(c) => {
                self.insert_char(*c);
                None
            }
            Action::BackspaceInput => {
                self.delete_char();
                self.ensure_cursor_visible();
                None
            }
            Action::DeleteWord => {
                self.delete_word();
                self.ensure_cursor_visible();
                None
            }
            Action::NewlineInput => {
                self.insert_char('\n');
                self.ensure_cursor_visible();
                None
            }
            Action::PasteBulk(text) => {
                if !text.is_empty() {
                    // Terminals deliver pasted line breaks as \r.
                    self.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
                }
                None
            }
            Action::CursorLeft => {
                self.cursor_left();
                self.ensure_cursor_visible();
                None
            }
            Action::CursorRight => {
                self.cursor_right();
                self.ensure_cursor_visible();
                None
            }
            Action::ToggleProvider => {
                self.input.toggle_provider();
                None
            }
            Action::SelectProvider(provider) => {
                self.input.set_provider(*provider);
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Min(4),    // Text area
            Constraint::Length(1), // Provider selector
            Constraint::Length(1), // Submit control
            Constraint::Length(1), // Key hints
        ])
        .split(area);

        self.render_text_area(frame, chunks[0]);
        frame.render_widget(Paragraph::new(self.provider_line()), chunks[1]);
        frame.render_widget(Paragraph::new(self.submit_line()), chunks[2]);
        frame.render_widget(Paragraph::new(self.hint_line()), chunks[3]);
    }
}
