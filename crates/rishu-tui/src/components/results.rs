//! Result regions: error, AI comment and candidate course list.
//!
//! Renders whatever [`ResultView`] the App last derived from the query
//! controller; it holds no lifecycle state of its own.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use rishu_core::{CourseEntry, ResultView};

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

/// Braille spinner frames.
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct ResultsComponent {
    view: ResultView,
    /// Scroll offset in rendered lines.
    scroll: u16,
    spinner_tick: usize,
}

impl ResultsComponent {
    pub fn new() -> Self {
        Self {
            view: ResultView::Empty,
            scroll: 0,
            spinner_tick: 0,
        }
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    /// Replace the view. Scrolling restarts at the top when it changes.
    pub fn set_view(&mut self, view: ResultView) {
        if self.view != view {
            self.view = view;
            self.scroll = 0;
        }
    }

    fn course_lines(entry: &CourseEntry) -> Vec<Line<'_>> {
        let mut heading = vec![
            Span::styled(format!("{:>2}. ", entry.rank), Theme::dim()),
            Span::styled(entry.title.as_str(), Theme::header()),
        ];
        if let Some(code) = &entry.code {
            heading.push(Span::styled(format!(" ({code})"), Theme::muted()));
        }

        let mut lines = vec![Line::from(heading)];
        if let Some(meta) = &entry.meta {
            lines.push(Line::from(Span::styled(format!("    {meta}"), Theme::muted())));
        }
        lines.push(Line::from(vec![
            Span::styled("    similarity: ", Theme::dim()),
            Span::styled(
                entry.similarity.as_str(),
                Style::default().fg(Theme::score_color(entry.score, 1.0)),
            ),
        ]));
        lines.push(Line::from(""));
        lines
    }

    /// Lines for a successful result; empty sections are left out.
    fn result_lines<'a>(summary: &'a Option<String>, courses: &'a [CourseEntry]) -> Vec<Line<'a>> {
        let mut lines = Vec::new();
        if let Some(summary) = summary {
            lines.push(Line::from(Span::styled("AI comment", Theme::title())));
            lines.extend(
                summary
                    .lines()
                    .map(|l| Line::from(Span::styled(l, Theme::normal()))),
            );
            lines.push(Line::from(""));
        }
        if !courses.is_empty() {
            lines.push(Line::from(Span::styled(
                "Candidate courses (by similarity)",
                Theme::title(),
            )));
            for entry in courses {
                lines.extend(Self::course_lines(entry));
            }
        }
        lines
    }

    /// Unwrapped line count of the scrollable view.
    fn line_count(&self) -> u16 {
        match &self.view {
            ResultView::Results { summary, courses } => {
                u16::try_from(Self::result_lines(summary, courses).len()).unwrap_or(u16::MAX)
            }
            _ => 0,
        }
    }
}

impl Component for ResultsComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::Tick => {
                if matches!(self.view, ResultView::Busy { .. }) {
                    self.spinner_tick = self.spinner_tick.wrapping_add(1);
                }
                None
            }
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            Action::ScrollDown => {
                // Keep at least the last line on screen.
                let last = self.line_count().saturating_sub(1);
                self.scroll = self.scroll.saturating_add(1).min(last);
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border());

        match &self.view {
            ResultView::Empty => {
                let hint = Paragraph::new(Span::styled(
                    "  Describe your interests above and ask the AI for course suggestions.",
                    Theme::dim(),
                ))
                .block(block);
                frame.render_widget(hint, area);
            }
            ResultView::Busy { provider } => {
                let spinner = SPINNER[self.spinner_tick % SPINNER.len()];
                let line = Line::from(vec![
                    Span::styled(
                        format!(" {spinner} "),
                        Style::default().fg(Theme::warning()),
                    ),
                    Span::styled(
                        format!("Searching courses with {}...", provider.label()),
                        Style::default()
                            .fg(Theme::warning())
                            .add_modifier(Modifier::ITALIC),
                    ),
                ]);
                frame.render_widget(Paragraph::new(line).block(block), area);
            }
            ResultView::Error(message) => {
                let err = Paragraph::new(Span::styled(message.as_str(), Theme::error_text()))
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(Theme::error())),
                    );
                frame.render_widget(err, area);
            }
            ResultView::Results { summary, courses } => {
                let lines = Self::result_lines(summary, courses);
                let paragraph = Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((self.scroll, 0))
                    .block(block);
                frame.render_widget(paragraph, area);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::buffer_to_string;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use rishu_core::presenter::format_similarity;
    use rishu_core::Provider;

    fn entry(rank: usize, title: &str, code: Option<&str>, meta: Option<&str>, score: f64) -> CourseEntry {
        CourseEntry {
            rank,
            title: title.to_string(),
            code: code.map(String::from),
            meta: meta.map(String::from),
            similarity: format_similarity(score),
            score,
        }
    }

    fn draw(results: &ResultsComponent) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).expect("terminal");
        terminal
            .draw(|frame| results.render(frame, frame.area()))
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn renders_courses_in_order_with_scores() {
        let mut results = ResultsComponent::new();
        results.set_view(ResultView::Results {
            summary: Some("Start with tourism basics.".into()),
            courses: vec![
                entry(1, "Intro to Tourism", Some("TOU101"), Some("2024 / Spring"), 0.873),
                entry(2, "Regional Planning", None, None, 0.5),
            ],
        });

        let screen = draw(&results);
        let first = screen.find("Intro to Tourism (TOU101)").expect("first course");
        let second = screen.find("Regional Planning").expect("second course");
        assert!(first < second);
        assert!(screen.contains("AI comment"));
        assert!(screen.contains("similarity: 0.873"));
        assert!(screen.contains("similarity: 0.500"));
        assert!(screen.contains("2024 / Spring"));
    }

    #[test]
    fn no_summary_section_without_summary() {
        let mut results = ResultsComponent::new();
        results.set_view(ResultView::Results {
            summary: None,
            courses: vec![entry(1, "Statistics", None, None, 0.1)],
        });

        let screen = draw(&results);
        assert!(!screen.contains("AI comment"));
        assert!(screen.contains("Candidate courses"));
    }

    #[test]
    fn error_view_shows_only_the_message() {
        let mut results = ResultsComponent::new();
        results.set_view(ResultView::Error("An error occurred: HTTP error: 500".into()));

        let screen = draw(&results);
        assert!(screen.contains("An error occurred: HTTP error: 500"));
        assert!(!screen.contains("Candidate courses"));
    }

    #[test]
    fn busy_view_shows_spinner_text() {
        let mut results = ResultsComponent::new();
        results.set_view(ResultView::Busy {
            provider: Provider::Gemini,
        });
        assert!(draw(&results).contains("Searching courses with Gemini..."));
    }

    #[test]
    fn new_view_resets_scroll() {
        let mut results = ResultsComponent::new();
        results.set_view(ResultView::Results {
            summary: Some("a".into()),
            courses: vec![],
        });
        results.handle_action(&Action::ScrollDown);
        assert_eq!(results.scroll, 1);

        results.set_view(ResultView::Empty);
        assert_eq!(results.scroll, 0);
    }

    #[test]
    fn scrolling_stops_at_the_last_line() {
        let mut results = ResultsComponent::new();
        // "AI comment", "a", blank separator.
        results.set_view(ResultView::Results {
            summary: Some("a".into()),
            courses: vec![],
        });
        for _ in 0..10 {
            results.handle_action(&Action::ScrollDown);
        }
        assert_eq!(results.scroll, 2);

        results.set_view(ResultView::Empty);
        results.handle_action(&Action::ScrollDown);
        assert_eq!(results.scroll, 0);
    }
}
