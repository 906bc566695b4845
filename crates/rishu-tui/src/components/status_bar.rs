//! Status bar at the bottom of the TUI.

use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use rishu_core::Provider;

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

pub struct StatusBarComponent {
    /// Current status message.
    pub message: String,
    /// Provider currently selected in the form.
    pub provider: Provider,
    /// When the latest submission resolved.
    pub updated_at: Option<DateTime<Local>>,
}

impl StatusBarComponent {
    pub fn new() -> Self {
        Self {
            message: "Type what you want to learn, then press ctrl+s.".to_string(),
            provider: Provider::default(),
            updated_at: None,
        }
    }
}

impl Component for StatusBarComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::SetStatus(msg) => {
                self.message = msg.clone();
                None
            }
            Action::ClearStatus => {
                self.message.clear();
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;

        // Right side: compact key hints
        let hints = "q·?·ctrl+s";
        let hints_len = hints.chars().count() + 1;

        let badge = self.provider.as_str();
        let badge_len = badge.len() + 2;

        let updated = self
            .updated_at
            .map(|t| format!("updated {}", t.format("%H:%M:%S")))
            .unwrap_or_default();
        let updated_len = if updated.is_empty() { 0 } else { updated.len() + 2 };

        // Truncate message to remaining space, on a char boundary.
        let msg_budget = width
            .saturating_sub(badge_len)
            .saturating_sub(hints_len)
            .saturating_sub(updated_len)
            .saturating_sub(4);
        let msg_width = self.message.chars().count();
        let msg = if msg_width > msg_budget {
            if msg_budget > 3 {
                let kept: String = self.message.chars().take(msg_budget - 3).collect();
                format!("{kept}...")
            } else {
                String::new()
            }
        } else {
            self.message.clone()
        };

        // Pad to push hints to the right edge
        let used = badge_len + 2 + msg.chars().count() + updated_len;
        let pad = width.saturating_sub(used + hints_len);

        let line = Line::from(vec![
            Span::styled(format!(" {} ", badge), Theme::muted()),
            Span::styled("  ", Theme::dim()),
            Span::styled(msg, Theme::status_bar()),
            Span::raw(" ".repeat(pad)),
            Span::styled(
                if updated.is_empty() {
                    String::new()
                } else {
                    format!("{updated}  ")
                },
                Theme::dim(),
            ),
            Span::styled(hints, Theme::key_hint()),
            Span::raw(" "),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::buffer_to_string;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn long_messages_are_truncated() {
        let mut bar = StatusBarComponent::new();
        bar.handle_action(&Action::SetStatus("x".repeat(200)));

        let mut terminal = Terminal::new(TestBackend::new(50, 1)).expect("terminal");
        terminal
            .draw(|frame| bar.render(frame, frame.area()))
            .expect("draw");
        let screen = buffer_to_string(terminal.backend().buffer());

        assert!(screen.contains("..."));
        assert!(screen.trim_end().ends_with("q·?·ctrl+s"));
        assert!(screen.starts_with(" local "));
    }
}
