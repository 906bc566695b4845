//! Color scheme and styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// The color palette for rishu's TUI: a dark slate base with a sky-blue
/// accent for the focused field and the submit control.
pub struct Theme;

impl Theme {
    // ── Base colors ─────────────────────────────────────────
    pub fn bg() -> Color {
        Color::Reset
    }

    pub fn fg() -> Color {
        Color::Rgb(226, 232, 240)
    }

    pub fn fg_dim() -> Color {
        Color::Rgb(100, 116, 139)
    }

    pub fn fg_muted() -> Color {
        Color::Rgb(148, 163, 184)
    }

    // ── Accent colors ───────────────────────────────────────
    pub fn accent() -> Color {
        Color::Rgb(14, 165, 233)
    }

    pub fn success() -> Color {
        Color::Rgb(80, 200, 120)
    }

    pub fn warning() -> Color {
        Color::Rgb(230, 180, 80)
    }

    pub fn error() -> Color {
        Color::Rgb(248, 113, 113)
    }

    // ── Structural colors ───────────────────────────────────
    pub fn border_color() -> Color {
        Color::Rgb(51, 65, 85)
    }

    pub fn disabled_bg() -> Color {
        Color::Rgb(71, 85, 105)
    }

    // ── Composite styles ────────────────────────────────────

    pub fn title() -> Style {
        Style::default()
            .fg(Self::accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Self::fg()).add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::fg())
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::fg_dim())
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::fg_muted())
    }

    pub fn border() -> Style {
        Style::default().fg(Self::border_color())
    }

    pub fn key_hint() -> Style {
        Style::default().fg(Self::accent())
    }

    pub fn cursor() -> Style {
        Style::default().fg(Self::bg()).bg(Self::accent())
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::fg_muted())
    }

    pub fn button() -> Style {
        Style::default()
            .fg(Color::Rgb(15, 23, 42))
            .bg(Self::accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_disabled() -> Style {
        Style::default().fg(Self::fg_muted()).bg(Self::disabled_bg())
    }

    pub fn error_text() -> Style {
        Style::default().fg(Self::error())
    }

    pub fn score_color(score: f64, max: f64) -> Color {
        let ratio = score / max;
        if ratio >= 0.8 {
            Self::success()
        } else if ratio >= 0.5 {
            Self::warning()
        } else {
            Self::fg_muted()
        }
    }
}
