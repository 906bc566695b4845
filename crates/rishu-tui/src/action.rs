//! Action enum — the central message bus for the TUI.
//! All user interactions and async results flow through here.

use rishu_core::{Provider, RecommendResult, RequestError};
use uuid::Uuid;

/// Every possible action that can occur in the application.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Global ──────────────────────────────────────────────
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,
    /// Display a status message in the status bar.
    SetStatus(String),
    /// Clear the status message.
    ClearStatus,
    /// A tick event for animations.
    Tick,

    // ── Focus ───────────────────────────────────────────────
    /// Focus the query text area.
    StartEditing,
    /// Leave the text area so keys act as shortcuts.
    StopEditing,

    // ── Text Input ──────────────────────────────────────────
    /// A character was typed (only sent when in input mode).
    CharInput(char),
    /// Backspace pressed (only sent when in input mode).
    BackspaceInput,
    /// Delete word (Ctrl+W).
    DeleteWord,
    /// Insert a newline in the query.
    NewlineInput,
    /// Bulk paste from bracketed paste mode.
    PasteBulk(String),
    CursorLeft,
    CursorRight,

    // ── Provider ────────────────────────────────────────────
    /// Switch to the other provider.
    ToggleProvider,
    SelectProvider(Provider),

    // ── Query lifecycle ─────────────────────────────────────
    /// User asked for recommendations.
    SubmitQuery,
    /// The request for submission `id` resolved.
    RecommendFinished {
        id: Uuid,
        outcome: Result<RecommendResult, RequestError>,
    },

    // ── Scrolling ───────────────────────────────────────────
    ScrollUp,
    ScrollDown,
}

/// Whether the app is in a text-input mode where raw keys should
/// be forwarded to the query text area instead of interpreted as
/// global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal mode — keys are global shortcuts.
    Normal,
    /// Text input mode — keys go to the query text area.
    Editing,
}
