//! Main application state and render loop.

use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use rishu_core::{present, LifecycleStatus, QueryController, QueryInput, RecommendBackend};

use crate::action::{Action, InputMode};
use crate::components::help::HelpComponent;
use crate::components::query_form::QueryFormComponent;
use crate::components::results::ResultsComponent;
use crate::components::status_bar::StatusBarComponent;
use crate::components::Component;
use crate::event::{self, EventHandler, InputModeFlag};
use crate::theme::Theme;

/// Main application state.
pub struct App<B> {
    /// Whether the app should exit.
    should_quit: bool,
    /// Shared flag to tell the EventHandler which key-mapping to use.
    input_mode_flag: InputModeFlag,

    /// Recommendation backend (shared with request tasks).
    backend: Arc<B>,
    /// Owns the submission lifecycle; the only writer of results.
    controller: QueryController,

    // Components
    query_form: QueryFormComponent,
    results: ResultsComponent,
    status_bar: StatusBarComponent,
    help: HelpComponent,
}

impl<B> App<B>
where
    B: RecommendBackend + Send + Sync + 'static,
{
    pub fn new(backend: B, input: QueryInput) -> Self {
        let mut app = Self {
            should_quit: false,
            input_mode_flag: event::new_input_mode_flag(),
            backend: Arc::new(backend),
            controller: QueryController::new(),
            query_form: QueryFormComponent::new(input),
            results: ResultsComponent::new(),
            status_bar: StatusBarComponent::new(),
            help: HelpComponent::new(),
        };
        app.sync_view();
        app
    }

    pub fn status(&self) -> &LifecycleStatus {
        self.controller.status()
    }

    pub fn input(&self) -> &QueryInput {
        &self.query_form.input
    }

    /// Run the TUI application.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Set up terminal.
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Create the action channel.
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

        // Start the event handler with the shared input mode flag.
        let event_tx = tx.clone();
        let mode_flag = self.input_mode_flag.clone();
        let event_handler = EventHandler::new(event_tx, Duration::from_millis(100), mode_flag);
        tokio::spawn(async move {
            event_handler.run().await;
        });

        self.sync_input_mode();

        // Main loop.
        let result = loop {
            // Render.
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            // Process actions.
            match rx.recv().await {
                Some(action) => {
                    self.handle_action(&action, &tx);
                    if self.should_quit {
                        break Ok(());
                    }
                }
                None => break Ok(()),
            }
        };

        // Restore terminal.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;

        result.map_err(Into::into)
    }

    fn sync_input_mode(&self) {
        event::set_input_mode(&self.input_mode_flag, self.current_input_mode());
    }

    /// What input mode should be active right now?
    fn current_input_mode(&self) -> InputMode {
        // Help overlay keeps normal mode so any key dismisses it.
        if self.help.visible {
            return InputMode::Normal;
        }
        if self.query_form.wants_input() {
            InputMode::Editing
        } else {
            InputMode::Normal
        }
    }

    /// Re-derive everything the components show from the controller.
    fn sync_view(&mut self) {
        self.query_form.loading = self.controller.is_loading();
        self.query_form.submit_disabled = self.controller.submit_disabled(&self.query_form.input);
        self.results.set_view(present(self.controller.status()));
        self.status_bar.provider = self.query_form.input.provider();
        self.status_bar.updated_at = self.controller.status().completed_at();
    }

    /// Dispatch an action to all relevant components.
    pub fn handle_action(&mut self, action: &Action, tx: &mpsc::UnboundedSender<Action>) {
        // While help is open, user input only dismisses it.
        if self.help.visible && !Self::passes_help_overlay(action) {
            self.help.handle_action(action);
            self.sync_input_mode();
            return;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::SubmitQuery => self.submit(tx),
            Action::RecommendFinished { id, outcome } => {
                if self.controller.complete(*id, outcome.clone()) {
                    let msg = match outcome {
                        Ok(result) => format!("Received {} courses", result.courses.len()),
                        Err(_) => "Request failed".to_string(),
                    };
                    let _ = tx.send(Action::SetStatus(msg));
                }
            }
            _ => {}
        }

        let chained = self.query_form.handle_action(action);
        self.results.handle_action(action);
        self.help.handle_action(action);
        self.status_bar.handle_action(action);

        self.sync_view();
        self.sync_input_mode();

        if let Some(chained) = chained {
            self.handle_action(&chained, tx);
        }
    }

    /// Actions that keep flowing while the help overlay is shown.
    fn passes_help_overlay(action: &Action) -> bool {
        matches!(
            action,
            Action::Quit
                | Action::Tick
                | Action::RecommendFinished { .. }
                | Action::SetStatus(_)
                | Action::ClearStatus
        )
    }

    /// Hand the current input to the controller and, if accepted, send the
    /// request on its own task. The outcome comes back as
    /// [`Action::RecommendFinished`].
    fn submit(&mut self, tx: &mpsc::UnboundedSender<Action>) {
        let Some(pending) = self.controller.begin(&self.query_form.input) else {
            let msg = if self.controller.is_loading() {
                "Still waiting for the previous answer"
            } else {
                "Enter what you want to learn first"
            };
            let _ = tx.send(Action::SetStatus(msg.to_string()));
            return;
        };

        let _ = tx.send(Action::SetStatus(format!(
            "Asking {}...",
            pending.request.provider.label()
        )));

        let backend = Arc::clone(&self.backend);
        let tx = tx.clone();
        tokio::spawn(async move {
            let id = pending.id;
            let outcome = backend.recommend(pending.request).await;
            debug!(submission = %id, ok = outcome.is_ok(), "Request task finished");
            if tx.send(Action::RecommendFinished { id, outcome }).is_err() {
                info!(submission = %id, "App closed before the response arrived");
            }
        });
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(2),  // Title
            Constraint::Length(10), // Query form
            Constraint::Min(5),     // Results
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                " Course Registration Recommender AI (search + recommend)",
                Theme::title(),
            )),
            Line::from(Span::styled(
                " Describe your interests and the AI searches courses and explains its picks.",
                Theme::muted(),
            )),
        ]);
        frame.render_widget(title, chunks[0]);

        self.query_form.render(frame, chunks[1]);
        self.results.render(frame, chunks[2]);
        self.status_bar.render(frame, chunks[3]);

        // Overlay.
        self.help.render(frame, area);
    }
}
