//! Query lifecycle: `idle -> submitting -> (success | failure)`.
//!
//! The controller is the only place that issues a recommendation request.
//! An event-loop host calls [`QueryController::begin`], runs the returned
//! request on its own task and feeds the outcome back through
//! [`QueryController::complete`]. Straight-line callers use
//! [`QueryController::submit`], which does all three.
//!
//! The in-flight guard is the `Submitting` variant itself: while it holds,
//! further submissions are rejected rather than queued.

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::RequestError;
use crate::query::{Provider, QueryInput, RecommendRequest};
use crate::recommend::{RecommendBackend, RecommendResult};

/// Where the latest submission stands. Each variant carries only the data
/// valid in that state, so "loading with an error" cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleStatus {
    /// Nothing submitted yet.
    Idle,
    /// A request is in flight.
    Submitting {
        id: Uuid,
        provider: Provider,
        started_at: DateTime<Local>,
    },
    /// The latest request returned a result.
    Success {
        result: RecommendResult,
        completed_at: DateTime<Local>,
    },
    /// The latest request failed.
    Failure {
        message: String,
        completed_at: DateTime<Local>,
    },
}

impl LifecycleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LifecycleStatus::Idle => "idle",
            LifecycleStatus::Submitting { .. } => "submitting",
            LifecycleStatus::Success { .. } => "success",
            LifecycleStatus::Failure { .. } => "failure",
        }
    }

    /// When the latest submission resolved, if it has.
    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        match self {
            LifecycleStatus::Success { completed_at, .. }
            | LifecycleStatus::Failure { completed_at, .. } => Some(*completed_at),
            _ => None,
        }
    }
}

/// A submission accepted by [`QueryController::begin`] that still has to be
/// sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub id: Uuid,
    pub request: RecommendRequest,
}

#[derive(Debug)]
pub struct QueryController {
    status: LifecycleStatus,
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryController {
    pub fn new() -> Self {
        Self {
            status: LifecycleStatus::Idle,
        }
    }

    pub fn status(&self) -> &LifecycleStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LifecycleStatus::Submitting { .. })
    }

    /// Whether the submit control should be disabled for this input.
    pub fn submit_disabled(&self, input: &QueryInput) -> bool {
        self.is_loading() || input.is_blank()
    }

    /// Accept a submission and enter `Submitting`, dropping any previous
    /// result or error. Returns `None` (and changes nothing) when the input is
    /// blank or another submission is still in flight.
    pub fn begin(&mut self, input: &QueryInput) -> Option<PendingSubmission> {
        if input.is_blank() {
            debug!("Ignoring submit: query is blank");
            return None;
        }
        if let LifecycleStatus::Submitting { id, .. } = &self.status {
            debug!(in_flight = %id, "Ignoring submit: a request is already in flight");
            return None;
        }

        let id = Uuid::new_v4();
        let request = input.to_request();
        info!(
            submission = %id,
            provider = %request.provider,
            chars = request.query.chars().count(),
            "Submitting recommendation query"
        );
        self.status = LifecycleStatus::Submitting {
            id,
            provider: request.provider,
            started_at: Local::now(),
        };
        Some(PendingSubmission { id, request })
    }

    /// Apply the outcome of submission `id`. Outcomes for anything other than
    /// the in-flight submission are discarded; returns whether it was applied.
    pub fn complete(
        &mut self,
        id: Uuid,
        outcome: Result<RecommendResult, RequestError>,
    ) -> bool {
        match &self.status {
            LifecycleStatus::Submitting { id: current, .. } if *current == id => {}
            _ => {
                warn!(submission = %id, state = self.status.label(), "Discarding stale response");
                return false;
            }
        }

        let completed_at = Local::now();
        self.status = match outcome {
            Ok(result) => {
                info!(
                    submission = %id,
                    courses = result.courses.len(),
                    has_summary = !result.summary.is_empty(),
                    "Recommendation received"
                );
                LifecycleStatus::Success {
                    result,
                    completed_at,
                }
            }
            Err(e) => {
                warn!(submission = %id, error = %e, "Recommendation request failed");
                LifecycleStatus::Failure {
                    message: e.user_message(),
                    completed_at,
                }
            }
        };
        true
    }

    /// Run one whole submission against `backend`. Returns `false` without
    /// calling the backend when the preconditions of [`Self::begin`] fail.
    pub async fn submit<B: RecommendBackend>(&mut self, input: &QueryInput, backend: &B) -> bool {
        let Some(pending) = self.begin(input) else {
            return false;
        };
        let outcome = backend.recommend(pending.request).await;
        self.complete(pending.id, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::Course;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend that replays a fixed outcome and records what it was sent.
    struct FakeBackend {
        outcome: Result<RecommendResult, RequestError>,
        calls: AtomicUsize,
        last_request: Mutex<Option<RecommendRequest>>,
    }

    impl FakeBackend {
        fn new(outcome: Result<RecommendResult, RequestError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RecommendBackend for FakeBackend {
        async fn recommend(
            &self,
            request: RecommendRequest,
        ) -> Result<RecommendResult, RequestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            self.outcome.clone()
        }
    }

    fn course(id: i64, similarity: f64) -> Course {
        Course {
            id,
            code: None,
            title: Some(format!("Course {id}")),
            teacher: None,
            year: None,
            semester: None,
            faculty: None,
            credits: None,
            similarity,
        }
    }

    fn sample_result() -> RecommendResult {
        RecommendResult {
            summary: "Start with the fundamentals.".to_string(),
            courses: vec![course(1, 0.9), course(2, 0.5)],
        }
    }

    #[tokio::test]
    async fn blank_input_never_calls_backend() {
        let backend = FakeBackend::new(Ok(sample_result()));
        let mut controller = QueryController::new();

        for text in ["", "   ", "\n\t"] {
            let input = QueryInput::new(text, Provider::Local);
            assert!(!controller.submit(&input, &backend).await);
        }

        assert_eq!(backend.calls(), 0);
        assert_eq!(controller.status(), &LifecycleStatus::Idle);
    }

    #[tokio::test]
    async fn successful_submit_stores_result() {
        let backend = FakeBackend::new(Ok(sample_result()));
        let mut controller = QueryController::new();
        let input = QueryInput::new("観光の基礎を学びたい", Provider::Gemini);

        assert!(controller.submit(&input, &backend).await);

        assert_eq!(backend.calls(), 1);
        let sent = backend.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent, input.to_request());
        match controller.status() {
            LifecycleStatus::Success { result, .. } => assert_eq!(result, &sample_result()),
            other => panic!("expected success, got {other:?}"),
        }
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn failure_replaces_previous_result() {
        let mut controller = QueryController::new();
        let input = QueryInput::new("regional planning", Provider::Local);

        let ok = FakeBackend::new(Ok(sample_result()));
        controller.submit(&input, &ok).await;

        let down = FakeBackend::new(Err(RequestError::Transport(
            "error sending request: connection refused".into(),
        )));
        assert!(controller.submit(&input, &down).await);

        match controller.status() {
            LifecycleStatus::Failure { message, .. } => assert_eq!(
                message,
                "An error occurred: error sending request: connection refused"
            ),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn guard_is_released_after_failure() {
        let mut controller = QueryController::new();
        let input = QueryInput::new("statistics", Provider::Local);

        let failing = FakeBackend::new(Err(RequestError::Status(500)));
        controller.submit(&input, &failing).await;
        assert!(!controller.is_loading());

        let ok = FakeBackend::new(Ok(RecommendResult::default()));
        assert!(controller.submit(&input, &ok).await);
        assert_eq!(ok.calls(), 1);
    }

    #[test]
    fn second_begin_while_in_flight_is_rejected() {
        let mut controller = QueryController::new();
        let input = QueryInput::new("marketing", Provider::Local);

        let first = controller.begin(&input).expect("first submit accepted");
        let before = controller.status().clone();

        assert!(controller.begin(&input).is_none());
        assert_eq!(controller.status(), &before);
        assert!(controller.submit_disabled(&input));

        assert!(controller.complete(first.id, Ok(RecommendResult::default())));
        assert!(!controller.submit_disabled(&input));
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut controller = QueryController::new();
        let input = QueryInput::new("law", Provider::Local);

        let first = controller.begin(&input).unwrap();
        controller.complete(first.id, Err(RequestError::Status(503)));
        assert_eq!(controller.status().label(), "failure");

        let second = controller.begin(&input).unwrap();
        assert!(matches!(
            controller.status(),
            LifecycleStatus::Submitting { id, provider: Provider::Local, .. } if *id == second.id
        ));
        assert!(controller.status().completed_at().is_none());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut controller = QueryController::new();
        let input = QueryInput::new("economics", Provider::Gemini);

        let pending = controller.begin(&input).unwrap();
        assert!(!controller.complete(Uuid::new_v4(), Err(RequestError::Unknown)));
        assert!(controller.is_loading());

        assert!(controller.complete(pending.id, Ok(sample_result())));
        // A duplicate delivery after resolution changes nothing.
        assert!(!controller.complete(pending.id, Err(RequestError::Unknown)));
        assert_eq!(controller.status().label(), "success");
    }

    #[test]
    fn complete_without_submission_is_ignored() {
        let mut controller = QueryController::new();
        assert!(!controller.complete(Uuid::new_v4(), Ok(sample_result())));
        assert_eq!(controller.status(), &LifecycleStatus::Idle);
    }
}
