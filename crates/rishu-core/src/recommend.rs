use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::RequestError;
use crate::query::RecommendRequest;

/// One ranked course recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Identifier, unique within a response.
    pub id: i64,

    /// Course code (e.g. "TOU101").
    pub code: Option<String>,

    pub title: Option<String>,

    /// Instructor name.
    pub teacher: Option<String>,

    /// Academic year the course is offered.
    pub year: Option<i64>,

    /// Term label as the backend sends it.
    pub semester: Option<String>,

    pub faculty: Option<String>,

    /// Not rendered.
    pub credits: Option<f64>,

    /// Relevance score; responses arrive sorted by this, descending.
    pub similarity: f64,
}

/// Decoded success payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendResult {
    /// Narrative commentary; empty means there is none.
    #[serde(default)]
    pub summary: String,

    /// Courses in backend order.
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Something that can answer a recommendation request.
///
/// Implemented over HTTP by `rishu-client`; tests use in-memory fakes.
pub trait RecommendBackend {
    fn recommend(
        &self,
        request: RecommendRequest,
    ) -> impl Future<Output = Result<RecommendResult, RequestError>> + Send;
}
