//! Pure projection of the lifecycle status into what the result regions show.

use crate::lifecycle::LifecycleStatus;
use crate::query::Provider;
use crate::recommend::Course;

/// Shown in place of a missing course title.
pub const UNTITLED: &str = "(untitled)";

/// Joins the teacher / year / semester / faculty parts of a course.
pub const META_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    /// Nothing submitted yet.
    Empty,
    /// Request in flight.
    Busy { provider: Provider },
    /// Latest request failed.
    Error(String),
    Results {
        /// `None` when the backend sent no commentary.
        summary: Option<String>,
        courses: Vec<CourseEntry>,
    },
}

/// One course, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseEntry {
    /// 1-based position in the backend's order.
    pub rank: usize,
    pub title: String,
    pub code: Option<String>,
    /// Teacher, year, semester and faculty; `None` when all are missing.
    pub meta: Option<String>,
    /// Always three decimal places.
    pub similarity: String,
    /// Raw similarity, for styling.
    pub score: f64,
}

pub fn present(status: &LifecycleStatus) -> ResultView {
    match status {
        LifecycleStatus::Idle => ResultView::Empty,
        LifecycleStatus::Submitting { provider, .. } => ResultView::Busy {
            provider: *provider,
        },
        LifecycleStatus::Failure { message, .. } => ResultView::Error(message.clone()),
        LifecycleStatus::Success { result, .. } => ResultView::Results {
            summary: non_empty(Some(&result.summary)),
            courses: result
                .courses
                .iter()
                .enumerate()
                .map(|(i, c)| CourseEntry::from_course(i + 1, c))
                .collect(),
        },
    }
}

pub fn format_similarity(similarity: f64) -> String {
    format!("{:.3}", similarity)
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

impl CourseEntry {
    pub fn from_course(rank: usize, course: &Course) -> Self {
        let mut parts = Vec::new();
        if let Some(teacher) = non_empty(course.teacher.as_ref()) {
            parts.push(format!("Teacher: {teacher}"));
        }
        if let Some(year) = course.year {
            parts.push(year.to_string());
        }
        parts.extend(non_empty(course.semester.as_ref()));
        parts.extend(non_empty(course.faculty.as_ref()));

        Self {
            rank,
            title: non_empty(course.title.as_ref()).unwrap_or_else(|| UNTITLED.to_string()),
            code: non_empty(course.code.as_ref()),
            meta: (!parts.is_empty()).then(|| parts.join(META_SEPARATOR)),
            similarity: format_similarity(course.similarity),
            score: course.similarity,
        }
    }

    /// Title followed by the code in parentheses, if any.
    pub fn heading(&self) -> String {
        match &self.code {
            Some(code) => format!("{} ({})", self.title, code),
            None => self.title.clone(),
        }
    }
}

impl ResultView {
    /// Plain-text rendering for non-interactive output.
    pub fn to_plain_text(&self) -> String {
        match self {
            ResultView::Empty => String::new(),
            ResultView::Busy { provider } => format!("Asking {}...\n", provider.label()),
            ResultView::Error(message) => format!("{message}\n"),
            ResultView::Results { summary, courses } => {
                let mut out = String::new();
                if let Some(summary) = summary {
                    out.push_str("AI comment\n");
                    out.push_str(summary);
                    out.push_str("\n\n");
                }
                if !courses.is_empty() {
                    out.push_str("Candidate courses (by similarity)\n");
                    for entry in courses {
                        out.push_str(&format!("{:>2}. {}\n", entry.rank, entry.heading()));
                        if let Some(meta) = &entry.meta {
                            out.push_str(&format!("    {meta}\n"));
                        }
                        out.push_str(&format!("    similarity: {}\n", entry.similarity));
                    }
                }
                out
            }
        }
    }
}
