pub mod config;
pub mod error;
pub mod lifecycle;
pub mod presenter;
pub mod query;
pub mod recommend;

pub use config::RishuConfig;
pub use error::{RequestError, Result, RishuError};
pub use lifecycle::{LifecycleStatus, PendingSubmission, QueryController};
pub use presenter::{present, CourseEntry, ResultView};
pub use query::{Provider, QueryInput, RecommendRequest, TOP_K};
pub use recommend::{Course, RecommendBackend, RecommendResult};
