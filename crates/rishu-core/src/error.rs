use thiserror::Error;

#[derive(Error, Debug)]
pub enum RishuError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RishuError>;

/// Why a recommendation request did not produce a result.
///
/// Only these reach the query controller, which turns them into a
/// failure message instead of propagating them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request could not be completed (unreachable host, reset, ...).
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a status outside the success range.
    #[error("HTTP error: {0}")]
    Status(u16),

    /// Failed without any description.
    #[error("")]
    Unknown,
}

impl RequestError {
    /// Human-readable message for the error region.
    pub fn user_message(&self) -> String {
        let detail = self.to_string();
        if detail.trim().is_empty() {
            "An error occurred (details unknown).".to_string()
        } else {
            format!("An error occurred: {detail}")
        }
    }
}
