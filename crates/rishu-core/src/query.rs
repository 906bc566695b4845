//! The user's query as typed, and the request envelope built from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ranked courses requested from the backend on every submission.
pub const TOP_K: usize = 10;

/// Backend model that writes the recommendation summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Local,
    Gemini,
}

impl Provider {
    pub fn all() -> &'static [Provider] {
        &[Provider::Local, Provider::Gemini]
    }

    /// Wire value sent in the request body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::Gemini => "gemini",
        }
    }

    /// Label shown next to the selector.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Local => "Local LLM-jp (free)",
            Provider::Gemini => "Gemini",
        }
    }

    /// The other option of the two-way selector.
    pub fn toggled(&self) -> Provider {
        match self {
            Provider::Local => Provider::Gemini,
            Provider::Gemini => Provider::Local,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current free text and provider selection. Mutated only by user edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    text: String,
    provider: Provider,
}

impl QueryInput {
    pub fn new(text: impl Into<String>, provider: Provider) -> Self {
        Self {
            text: text.into(),
            provider,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_provider(&mut self, provider: Provider) {
        self.provider = provider;
    }

    pub fn toggle_provider(&mut self) {
        self.provider = self.provider.toggled();
    }

    /// Mutable access for in-place editing by the text area.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// True when there is nothing but whitespace to submit.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Snapshot the input into a request envelope.
    pub fn to_request(&self) -> RecommendRequest {
        RecommendRequest {
            query: self.text.clone(),
            top_k: TOP_K,
            provider: self.provider,
        }
    }
}

/// Body of `POST /recommend`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendRequest {
    pub query: String,
    pub top_k: usize,
    pub provider: Provider,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_provider() {
        let input = QueryInput::default();
        assert_eq!(input.provider(), Provider::Local);
        assert!(input.is_blank());
    }

    #[test]
    fn toggle_switches_between_the_two_providers() {
        let mut input = QueryInput::default();
        input.toggle_provider();
        assert_eq!(input.provider(), Provider::Gemini);
        input.toggle_provider();
        assert_eq!(input.provider(), Provider::Local);
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let input = QueryInput::new(" \n\t ", Provider::Gemini);
        assert!(input.is_blank());
        assert!(!QueryInput::new(" x ", Provider::Local).is_blank());
    }

    #[test]
    fn request_serializes_in_wire_order() {
        let input = QueryInput::new("観光の基礎を学びたい", Provider::Local);
        let body = serde_json::to_string(&input.to_request()).unwrap();
        assert_eq!(
            body,
            r#"{"query":"観光の基礎を学びたい","top_k":10,"provider":"local"}"#
        );
    }

    #[test]
    fn request_keeps_untrimmed_text() {
        let input = QueryInput::new("  regional planning \n", Provider::Gemini);
        let req = input.to_request();
        assert_eq!(req.query, "  regional planning \n");
        assert_eq!(req.provider, Provider::Gemini);
        assert_eq!(req.top_k, TOP_K);
    }
}
