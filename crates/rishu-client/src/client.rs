//! HTTP client for the recommendation service.

use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};

use rishu_core::config::BackendConfig;
use rishu_core::{RecommendBackend, RecommendRequest, RecommendResult, RequestError};

use crate::protocol::{decode_recommend_body, RECOMMEND_PATH};

/// Client for the recommendation API.
#[derive(Debug, Clone)]
pub struct RecommendClient {
    client: Client,
    base_url: String,
}

impl RecommendClient {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.connect_timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the recommend endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, RECOMMEND_PATH)
    }

    /// POST the request and decode the answer. Non-success statuses fail
    /// without reading the body.
    #[instrument(skip(self, request), fields(provider = %request.provider, top_k = request.top_k))]
    pub async fn post_recommend(
        &self,
        request: &RecommendRequest,
    ) -> Result<RecommendResult, RequestError> {
        let url = self.endpoint();
        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            debug!(status = %status, "Backend returned an error status");
            return Err(RequestError::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(transport_error)?;
        let result = decode_recommend_body(&body);
        debug!(
            "Decoded {} courses, summary {} chars",
            result.courses.len(),
            result.summary.chars().count()
        );
        Ok(result)
    }
}

fn transport_error(e: reqwest::Error) -> RequestError {
    let message = e.to_string();
    if message.is_empty() {
        RequestError::Unknown
    } else {
        RequestError::Transport(message)
    }
}

impl RecommendBackend for RecommendClient {
    fn recommend(
        &self,
        request: RecommendRequest,
    ) -> impl Future<Output = Result<RecommendResult, RequestError>> + Send {
        async move { self.post_recommend(&request).await }
    }
}
