//! Remote sound generation client
//!
//! POSTs the prompt to the synthesis service and classifies the outcome.
//! Rate limits and server errors are retried with exponential backoff (2 s
//! base, 10 s cap); connection-level failures retry on a shorter schedule
//! (1 s base, 5 s cap); any other 4xx fails immediately. Three attempts
//! total. The client never touches the catalog or the filesystem.

use crate::types::GenerationRequest;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "cuefx/0.1.0";
const DEFAULT_ENDPOINT: &str = "https://api.cuefx.dev/v1/sound-generation";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempt budget including the first try
pub const MAX_ATTEMPTS: u32 = 3;

/// Generation failure, classified for the orchestrator
#[derive(Debug, Error)]
pub enum GenError {
    /// Rate limit, server error, or network failure; retries exhausted
    #[error("Generation service unavailable: {0}")]
    Transient(String),

    /// Bad request or invalid credential; retrying cannot help
    #[error("Generation rejected: {0}")]
    Fatal(String),
}

/// Raw response from the transport layer
#[derive(Debug, Clone)]
pub struct SfxResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Transport seam: one POST of a generation request.
///
/// `Err` means no response arrived at all (connection refused, timeout);
/// HTTP-level failures come back as an `SfxResponse` with their status.
pub trait SfxTransport {
    fn post_generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<SfxResponse, String>>;
}

/// Production transport over reqwest
pub struct HttpTransport {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: String, endpoint: Option<String>) -> Result<Self, GenError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenError::Fatal(format!("HTTP client construction failed: {e}")))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key,
        })
    }
}

impl SfxTransport for HttpTransport {
    async fn post_generate(&self, request: &GenerationRequest) -> Result<SfxResponse, String> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| e.to_string())?.to_vec();
        Ok(SfxResponse { status, body })
    }
}

/// Generation client with retry, backoff, and error classification
pub struct GenerationClient<T> {
    transport: T,
}

impl<T: SfxTransport> GenerationClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Run the generation request to completion, returning raw audio bytes
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<u8>, GenError> {
        let mut last_failure = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            tracing::debug!(
                attempt,
                prompt = %request.prompt_text,
                duration_seconds = request.duration_seconds,
                "Requesting sound generation"
            );

            let backoff = match self.transport.post_generate(request).await {
                Ok(response) if (200..300).contains(&response.status) => {
                    tracing::info!(
                        attempt,
                        bytes = response.body.len(),
                        "Generation succeeded"
                    );
                    return Ok(response.body);
                }
                Ok(response) if response.status == 429 || response.status >= 500 => {
                    last_failure = format!(
                        "service returned {}: {}",
                        response.status,
                        String::from_utf8_lossy(&response.body)
                    );
                    http_backoff(attempt)
                }
                Ok(response) => {
                    // Other 4xx: the request itself is wrong, no retry
                    return Err(GenError::Fatal(format!(
                        "service returned {}: {}",
                        response.status,
                        String::from_utf8_lossy(&response.body)
                    )));
                }
                Err(e) => {
                    last_failure = format!("network failure: {e}");
                    network_backoff(attempt)
                }
            };

            if attempt < MAX_ATTEMPTS {
                tracing::warn!(
                    attempt,
                    wait_ms = backoff.as_millis() as u64,
                    failure = %last_failure,
                    "Generation attempt failed, backing off"
                );
                tokio::time::sleep(backoff).await;
            }
        }

        Err(GenError::Transient(format!(
            "{last_failure} ({MAX_ATTEMPTS} attempts)"
        )))
    }
}

/// Backoff after an HTTP 429/5xx: 2 s, 4 s, ... capped at 10 s
fn http_backoff(attempt: u32) -> Duration {
    Duration::from_millis((2000u64 << (attempt - 1)).min(10_000))
}

/// Backoff after a connection-level failure: 1 s, 2 s, ... capped at 5 s
fn network_backoff(attempt: u32) -> Duration {
    Duration::from_millis((1000u64 << (attempt - 1)).min(5_000))
}
