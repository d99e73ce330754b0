/*!
 * Provider implementations for remote report generation.
 *
 * This module contains the provider seam the batch orchestrator talks to:
 * - OpenAI: Responses API client with vector-store attachments
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use log::warn;
use std::fmt::Debug;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::errors::ProviderError;

/// Ceiling for the exponential retry backoff, in seconds
const BACKOFF_CAP_SECS: u64 = 8;

/// A single generation request as the orchestrator sees it
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Combined system and user prompt
    pub prompt: String,

    /// Model name to use for generation
    pub model: String,

    /// When set, the request carries a file_search tool scoped to this
    /// vector store instead of inlined transcript text
    pub vector_store_id: Option<String>,
}

impl GenerationRequest {
    /// Create an inline-text request
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            vector_store_id: None,
        }
    }

    /// Scope the request to an indexed vector store via file_search
    pub fn with_vector_store(mut self, store_id: impl Into<String>) -> Self {
        self.vector_store_id = Some(store_id.into());
        self
    }
}

/// Common trait for remote generation providers
///
/// This trait defines the interface the batch orchestrator uses, allowing
/// the real client and test doubles to be used interchangeably.
#[async_trait]
pub trait GenerationProvider: Send + Sync + Debug {
    /// Create a transient indexed store for one file-processing attempt.
    /// Returns the store identifier.
    async fn create_store(&self, name: &str) -> Result<String, ProviderError>;

    /// Upload a file into the store and wait until indexing reports it
    /// ready. Returns the uploaded file's identifier.
    async fn upload_and_index(&self, store_id: &str, path: &Path)
    -> Result<String, ProviderError>;

    /// Release a store and, when known, its uploaded file. Invoked on
    /// every exit path of a file-processing attempt.
    async fn delete_store(
        &self,
        store_id: &str,
        file_id: Option<&str>,
    ) -> Result<(), ProviderError>;

    /// Issue a generation request and return the response text
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError>;
}

/// Backoff delay before retry number `attempt` (1-based):
/// `min(2^attempt, 8)` seconds
pub fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64
        .checked_pow(attempt)
        .unwrap_or(BACKOFF_CAP_SECS)
        .min(BACKOFF_CAP_SECS);
    Duration::from_secs(secs)
}

/// Run a generation call up to `max_retries` times with exponential
/// backoff between attempts. The last error is propagated when the budget
/// is exhausted.
pub async fn retry_generation<F, Fut>(
    max_retries: u32,
    mut call: F,
) -> Result<String, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, ProviderError>>,
{
    let max_attempts = max_retries.max(1);
    let mut last_error = ProviderError::RequestFailed("no attempts made".to_string());

    for attempt in 1..=max_attempts {
        match call().await {
            Ok(text) => return Ok(text),
            Err(e) => {
                if attempt < max_attempts {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "Generation call failed (attempt {}/{}): {}. Retrying in {}s",
                        attempt,
                        max_attempts,
                        e,
                        delay.as_secs()
                    );
                    last_error = e;
                    tokio::time::sleep(delay).await;
                } else {
                    last_error = e;
                }
            }
        }
    }

    Err(last_error)
}

pub mod mock;
pub mod openai;
