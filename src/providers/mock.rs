/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with generated text
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::failing_for(marker)` - Fails only for prompts containing a marker
 * - `MockProvider::empty()` - Simulates a response with no text content
 * - `MockProvider::upload_failing()` - Fails during upload/indexing, before generation
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{GenerationProvider, GenerationRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a generated report
    Working,
    /// Always fails with an API error
    Failing,
    /// Fails only when the request prompt contains the marker
    FailingFor {
        /// Substring that triggers a failure
        marker: String,
    },
    /// Simulates a transport-successful call whose response carries no text
    Empty,
    /// Simulates an upload/indexing failure before any generation call
    UploadFailing,
}

/// Mock provider for testing batch orchestration behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of generate calls made
    generate_count: Arc<AtomicUsize>,
    /// Number of stores created
    store_count: Arc<AtomicUsize>,
    /// Number of stores deleted
    delete_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&GenerationRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            generate_count: Arc::new(AtomicUsize::new(0)),
            store_count: Arc::new(AtomicUsize::new(0)),
            delete_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails only for prompts containing `marker`
    pub fn failing_for(marker: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailingFor {
            marker: marker.into(),
        })
    }

    /// Create a mock whose responses carry no text content
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock whose uploads never reach a ready indexing status
    pub fn upload_failing() -> Self {
        Self::new(MockBehavior::UploadFailing)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&GenerationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of generate calls made so far
    pub fn generate_calls(&self) -> usize {
        self.generate_count.load(Ordering::SeqCst)
    }

    /// Number of stores created so far
    pub fn stores_created(&self) -> usize {
        self.store_count.load(Ordering::SeqCst)
    }

    /// Number of stores deleted so far
    pub fn stores_deleted(&self) -> usize {
        self.delete_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            generate_count: Arc::clone(&self.generate_count),
            store_count: Arc::clone(&self.store_count),
            delete_count: Arc::clone(&self.delete_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn create_store(&self, name: &str) -> Result<String, ProviderError> {
        let count = self.store_count.fetch_add(1, Ordering::SeqCst);
        Ok(format!("vs_mock_{}_{}", count, name.len()))
    }

    async fn upload_and_index(
        &self,
        _store_id: &str,
        path: &Path,
    ) -> Result<String, ProviderError> {
        if !path.exists() {
            return Err(ProviderError::RequestFailed(format!(
                "Upload source does not exist: {:?}",
                path
            )));
        }
        if self.behavior == MockBehavior::UploadFailing {
            return Err(ProviderError::IndexingTimeout { attempts: 30 });
        }
        Ok("file_mock".to_string())
    }

    async fn delete_store(
        &self,
        _store_id: &str,
        _file_id: Option<&str>,
    ) -> Result<(), ProviderError> {
        self.delete_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        self.generate_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => {
                let text = if let Some(generator) = self.custom_response {
                    generator(&request)
                } else {
                    format!("# Report\n\nGenerated with {}", request.model)
                };
                Ok(text)
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::FailingFor { marker } => {
                if request.prompt.contains(marker) {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated failure for prompt containing {:?}", marker),
                    })
                } else {
                    Ok(format!("# Report\n\nGenerated with {}", request.model))
                }
            }

            MockBehavior::Empty => Err(ProviderError::NoTextContent),

            // Upload failures happen before generation is ever reached
            MockBehavior::UploadFailing => Err(ProviderError::RequestFailed(
                "generate called after a failed upload".to_string(),
            )),
        }
    }
}
