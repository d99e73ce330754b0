use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, multipart};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::app_config::RemoteConfig;
use crate::errors::ProviderError;
use crate::providers::{GenerationProvider, GenerationRequest, retry_generation};

/// Interval between indexing-status polls, in seconds
const POLL_INTERVAL_SECS: u64 = 2;

/// Maximum number of indexing-status polls before the upload is considered
/// failed
const POLL_MAX_ATTEMPTS: u32 = 30;

/// File statuses that count as ready for retrieval
const READY_STATUSES: &[&str] = &["completed", "ready", "processed"];

/// OpenAI client for the Responses API and the vector-store file endpoints
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// Remote service configuration (credential, endpoint, model, budgets)
    config: RemoteConfig,
}

/// Responses API request
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    /// The model to use
    model: String,

    /// Single-string prompt input
    input: String,

    /// Tools the model may use while generating
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ResponseTool>>,
}

/// Tool definition attached to a Responses API request
#[derive(Debug, Clone, Serialize)]
pub struct ResponseTool {
    /// The tool type
    #[serde(rename = "type")]
    tool_type: String,

    /// Vector stores the file_search tool may read
    vector_store_ids: Vec<String>,
}

impl ResponsesRequest {
    /// Create a new Responses API request
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            tools: None,
        }
    }

    /// Attach a file_search tool scoped to the given vector store
    pub fn file_search(mut self, vector_store_id: impl Into<String>) -> Self {
        self.tools = Some(vec![ResponseTool {
            tool_type: "file_search".to_string(),
            vector_store_ids: vec![vector_store_id.into()],
        }]);
        self
    }
}

/// Identifier-only payload returned by the create/upload endpoints
#[derive(Debug, Deserialize)]
struct CreatedObject {
    id: String,
}

/// One file entry in a vector store listing
#[derive(Debug, Deserialize)]
struct StoreFileEntry {
    #[serde(default)]
    status: Option<String>,
}

/// Vector store file listing
#[derive(Debug, Deserialize)]
struct StoreFileList {
    #[serde(default)]
    data: Vec<StoreFileEntry>,
}

/// Ordered response-text extraction strategies: the first non-empty result
/// wins. The Responses API has grown several layouts for its output text,
/// so each strategy probes one of them.
const EXTRACTION_STRATEGIES: &[fn(&Value) -> Option<String>] =
    &[extract_convenience_field, extract_structured_segments];

/// Strategy 1: the convenience `output_text` field, when present and
/// non-empty after trimming
fn extract_convenience_field(value: &Value) -> Option<String> {
    let text = value.get("output_text")?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Strategy 2: concatenate nested text segments from the structured
/// `output[].content[]` items, in order
fn extract_structured_segments(value: &Value) -> Option<String> {
    let mut chunks: Vec<&str> = Vec::new();

    for item in value.get("output")?.as_array()? {
        let Some(parts) = item.get("content").and_then(|c| c.as_array()) else {
            continue;
        };
        for part in parts {
            // Both the flat {"text": "..."} and the nested
            // {"text": {"value": "..."}} shapes occur in the wild
            let text = part
                .get("text")
                .and_then(|t| t.as_str().or_else(|| t.get("value").and_then(|v| v.as_str())));
            if let Some(text) = text {
                if !text.is_empty() {
                    chunks.push(text);
                }
            }
        }
    }

    let joined = chunks.concat().trim().to_string();
    if joined.is_empty() { None } else { Some(joined) }
}

/// Extract the response text from a Responses API payload, or fail with a
/// content-shape error when no strategy yields text
pub fn extract_response_text(value: &Value) -> Result<String, ProviderError> {
    EXTRACTION_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(value))
        .ok_or(ProviderError::NoTextContent)
}

impl OpenAI {
    /// Create a new OpenAI client. The credential must already be present
    /// in the configuration; its absence is a fatal configuration error
    /// raised here, before any network attempt.
    pub fn new(config: RemoteConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError(
                "API key is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Ok(Self { client, config })
    }

    /// Generation retry budget carried by this client
    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    /// Map an unsuccessful HTTP response to a provider error
    async fn api_error(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        if status.as_u16() == 401 {
            ProviderError::AuthenticationError(message)
        } else {
            ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            }
        }
    }

    /// Issue a single Responses API call and extract its text
    async fn send_responses_request(
        &self,
        request: &ResponsesRequest,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.url("responses"))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let err = Self::api_error(response).await;
            error!("Responses API error: {}", err);
            return Err(err);
        }

        let value = response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        extract_response_text(&value)
    }

    /// Upload a file to the files endpoint. Returns the file id.
    async fn upload_file(&self, path: &Path) -> Result<String, ProviderError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read {:?}: {}", path, e)))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.txt".to_string());

        let form = multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.url("files"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let created = response
            .json::<CreatedObject>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(created.id)
    }

    /// Best-effort delete of an uploaded file object. A leaked file is worth
    /// a warning, never a per-file failure.
    async fn delete_file(&self, file_id: &str) {
        let result = self
            .client
            .delete(self.url(&format!("files/{}", file_id)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await;
        if let Err(e) = result {
            warn!("Failed to delete uploaded file {}: {}", file_id, e);
        }
    }

    /// Attach an uploaded file to a vector store
    async fn attach_file(&self, store_id: &str, file_id: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(self.url(&format!("vector_stores/{}/files", store_id)))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({ "file_id": file_id }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }

    /// Poll the store's file listing until every constituent file reports a
    /// ready status. Exceeding the poll budget is a hard failure surfaced
    /// as a distinct indexing-timeout error.
    async fn wait_for_indexing(&self, store_id: &str) -> Result<(), ProviderError> {
        for attempt in 1..=POLL_MAX_ATTEMPTS {
            let response = self
                .client
                .get(self.url(&format!("vector_stores/{}/files", store_id)))
                .bearer_auth(&self.config.api_key)
                .send()
                .await
                .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

            if !response.status().is_success() {
                return Err(Self::api_error(response).await);
            }

            let listing = response
                .json::<StoreFileList>()
                .await
                .map_err(|e| ProviderError::ParseError(e.to_string()))?;

            let statuses: Vec<String> = listing
                .data
                .iter()
                .map(|entry| {
                    entry
                        .status
                        .as_deref()
                        .unwrap_or("unknown")
                        .to_lowercase()
                })
                .collect();
            debug!("Indexing poll {}: statuses={:?}", attempt, statuses);

            if !statuses.is_empty()
                && statuses
                    .iter()
                    .all(|status| READY_STATUSES.contains(&status.as_str()))
            {
                return Ok(());
            }

            if attempt < POLL_MAX_ATTEMPTS {
                tokio::time::sleep(Duration::from_secs(POLL_INTERVAL_SECS)).await;
            }
        }

        Err(ProviderError::IndexingTimeout {
            attempts: POLL_MAX_ATTEMPTS,
        })
    }
}

#[async_trait]
impl GenerationProvider for OpenAI {
    async fn create_store(&self, name: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.url("vector_stores"))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let created = response
            .json::<CreatedObject>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        debug!("Created vector store: {}", created.id);
        Ok(created.id)
    }

    async fn upload_and_index(
        &self,
        store_id: &str,
        path: &Path,
    ) -> Result<String, ProviderError> {
        let file_id = self.upload_file(path).await?;

        // Once the upload exists, a failure further down must not orphan it
        let attached = self.attach_file(store_id, &file_id).await;
        let indexed = match attached {
            Ok(()) => self.wait_for_indexing(store_id).await,
            Err(e) => Err(e),
        };
        if let Err(e) = indexed {
            self.delete_file(&file_id).await;
            return Err(e);
        }

        Ok(file_id)
    }

    async fn delete_store(
        &self,
        store_id: &str,
        file_id: Option<&str>,
    ) -> Result<(), ProviderError> {
        // Best-effort on both deletes; a leaked store is worth a warning,
        // never a per-file failure
        let store_result = self
            .client
            .delete(self.url(&format!("vector_stores/{}", store_id)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await;
        if let Err(e) = store_result {
            warn!("Failed to delete vector store {}: {}", store_id, e);
        }

        if let Some(file_id) = file_id {
            self.delete_file(file_id).await;
        }

        Ok(())
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        let mut responses_request = ResponsesRequest::new(&request.model, &request.prompt);
        if let Some(store_id) = &request.vector_store_id {
            responses_request = responses_request.file_search(store_id);
        }

        debug!(
            "Sending Responses request: model={} bytes={} file_search={}",
            request.model,
            request.prompt.len(),
            request.vector_store_id.is_some()
        );

        retry_generation(self.config.max_retries, || {
            self.send_responses_request(&responses_request)
        })
        .await
    }
}
