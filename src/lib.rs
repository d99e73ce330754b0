/*!
 * # vttreport - VTT transcripts to Markdown reports with AI
 *
 * A Rust library for batch-converting WebVTT transcript files into
 * structured Markdown reports using the OpenAI Responses API.
 *
 * ## Features
 *
 * - Extract normalized plain text from WebVTT cue streams
 * - Two processing modes:
 *   - attachment mode: upload the transcript into a transient vector
 *     store and let the model read it through file_search
 *   - inline mode: embed the extracted text directly in the prompt
 * - Generation calls with exponential retry backoff
 * - Sequential batch processing with per-file failure containment
 * - INI or RAW prompt configuration, `.env` credential loading
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Prompt-pair and remote-service configuration
 * - `vtt_processor`: WebVTT cue-stream extraction
 * - `prompts`: Prompt templates and formatting
 * - `providers`: Clients for remote generation:
 *   - `providers::openai`: OpenAI Responses API client
 *   - `providers::mock`: Scripted provider for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Batch orchestration
 * - `env_utils`: Lightweight `.env` loading
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod env_utils;
pub mod errors;
pub mod file_utils;
pub mod prompts;
pub mod providers;
pub mod vtt_processor;

// Re-export main types for easier usage
pub use app_config::{Config, PromptConfig, RemoteConfig};
pub use app_controller::{BatchSummary, Controller};
pub use errors::{AppError, ConfigError, ProviderError};
pub use providers::{GenerationProvider, GenerationRequest};
