use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::errors::ConfigError;
use crate::prompts::DEFAULT_USER_PROMPT;

/// Application configuration module
/// This module handles prompt-pair loading from the prompt config file and
/// the explicit remote-service configuration populated once at startup.
///
/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding an optional alternate service endpoint
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// The prompt pair driving every generation request in a batch run.
/// Loaded once, immutable for the run's duration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PromptConfig {
    /// System prompt sent with every request
    pub system_prompt: String,

    /// User prompt template; may contain {filename} and {content} placeholders
    pub user_prompt: String,
}

impl PromptConfig {
    /// Load the prompt pair from a config file.
    ///
    /// Two formats are accepted:
    /// - INI mode: a `[prompts]` section with `system_prompt` and
    ///   `user_prompt` keys (indented continuation lines extend a value)
    /// - RAW mode: anything else; the whole file becomes the system prompt
    ///   and the built-in attachment-oriented user template is used
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;

        Ok(Self::from_str_lossy(&text))
    }

    /// Parse config file content, falling back to RAW mode when the INI
    /// form is absent or incomplete
    pub fn from_str_lossy(text: &str) -> Self {
        if text.contains("[prompts]") {
            if let Some((system_prompt, user_prompt)) = parse_prompts_section(text) {
                return Self {
                    system_prompt,
                    user_prompt,
                };
            }
        }

        Self {
            system_prompt: text.trim().to_string(),
            user_prompt: DEFAULT_USER_PROMPT.to_string(),
        }
    }
}

/// Parse the `[prompts]` INI section. Returns both values only when both
/// keys are present and non-empty; otherwise the caller falls back to RAW.
fn parse_prompts_section(text: &str) -> Option<(String, String)> {
    #[derive(Clone, Copy)]
    enum PromptKey {
        System,
        User,
    }

    let mut in_prompts = false;
    let mut system_prompt: Option<String> = None;
    let mut user_prompt: Option<String> = None;
    let mut current_key: Option<PromptKey> = None;

    for raw in text.lines() {
        let trimmed = raw.trim();

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            in_prompts = trimmed == "[prompts]";
            current_key = None;
            continue;
        }
        if !in_prompts {
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        // Indented non-empty lines continue the previous value
        if raw.starts_with([' ', '\t']) && !trimmed.is_empty() {
            let target = match current_key {
                Some(PromptKey::System) => system_prompt.as_mut(),
                Some(PromptKey::User) => user_prompt.as_mut(),
                None => None,
            };
            if let Some(value) = target {
                value.push('\n');
                value.push_str(trimmed);
            }
            continue;
        }

        current_key = None;
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        match key.trim() {
            "system_prompt" => {
                system_prompt = Some(value.trim().to_string());
                current_key = Some(PromptKey::System);
            }
            "user_prompt" => {
                user_prompt = Some(value.trim().to_string());
                current_key = Some(PromptKey::User);
            }
            _ => {}
        }
    }

    match (system_prompt, user_prompt) {
        (Some(system), Some(user)) if !system.trim().is_empty() && !user.trim().is_empty() => {
            Some((system.trim().to_string(), user.trim().to_string()))
        }
        _ => None,
    }
}

/// Remote generation service configuration, populated once at process
/// start. The client never reads the process environment itself.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RemoteConfig {
    /// API key for authentication
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum attempts for a generation call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl RemoteConfig {
    /// Build the remote configuration from the environment plus CLI values.
    /// A missing credential is a fatal configuration error, raised here
    /// before any network attempt.
    pub fn from_env(model: String, timeout_secs: u64) -> Result<Self, ConfigError> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential(API_KEY_ENV.to_string()))?;

        let endpoint = env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(default_endpoint);

        Ok(Self {
            api_key,
            endpoint,
            model,
            timeout_secs,
            max_retries: default_max_retries(),
        })
    }
}

/// Represents the application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Prompt pair for the run
    pub prompts: PromptConfig,

    /// Remote generation service settings
    pub remote: RemoteConfig,

    /// Process only the first N files (0 = all)
    pub limit_files: usize,

    /// Upload the original file and reference it via file_search rather
    /// than inlining the extracted text
    pub use_attachments: bool,
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential(API_KEY_ENV.to_string()));
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout_secs() -> u64 {
    90
}

fn default_max_retries() -> u32 {
    2
}
