/*!
 * Common test utilities for the vttreport test suite
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use vttreport::app_config::{Config, PromptConfig, RemoteConfig};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample VTT transcript file for testing
pub fn create_test_vtt(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = "WEBVTT\n\n\
1\n\
00:00:00.000 --> 00:00:02.000\n\
Welcome to the meeting.\n\n\
2\n\
00:00:02.000 --> 00:00:04.000\n\
Let's review the agenda.\n\n\
3\n\
00:00:04.000 --> 00:00:06.000\n\
Any questions so far?\n";
    create_test_file(dir, filename, content)
}

/// Builds a configuration suitable for mock-provider tests
pub fn test_config() -> Config {
    Config {
        prompts: PromptConfig {
            system_prompt: "You are a meeting report writer.".to_string(),
            user_prompt: "Write a report for {filename}.\n\n{content}".to_string(),
        },
        remote: RemoteConfig {
            api_key: "test-key".to_string(),
            ..RemoteConfig::default()
        },
        limit_files: 0,
        use_attachments: true,
    }
}
