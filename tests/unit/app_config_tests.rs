/*!
 * Tests for configuration loading
 */

use anyhow::Result;
use std::path::Path;
use vttreport::app_config::{PromptConfig, RemoteConfig};
use vttreport::errors::ConfigError;
use vttreport::prompts::DEFAULT_USER_PROMPT;

use crate::common;

#[test]
fn test_promptConfig_withIniSection_shouldUseBothKeys() {
    let text = "[prompts]\n\
system_prompt = You are a report writer.\n\
user_prompt = Report for {filename}: {content}\n";

    let config = PromptConfig::from_str_lossy(text);
    assert_eq!(config.system_prompt, "You are a report writer.");
    assert_eq!(config.user_prompt, "Report for {filename}: {content}");
}

/// Indented lines continue the previous value, INI-style. The fixture is
/// assembled with concat! so the leading indentation is not eaten by
/// string-literal line continuation.
#[test]
fn test_promptConfig_withContinuationLines_shouldExtendValues() {
    let text = concat!(
        "[prompts]\n",
        "system_prompt = First line.\n",
        "\tSecond line.\n",
        "user_prompt = Use {filename}\n",
        "    and {content}\n",
    );

    let config = PromptConfig::from_str_lossy(text);
    assert_eq!(config.system_prompt, "First line.\nSecond line.");
    assert_eq!(config.user_prompt, "Use {filename}\nand {content}");
}

/// A file without the INI form is taken wholesale as the system prompt
#[test]
fn test_promptConfig_withRawText_shouldFallBackToRawMode() {
    let text = "  Summarize every meeting transcript into Markdown.  \n";
    let config = PromptConfig::from_str_lossy(text);

    assert_eq!(
        config.system_prompt,
        "Summarize every meeting transcript into Markdown."
    );
    assert_eq!(config.user_prompt, DEFAULT_USER_PROMPT);
}

/// An INI section missing one of the keys also falls back to RAW mode
#[test]
fn test_promptConfig_withIncompleteIniSection_shouldFallBackToRawMode() {
    let text = "[prompts]\nsystem_prompt = Only the system half\n";
    let config = PromptConfig::from_str_lossy(text);

    assert_eq!(config.system_prompt, text.trim());
    assert_eq!(config.user_prompt, DEFAULT_USER_PROMPT);
}

#[test]
fn test_promptConfig_withCommentsAndOtherSections_shouldIgnoreThem() {
    let text = "[other]\nsystem_prompt = wrong one\n\
[prompts]\n\
# a comment\n\
system_prompt = Right one\n\
user_prompt = Template {filename} {content}\n";

    let config = PromptConfig::from_str_lossy(text);
    assert_eq!(config.system_prompt, "Right one");
    assert_eq!(config.user_prompt, "Template {filename} {content}");
}

#[test]
fn test_promptConfigLoad_withMissingFile_shouldReturnNotFound() {
    let result = PromptConfig::load(Path::new("/nonexistent/prompts.conf"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_promptConfigLoad_withExistingFile_shouldParseContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let conf = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "auto.conf",
        "[prompts]\nsystem_prompt = S\nuser_prompt = U {filename} {content}\n",
    )?;

    let config = PromptConfig::load(&conf).expect("load should succeed");
    assert_eq!(config.system_prompt, "S");
    assert_eq!(config.user_prompt, "U {filename} {content}");
    Ok(())
}

#[test]
fn test_remoteConfig_defaults_shouldMatchDocumentedValues() {
    let config = RemoteConfig::default();
    assert_eq!(config.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.timeout_secs, 90);
    assert_eq!(config.max_retries, 2);
    assert!(config.api_key.is_empty());
}

#[test]
fn test_configValidate_withEmptyApiKey_shouldFail() {
    let mut config = common::test_config();
    config.remote.api_key = String::new();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingCredential(_))
    ));
}

#[test]
fn test_configValidate_withApiKey_shouldSucceed() {
    assert!(common::test_config().validate().is_ok());
}
