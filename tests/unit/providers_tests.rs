/*!
 * Tests for provider retry behavior and response-text extraction
 */

use serde_json::json;
use std::cell::Cell;
use std::time::Duration;
use vttreport::app_config::RemoteConfig;
use vttreport::errors::ProviderError;
use vttreport::providers::openai::{OpenAI, extract_response_text};
use vttreport::providers::{backoff_delay, retry_generation};

/// Backoff is min(2^attempt, 8) seconds
#[test]
fn test_backoffDelay_shouldGrowExponentiallyUpToCap() {
    assert_eq!(backoff_delay(1), Duration::from_secs(2));
    assert_eq!(backoff_delay(2), Duration::from_secs(4));
    assert_eq!(backoff_delay(3), Duration::from_secs(8));
    assert_eq!(backoff_delay(4), Duration::from_secs(8));
    assert_eq!(backoff_delay(10), Duration::from_secs(8));
}

/// First attempt fails, second succeeds: the result is the second
/// attempt's text and exactly one 2-second backoff elapses
#[tokio::test(start_paused = true)]
async fn test_retryGeneration_withOneFailure_shouldReturnSecondAttempt() {
    let calls = Cell::new(0u32);
    let start = tokio::time::Instant::now();

    let result = retry_generation(2, || {
        calls.set(calls.get() + 1);
        let attempt = calls.get();
        async move {
            if attempt == 1 {
                Err(ProviderError::RequestFailed("transient".to_string()))
            } else {
                Ok("second attempt result".to_string())
            }
        }
    })
    .await
    .expect("retry should recover");

    assert_eq!(result, "second attempt result");
    assert_eq!(calls.get(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

/// Exhausted retries propagate the last error; no backoff after the
/// final attempt
#[tokio::test(start_paused = true)]
async fn test_retryGeneration_withAllFailures_shouldPropagateLastError() {
    let calls = Cell::new(0u32);
    let start = tokio::time::Instant::now();

    let result = retry_generation(2, || {
        calls.set(calls.get() + 1);
        let attempt = calls.get();
        async move {
            Err::<String, _>(ProviderError::RequestFailed(format!("attempt {}", attempt)))
        }
    })
    .await;

    match result {
        Err(ProviderError::RequestFailed(message)) => assert_eq!(message, "attempt 2"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(calls.get(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test]
async fn test_retryGeneration_withImmediateSuccess_shouldNotRetry() {
    let calls = Cell::new(0u32);

    let result = retry_generation(2, || {
        calls.set(calls.get() + 1);
        async { Ok("first".to_string()) }
    })
    .await
    .unwrap();

    assert_eq!(result, "first");
    assert_eq!(calls.get(), 1);
}

/// Content-shape errors retry within the same budget as transport errors
#[tokio::test(start_paused = true)]
async fn test_retryGeneration_withEmptyResponse_shouldRetryLikeTransportError() {
    let calls = Cell::new(0u32);

    let result = retry_generation(2, || {
        calls.set(calls.get() + 1);
        let attempt = calls.get();
        async move {
            if attempt == 1 {
                Err(ProviderError::NoTextContent)
            } else {
                Ok("recovered".to_string())
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(result, "recovered");
    assert_eq!(calls.get(), 2);
}

/// The convenience output_text field wins when present and non-empty
#[test]
fn test_extractResponseText_withConvenienceField_shouldUseIt() {
    let value = json!({
        "output_text": "  # Report\n\nDone.  ",
        "output": [{ "content": [{ "type": "output_text", "text": "ignored" }] }]
    });
    assert_eq!(extract_response_text(&value).unwrap(), "# Report\n\nDone.");
}

/// A blank convenience field falls through to the structured scan
#[test]
fn test_extractResponseText_withBlankConvenienceField_shouldScanStructure() {
    let value = json!({
        "output_text": "   ",
        "output": [
            { "content": [{ "type": "output_text", "text": "Part one. " }] },
            { "content": [{ "type": "output_text", "text": "Part two." }] }
        ]
    });
    assert_eq!(
        extract_response_text(&value).unwrap(),
        "Part one. Part two."
    );
}

/// Nested {"text": {"value": ...}} segments are also collected
#[test]
fn test_extractResponseText_withNestedTextValue_shouldCollectIt() {
    let value = json!({
        "output": [
            { "content": [{ "type": "output_text", "text": { "value": "Nested segment" } }] }
        ]
    });
    assert_eq!(extract_response_text(&value).unwrap(), "Nested segment");
}

/// Items without content arrays (reasoning, tool calls) are skipped
#[test]
fn test_extractResponseText_withMixedOutputItems_shouldSkipNonText() {
    let value = json!({
        "output": [
            { "type": "file_search_call", "status": "completed" },
            { "type": "message", "content": [{ "type": "output_text", "text": "The report." }] }
        ]
    });
    assert_eq!(extract_response_text(&value).unwrap(), "The report.");
}

/// No usable text anywhere is a content-shape error, not a parse error
#[test]
fn test_extractResponseText_withNoText_shouldReportNoTextContent() {
    let value = json!({ "output": [{ "content": [] }], "output_text": "" });
    assert!(matches!(
        extract_response_text(&value),
        Err(ProviderError::NoTextContent)
    ));
}

/// Constructing the client without a credential fails before any network
/// attempt
#[test]
fn test_openAiNew_withMissingApiKey_shouldFailFast() {
    let config = RemoteConfig::default();
    assert!(matches!(
        OpenAI::new(config),
        Err(ProviderError::AuthenticationError(_))
    ));
}

#[test]
fn test_openAiNew_withApiKey_shouldCarryRetryBudget() {
    let config = RemoteConfig {
        api_key: "test-key".to_string(),
        ..RemoteConfig::default()
    };
    let client = OpenAI::new(config).expect("client should build");
    assert_eq!(client.max_retries(), 2);
}
