//! Successful round trips

use crate::integration::mock_server::{MockProvider, GENERATE_PATH};
use ai_email_writer::prompt::build_prompt;
use ai_email_writer::{GeminiConfig, GenerationRequest, ReplyGenerator, ReplyLength};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_reschedule_end_to_end() {
    let mut provider = MockProvider::new().await;
    let mock = provider
        .reply_when(
            Matcher::AllOf(vec![
                Matcher::Regex(r"Use a friendly tone\.".to_string()),
                Matcher::Regex(r"Can we reschedule\?".to_string()),
            ]),
            "Sure, happy to reschedule!",
        )
        .await;

    let request = GenerationRequest::new("Can we reschedule?").tone("friendly");
    let reply = provider.generator().generate(&request).await.unwrap();

    assert_eq!(reply.text, "Sure, happy to reschedule!");
    assert_eq!(reply.finish_reason.as_deref(), Some("STOP"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_body_is_exact_envelope() {
    let mut provider = MockProvider::new().await;
    let request = GenerationRequest::new("Quarterly numbers attached.\nThoughts?")
        .tone("formal")
        .length(ReplyLength::Medium);
    let expected = json!({
        "contents": [{ "parts": [{ "text": build_prompt(&request) }] }]
    });
    let mock = provider
        .reply_when(Matcher::Json(expected), "Thank you for sharing.")
        .await;

    let text = provider.generator().generate_text(&request).await;

    assert_eq!(text, "Thank you for sharing.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_returns_text_unchanged() {
    let mut provider = MockProvider::new().await;
    let mock = provider
        .reply_with("Hello, thanks for reaching out...")
        .await;

    let request = GenerationRequest::new("Hi, I have a question about my invoice.");
    let text = provider.generator().generate_text(&request).await;

    assert_eq!(text, "Hello, thanks for reaching out...");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_key_is_trimmed_on_the_wire() {
    let mut provider = MockProvider::new().await;
    let mock = provider.reply_with("ok").await;

    let config = GeminiConfig::new(&provider.endpoint(), "  test-key\n").unwrap();
    let generator = ReplyGenerator::builder().config(config).build().unwrap();
    let reply = generator.generate(&GenerationRequest::new("ping")).await.unwrap();

    assert_eq!(reply.text, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_caller_supplied_http_client() {
    let mut provider = MockProvider::new().await;
    let mock = provider.reply_with("from shared client").await;

    let config = GeminiConfig::new(&provider.endpoint(), "test-key").unwrap();
    let generator = ReplyGenerator::builder()
        .config(config)
        .http_client(reqwest::Client::new())
        .build()
        .unwrap();

    let reply = generator.generate(&GenerationRequest::new("hi")).await.unwrap();
    assert_eq!(reply.text, "from shared client");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let mut provider = MockProvider::new().await;
    let mock = provider
        .server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(crate::integration::mock_server::candidate_body("same reply"))
        .expect(8)
        .create_async()
        .await;

    let generator = provider.generator();
    let calls = (0..8).map(|i| {
        let generator = generator.clone();
        async move {
            let request = GenerationRequest::new(format!("email number {i}"));
            generator.generate(&request).await
        }
    });
    let results = futures::future::join_all(calls).await;

    assert_eq!(results.len(), 8);
    for result in results {
        assert_eq!(result.unwrap().text, "same reply");
    }
    mock.assert_async().await;
}
