//! GeminiClient against a mock Vertex AI endpoint.

use news_law_explainer::{GeminiClient, GeminiSettings, ModelClient, ModelError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str =
    "/v1/projects/test-project/locations/asia-northeast1/publishers/google/models/gemini-pro:generateContent";

fn client_for(server: &MockServer, token: Option<&str>) -> GeminiClient {
    GeminiClient::new(GeminiSettings {
        project: Some("test-project".to_string()),
        access_token: token.map(String::from),
        endpoint: Some(server.uri()),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_generate_joins_text_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "プロンプト" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "要約：A\n\n" }, { "text": "法的解説：B" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret-token"));
    let text = client.generate("プロンプト").await.unwrap();

    assert_eq!(text, "要約：A\n\n法的解説：B");
}

#[tokio::test]
async fn test_api_error_keeps_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("Quota exceeded"))
        .mount(&server)
        .await;

    let err = client_for(&server, None).generate("x").await.unwrap_err();

    match err {
        ModelError::Api { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "Quota exceeded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server, None).generate("x").await.unwrap_err();
    assert!(matches!(err, ModelError::EmptyResponse));
}

#[tokio::test]
async fn test_blocked_candidate_without_content_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, None).generate("x").await.unwrap_err();
    assert!(matches!(err, ModelError::EmptyResponse));
}
